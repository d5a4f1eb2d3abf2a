use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_schedule_core::payments::{self, PaymentRequest};
use loan_schedule_core::penalty::{self, AccrualRequest, SweepRequest};
use loan_schedule_core::schedule::{self, LoanTerms};
use loan_schedule_core::Installment;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_schedule(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

#[napi]
pub fn accrue_penalty(input_json: String) -> NapiResult<String> {
    let request: AccrualRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = request.run(local_today()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sweep_penalties(input_json: String) -> NapiResult<String> {
    let request: SweepRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = request.as_of.unwrap_or_else(local_today);
    let output = penalty::sweep_penalties(request.items, as_of);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SinglePayment {
    installment: Installment,
    amount: Decimal,
}

/// Apply a payment to one installment: `{"installment": {...}, "amount": "..."}`.
#[napi]
pub fn apply_payment(input_json: String) -> NapiResult<String> {
    let request: SinglePayment = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        payments::apply_payment(&request.installment, request.amount).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Spread a payment over a loan's open installments, oldest first.
#[napi]
pub fn allocate_payment(input_json: String) -> NapiResult<String> {
    let request: PaymentRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payments::allocate_payment(&request.installments, request.amount)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
