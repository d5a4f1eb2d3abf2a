use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_schedule_core::payments::{self, PaymentRequest};

use crate::input;

/// Arguments for applying a loan-level payment
#[derive(Args)]
pub struct PayArgs {
    /// Path to JSON payment request (installments, amount)
    #[arg(long)]
    pub input: Option<String>,

    /// Payment amount; replaces the amount in the request
    #[arg(long)]
    pub amount: Option<Decimal>,
}

pub fn run_pay(args: PayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: PaymentRequest = input::require(args.input.as_deref(), "pay")?;
    if let Some(amount) = args.amount {
        request.amount = amount;
    }

    let outcome = payments::allocate_payment(&request.installments, request.amount)?;
    Ok(serde_json::to_value(outcome)?)
}
