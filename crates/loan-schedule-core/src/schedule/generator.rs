use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::terms::{LoanTerms, PaymentFrequency};
use crate::calendar;
use crate::error::LoanScheduleError;
use crate::installment::Installment;
use crate::time_value::{annuity_payment, round_money};
use crate::types::*;
use crate::LoanScheduleResult;

/// Full schedule plus the figures a loan summary needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub installments: Vec<Installment>,
    pub number_of_periods: u32,
    pub period_rate: Rate,
    pub scheduled_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_payments: Money,
}

/// Due date of period `period` (1-based).
///
/// Monthly schedules land on the disbursement day of each following month,
/// clamped to month end. Biweekly and weekly schedules use fixed 15 and 7
/// day offsets.
pub fn due_date(
    disbursement: NaiveDate,
    frequency: PaymentFrequency,
    period: u32,
) -> LoanScheduleResult<NaiveDate> {
    match frequency.day_offset() {
        None => calendar::add_months_clamped(disbursement, period),
        Some(step) => calendar::add_days(disbursement, step * u64::from(period)),
    }
}

/// Generate the French-method (constant payment) schedule for `terms`.
///
/// Interest and principal are carried at full precision. Each row's
/// principal portion is the change in the cumulative principal repaid,
/// rounded to cents, so every portion stays within a cent of its exact
/// value and the portions sum to the loan principal. Interest on earlier
/// rows is the rest of the scheduled payment; the final row absorbs the
/// residue and closes the balance at exactly zero.
pub fn generate(terms: &LoanTerms) -> LoanScheduleResult<Vec<Installment>> {
    terms.validate()?;

    let rate = terms.period_rate();
    let n = terms.number_of_periods()?;
    // Last due date must exist before anything is sized on n
    due_date(terms.disbursement_date, terms.payment_frequency, n)?;

    let payment = annuity_payment(terms.principal, rate, n)?;
    let scheduled_payment = round_money(payment);

    log::debug!(
        "generating {n} {} installments: principal={} period_rate={rate} payment={scheduled_payment}",
        terms.payment_frequency,
        terms.principal,
    );

    let out_of_range = || {
        LoanScheduleError::invalid_terms(
            "principal",
            format!("Schedule arithmetic out of range for principal {}", terms.principal),
        )
    };

    let mut installments = Vec::with_capacity(n as usize);
    let mut balance = terms.principal;
    let mut allocated = Decimal::ZERO;

    for period in 1..=n {
        let interest = balance.checked_mul(rate).ok_or_else(out_of_range)?;
        let principal = payment.checked_sub(interest).ok_or_else(out_of_range)?;
        balance = balance.checked_sub(principal).ok_or_else(out_of_range)?;

        let (interest_portion, principal_portion) = if period == n {
            (round_money(interest), terms.principal - allocated)
        } else {
            let repaid = round_money(terms.principal - balance).min(terms.principal);
            let principal_portion = repaid - allocated;
            let interest_portion = if rate.is_zero() {
                Decimal::ZERO
            } else {
                (scheduled_payment - principal_portion).max(Decimal::ZERO)
            };
            (interest_portion, principal_portion)
        };
        allocated += principal_portion;

        installments.push(Installment::scheduled(
            period,
            due_date(terms.disbursement_date, terms.payment_frequency, period)?,
            scheduled_payment,
            interest_portion,
            principal_portion,
            terms.principal - allocated,
        ));
    }

    Ok(installments)
}

fn checked_total(mut amounts: impl Iterator<Item = Money>) -> LoanScheduleResult<Money> {
    amounts
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| {
            LoanScheduleError::invalid_terms("principal", "Schedule totals are out of range")
        })
}

/// Generate the schedule and wrap it with totals and metadata.
pub fn build_schedule(terms: &LoanTerms) -> LoanScheduleResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let installments = generate(terms)?;
    let period_rate = terms.period_rate();

    if period_rate.is_zero() {
        warnings.push(
            "Zero interest rate; principal is repaid in equal straight-line installments".into(),
        );
    }
    match terms.payment_frequency {
        PaymentFrequency::Monthly if terms.disbursement_date.day() > 28 => {
            warnings.push(format!(
                "Disbursement day {} does not exist in every month; due dates are clamped to month end",
                terms.disbursement_date.day()
            ));
        }
        PaymentFrequency::Monthly => {}
        other => {
            warnings.push(format!(
                "{other} due dates use fixed {}-day offsets and drift from calendar boundaries over long terms",
                other.day_offset().unwrap_or_default()
            ));
        }
    }

    let total_interest = checked_total(installments.iter().map(|i| i.interest_portion))?;
    let total_principal = checked_total(installments.iter().map(|i| i.principal_portion))?;
    let total_payments = checked_total([total_interest, total_principal].into_iter())?;
    let scheduled_payment = installments
        .first()
        .map(|i| i.scheduled_payment)
        .unwrap_or_default();

    let output = ScheduleOutput {
        number_of_periods: installments.len() as u32,
        period_rate,
        scheduled_payment,
        total_interest,
        total_principal,
        total_payments,
        installments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French Amortisation (constant annuity)",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "nominal_rate": terms.nominal_rate.to_string(),
            "rate_period": terms.rate_period,
            "term_months": terms.term_length,
            "payment_frequency": terms.payment_frequency,
            "disbursement_date": terms.disbursement_date,
            "rounding": "half_even_2dp",
        }),
        warnings,
        elapsed,
        output,
    ))
}
