use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::accrual::{accrue_in_place, AccrualOutcome, PenaltyParams};
use crate::installment::Installment;
use crate::types::*;

/// One installment queued for a penalty sweep, with its loan type's
/// penalty settings if the host could resolve them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_reference: Option<String>,
    pub installment: Installment,
    #[serde(default)]
    pub penalty: Option<PenaltyParams>,
}

/// Batch of installments to sweep, as handed over by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRequest {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    pub items: Vec<SweepItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_reference: Option<String>,
    pub sequence_number: u32,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub as_of: NaiveDate,
    /// Every input installment in input order; failed ones are unchanged
    pub installments: Vec<Installment>,
    pub updated: usize,
    pub unchanged: usize,
    pub failures: Vec<SweepFailure>,
}

/// Accrue penalties on a batch of installments as of `today`.
///
/// Installments are independent: a failure is logged, recorded in the
/// report and the sweep moves on.
pub fn sweep_penalties(items: Vec<SweepItem>, today: NaiveDate) -> ComputationOutput<SweepReport> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let total = items.len();
    let mut installments = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut updated = 0usize;
    let mut unchanged = 0usize;

    for item in items {
        let SweepItem {
            loan_reference,
            mut installment,
            penalty,
        } = item;

        match accrue_in_place(&mut installment, penalty.as_ref(), today) {
            Ok(AccrualOutcome::Accrued { .. }) => updated += 1,
            Ok(_) => unchanged += 1,
            Err(e) => {
                log::warn!(
                    "penalty sweep: installment #{} of loan {}: {e}",
                    installment.sequence_number,
                    loan_reference.as_deref().unwrap_or("<unknown>")
                );
                failures.push(SweepFailure {
                    loan_reference,
                    sequence_number: installment.sequence_number,
                    error: e.to_string(),
                });
            }
        }
        installments.push(installment);
    }

    if !failures.is_empty() {
        warnings.push(format!(
            "{} of {total} installment(s) could not be processed; see failures",
            failures.len()
        ));
    }
    log::info!(
        "penalty sweep as of {today}: {updated} updated, {unchanged} unchanged, {} failed",
        failures.len()
    );

    let report = SweepReport {
        as_of: today,
        installments,
        updated,
        unchanged,
        failures,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Daily Late Penalty Sweep",
        &serde_json::json!({
            "as_of": today,
            "installments": total,
        }),
        warnings,
        elapsed,
        report,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installment::InstallmentStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn item(seq: u32, due: NaiveDate, penalty: Option<PenaltyParams>) -> SweepItem {
        SweepItem {
            loan_reference: Some("L-7".into()),
            installment: Installment::scheduled(
                seq,
                due,
                dec!(1000.00),
                dec!(50.00),
                dec!(950.00),
                dec!(0),
            ),
            penalty,
        }
    }

    fn params() -> Option<PenaltyParams> {
        Some(PenaltyParams {
            grace_days: 0,
            daily_penalty_rate: dec!(0.01),
        })
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let items = vec![
            item(1, d(2024, 1, 1), params()),
            item(2, d(2024, 1, 1), None),
            item(3, d(2024, 1, 1), params()),
        ];
        let out = sweep_penalties(items, d(2024, 1, 11));
        let report = &out.result;

        assert_eq!(report.installments.len(), 3);
        assert_eq!(report.updated, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sequence_number, 2);
        assert_eq!(report.failures[0].loan_reference.as_deref(), Some("L-7"));
        // 1000 * 0.01 * 10 days
        assert_eq!(report.installments[0].accumulated_penalty, dec!(100.00));
        assert_eq!(report.installments[1].accumulated_penalty, Decimal::ZERO);
        assert_eq!(report.installments[2].accumulated_penalty, dec!(100.00));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_out_of_range_penalty_is_recorded_not_fatal() {
        let mut huge = item(1, d(2024, 1, 1), params());
        huge.installment.scheduled_payment = Decimal::MAX;
        let items = vec![huge, item(2, d(2024, 1, 1), params())];

        let out = sweep_penalties(items, d(2024, 6, 1));
        let report = &out.result;

        assert_eq!(report.installments.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sequence_number, 1);
        assert_eq!(report.installments[0].accumulated_penalty, Decimal::ZERO);
        // 1000 * 0.01 * 152 days
        assert_eq!(report.updated, 1);
        assert_eq!(report.installments[1].accumulated_penalty, dec!(1520.00));
    }

    #[test]
    fn test_current_and_paid_installments_unchanged() {
        let mut paid = item(1, d(2024, 1, 1), None);
        paid.installment.status = InstallmentStatus::Paid;
        let items = vec![paid, item(2, d(2024, 2, 1), None)];

        let out = sweep_penalties(items, d(2024, 1, 15));
        assert_eq!(out.result.unchanged, 2);
        assert_eq!(out.result.updated, 0);
        assert!(out.result.failures.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_resweep_same_day_changes_nothing() {
        let first = sweep_penalties(vec![item(1, d(2024, 1, 1), params())], d(2024, 1, 5));
        let again: Vec<SweepItem> = first
            .result
            .installments
            .iter()
            .cloned()
            .map(|installment| SweepItem {
                loan_reference: None,
                installment,
                penalty: params(),
            })
            .collect();
        let second = sweep_penalties(again, d(2024, 1, 5));
        assert_eq!(second.result.updated, 0);
        assert_eq!(
            second.result.installments[0].accumulated_penalty,
            first.result.installments[0].accumulated_penalty
        );
    }
}
