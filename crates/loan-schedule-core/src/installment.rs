use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Repayment state of a single installment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    #[default]
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "pagada_parcialmente")]
    PartiallyPaid,
    #[serde(alias = "pagada")]
    Paid,
}

impl InstallmentStatus {
    /// Whether anything is still owed on the installment.
    pub fn is_open(self) -> bool {
        matches!(self, InstallmentStatus::Pending | InstallmentStatus::PartiallyPaid)
    }
}

/// One period of an amortisation schedule.
///
/// Created once by the schedule generator; afterwards only payment
/// application and penalty accrual touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub sequence_number: u32,
    pub due_date: NaiveDate,
    pub scheduled_payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
    #[serde(default)]
    pub status: InstallmentStatus,
    #[serde(default)]
    pub total_paid: Money,
    #[serde(default)]
    pub accumulated_penalty: Money,
    #[serde(default)]
    pub last_penalty_calculation_date: Option<NaiveDate>,
}

impl Installment {
    /// A freshly scheduled installment: pending, nothing paid, no penalty.
    pub fn scheduled(
        sequence_number: u32,
        due_date: NaiveDate,
        scheduled_payment: Money,
        interest_portion: Money,
        principal_portion: Money,
        remaining_balance: Money,
    ) -> Self {
        Self {
            sequence_number,
            due_date,
            scheduled_payment,
            interest_portion,
            principal_portion,
            remaining_balance,
            status: InstallmentStatus::Pending,
            total_paid: Decimal::ZERO,
            accumulated_penalty: Decimal::ZERO,
            last_penalty_calculation_date: None,
        }
    }

    /// Portion of the scheduled payment not yet covered, floored at zero.
    pub fn outstanding(&self) -> Money {
        (self.scheduled_payment - self.total_paid).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Installment {
        Installment::scheduled(
            1,
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            dec!(500.00),
            dec!(20.00),
            dec!(480.00),
            dec!(520.00),
        )
    }

    #[test]
    fn test_scheduled_defaults() {
        let inst = sample();
        assert_eq!(inst.status, InstallmentStatus::Pending);
        assert_eq!(inst.total_paid, Decimal::ZERO);
        assert_eq!(inst.accumulated_penalty, Decimal::ZERO);
        assert!(inst.last_penalty_calculation_date.is_none());
    }

    #[test]
    fn test_outstanding_floors_at_zero() {
        let mut inst = sample();
        inst.total_paid = dec!(200);
        assert_eq!(inst.outstanding(), dec!(300.00));
        inst.total_paid = dec!(650);
        assert_eq!(inst.outstanding(), Decimal::ZERO);
    }

    #[test]
    fn test_status_accepts_legacy_codes() {
        let status: InstallmentStatus = serde_json::from_str("\"pagada_parcialmente\"").unwrap();
        assert_eq!(status, InstallmentStatus::PartiallyPaid);
        assert!(status.is_open());
        let status: InstallmentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert!(!status.is_open());
    }

    #[test]
    fn test_deserialize_without_mutable_state() {
        let json = r#"{
            "sequence_number": 3,
            "due_date": "2024-04-15",
            "scheduled_payment": "9455.96",
            "interest_portion": "1627.45",
            "principal_portion": "7828.51",
            "remaining_balance": "73543.84"
        }"#;
        let inst: Installment = serde_json::from_str(json).unwrap();
        assert_eq!(inst.status, InstallmentStatus::Pending);
        assert_eq!(inst.total_paid, Decimal::ZERO);
        assert_eq!(inst.scheduled_payment, dec!(9455.96));
    }
}
