use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanScheduleError;
use crate::installment::{Installment, InstallmentStatus};
use crate::types::Money;
use crate::LoanScheduleResult;

/// Result of applying money to a single installment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub installment: Installment,
    pub applied: Money,
    /// Part of the amount beyond what the installment still owed
    pub excess: Money,
}

/// Amount applied to one installment by a loan-level payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub sequence_number: u32,
    pub applied: Money,
    pub status: InstallmentStatus,
}

/// Result of spreading a payment across a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub installments: Vec<Installment>,
    pub allocations: Vec<Allocation>,
    pub unapplied: Money,
}

/// Loan-level payment as handed over by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub installments: Vec<Installment>,
    /// Missing amounts read as zero and are rejected when applied
    #[serde(default)]
    pub amount: Money,
}

fn check_amount(amount: Money) -> LoanScheduleResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LoanScheduleError::InvalidPayment {
            reason: format!("Payment amount must be positive, got {amount}"),
        });
    }
    Ok(())
}

/// Apply `amount` against the scheduled payment of one installment.
///
/// Only what the installment still owes is taken; the rest comes back as
/// `excess`. Accumulated penalty is tracked separately and is not reduced.
pub fn apply_payment(
    installment: &Installment,
    amount: Money,
) -> LoanScheduleResult<PaymentOutcome> {
    check_amount(amount)?;
    if !installment.status.is_open() {
        return Err(LoanScheduleError::InvalidPayment {
            reason: format!("Installment #{} is already paid", installment.sequence_number),
        });
    }

    let mut updated = installment.clone();
    let applied = amount.min(installment.outstanding());
    updated.total_paid += applied;
    updated.status = if updated.total_paid >= updated.scheduled_payment {
        InstallmentStatus::Paid
    } else {
        InstallmentStatus::PartiallyPaid
    };

    Ok(PaymentOutcome {
        installment: updated,
        applied,
        excess: amount - applied,
    })
}

/// Spread a loan-level payment over open installments, oldest first.
pub fn allocate_payment(
    installments: &[Installment],
    amount: Money,
) -> LoanScheduleResult<AllocationOutcome> {
    check_amount(amount)?;

    let mut order: Vec<usize> = (0..installments.len())
        .filter(|&i| installments[i].status.is_open())
        .collect();
    if order.is_empty() {
        return Err(LoanScheduleError::InvalidPayment {
            reason: "Loan has no open installments".into(),
        });
    }
    order.sort_by_key(|&i| installments[i].sequence_number);

    let mut updated = installments.to_vec();
    let mut allocations = Vec::new();
    let mut remaining = amount;

    for idx in order {
        if remaining <= Decimal::ZERO {
            break;
        }
        let outcome = apply_payment(&updated[idx], remaining)?;
        remaining = outcome.excess;
        allocations.push(Allocation {
            sequence_number: outcome.installment.sequence_number,
            applied: outcome.applied,
            status: outcome.installment.status,
        });
        updated[idx] = outcome.installment;
    }

    Ok(AllocationOutcome {
        installments: updated,
        allocations,
        unapplied: remaining,
    })
}
