use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::LoanScheduleError;
use crate::installment::Installment;
use crate::time_value::round_money;
use crate::types::{Money, Rate};
use crate::LoanScheduleResult;

/// Late-payment terms of a loan type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyParams {
    /// Days after the due date before any penalty accrues
    pub grace_days: u32,
    /// Fraction of the outstanding installment charged per overdue day
    pub daily_penalty_rate: Rate,
}

impl PenaltyParams {
    pub fn validate(&self) -> LoanScheduleResult<()> {
        if self.daily_penalty_rate < Decimal::ZERO {
            return Err(LoanScheduleError::InvalidPenaltyConfig {
                field: "daily_penalty_rate".into(),
                reason: "Daily penalty rate cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// Penalty settings as stored on a loan type, where either field may be
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanTypePenaltyConfig {
    #[serde(default)]
    pub grace_days: Option<u32>,
    #[serde(default)]
    pub daily_penalty_rate: Option<Rate>,
}

impl LoanTypePenaltyConfig {
    pub fn resolve(&self) -> LoanScheduleResult<PenaltyParams> {
        let grace_days = self
            .grace_days
            .ok_or_else(|| LoanScheduleError::MissingPenaltyConfig {
                field: "grace_days".into(),
            })?;
        let daily_penalty_rate =
            self.daily_penalty_rate
                .ok_or_else(|| LoanScheduleError::MissingPenaltyConfig {
                    field: "daily_penalty_rate".into(),
                })?;
        let params = PenaltyParams {
            grace_days,
            daily_penalty_rate,
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(feature = "schedule")]
impl From<&crate::schedule::LoanTerms> for PenaltyParams {
    fn from(terms: &crate::schedule::LoanTerms) -> Self {
        PenaltyParams {
            grace_days: terms.grace_days,
            daily_penalty_rate: terms.daily_penalty_rate,
        }
    }
}

/// What an accrual pass decided for one installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccrualOutcome {
    /// Paid in full; never penalised
    Settled,
    /// Due date has not passed
    NotYetDue,
    /// Overdue but still inside the grace window
    WithinGrace { penalty_start: NaiveDate },
    /// Penalty already brought up to `through`
    AlreadyAccrued { through: NaiveDate },
    Accrued {
        from: NaiveDate,
        days: i64,
        base: Money,
        amount: Money,
    },
}

impl AccrualOutcome {
    /// Penalty added by this pass (zero unless `Accrued`).
    pub fn amount(&self) -> Money {
        match self {
            AccrualOutcome::Accrued { amount, .. } => *amount,
            _ => Decimal::ZERO,
        }
    }

    pub fn is_accrued(&self) -> bool {
        matches!(self, AccrualOutcome::Accrued { .. })
    }
}

/// Host request to bring one installment's penalty up to date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualRequest {
    pub installment: Installment,
    #[serde(default)]
    pub penalty: Option<PenaltyParams>,
    /// Accrual date; hosts default it to the local calendar date
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Updated installment plus the decision that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualResult {
    pub installment: Installment,
    pub outcome: AccrualOutcome,
}

impl AccrualRequest {
    pub fn run(&self, default_today: NaiveDate) -> LoanScheduleResult<AccrualResult> {
        let mut installment = self.installment.clone();
        let today = self.as_of.unwrap_or(default_today);
        let outcome = accrue_in_place(&mut installment, self.penalty.as_ref(), today)?;
        Ok(AccrualResult {
            installment,
            outcome,
        })
    }
}

fn penalty_out_of_range(sequence_number: u32) -> LoanScheduleError {
    LoanScheduleError::InvalidPenaltyConfig {
        field: "daily_penalty_rate".into(),
        reason: format!("Penalty on installment #{sequence_number} is out of range"),
    }
}

/// Decide how much penalty `installment` owes as of `today` without
/// touching it.
///
/// Penalty parameters are only consulted once the installment is open and
/// past due; asking for them earlier would fail installments of loan types
/// that never needed them.
pub fn evaluate(
    installment: &Installment,
    params: Option<&PenaltyParams>,
    today: NaiveDate,
) -> LoanScheduleResult<AccrualOutcome> {
    if !installment.status.is_open() {
        return Ok(AccrualOutcome::Settled);
    }
    if installment.due_date >= today {
        return Ok(AccrualOutcome::NotYetDue);
    }

    let params = params.ok_or_else(|| LoanScheduleError::MissingPenaltyConfig {
        field: "penalty_params".into(),
    })?;
    params.validate()?;

    let penalty_start = calendar::add_days(installment.due_date, u64::from(params.grace_days))?;
    if penalty_start >= today {
        return Ok(AccrualOutcome::WithinGrace { penalty_start });
    }

    let from = installment
        .last_penalty_calculation_date
        .unwrap_or(penalty_start);
    if from >= today {
        return Ok(AccrualOutcome::AlreadyAccrued { through: from });
    }

    let days = calendar::days_between(from, today);
    let base = installment.outstanding();
    let amount = base
        .checked_mul(params.daily_penalty_rate)
        .and_then(|daily| daily.checked_mul(Decimal::from(days)))
        .map(round_money)
        .ok_or_else(|| penalty_out_of_range(installment.sequence_number))?;

    Ok(AccrualOutcome::Accrued {
        from,
        days,
        base,
        amount,
    })
}

/// Bring the penalty on `installment` up to `today`, in place.
///
/// Each overdue day is charged exactly once: the last calculation date
/// advances to `today`, so repeat calls on the same day are no-ops.
pub fn accrue_in_place(
    installment: &mut Installment,
    params: Option<&PenaltyParams>,
    today: NaiveDate,
) -> LoanScheduleResult<AccrualOutcome> {
    let outcome = evaluate(installment, params, today)?;
    if let AccrualOutcome::Accrued { amount, days, .. } = &outcome {
        installment.accumulated_penalty = installment
            .accumulated_penalty
            .checked_add(*amount)
            .ok_or_else(|| penalty_out_of_range(installment.sequence_number))?;
        installment.last_penalty_calculation_date = Some(today);
        log::debug!(
            "installment #{}: accrued {amount} over {days} day(s), total {}",
            installment.sequence_number,
            installment.accumulated_penalty
        );
    }
    Ok(outcome)
}

/// Return the state of `installment` after accruing penalty up to `today`.
/// The caller persists the result.
pub fn accrue(
    installment: &Installment,
    params: Option<&PenaltyParams>,
    today: NaiveDate,
) -> LoanScheduleResult<Installment> {
    let mut updated = installment.clone();
    accrue_in_place(&mut updated, params, today)?;
    Ok(updated)
}
