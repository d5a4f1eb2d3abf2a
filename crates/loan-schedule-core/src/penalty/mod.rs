pub mod accrual;
pub mod sweep;

pub use accrual::{
    accrue, accrue_in_place, evaluate, AccrualOutcome, AccrualRequest, AccrualResult,
    LoanTypePenaltyConfig, PenaltyParams,
};
pub use sweep::{sweep_penalties, SweepFailure, SweepItem, SweepReport, SweepRequest};
