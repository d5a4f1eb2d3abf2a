pub mod calendar;
pub mod error;
pub mod installment;
pub mod time_value;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "penalty")]
pub mod penalty;

#[cfg(feature = "payments")]
pub mod payments;

pub use error::LoanScheduleError;
pub use installment::{Installment, InstallmentStatus};
pub use types::*;

/// Standard result type for all loan-schedule operations
pub type LoanScheduleResult<T> = Result<T, LoanScheduleError>;
