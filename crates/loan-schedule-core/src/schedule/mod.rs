pub mod generator;
pub mod terms;

pub use generator::{build_schedule, due_date, generate, ScheduleOutput};
pub use terms::{LoanTerms, PaymentFrequency, RatePeriod};
