pub mod application;

pub use application::{
    allocate_payment, apply_payment, Allocation, AllocationOutcome, PaymentOutcome,
    PaymentRequest,
};
