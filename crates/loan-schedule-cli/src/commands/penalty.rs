use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use loan_schedule_core::penalty::{self, AccrualRequest, SweepRequest};

use super::today_or_local;
use crate::input;

/// Arguments for single-installment accrual
#[derive(Args)]
pub struct AccrueArgs {
    /// Path to JSON accrual request (installment, penalty, as_of)
    #[arg(long)]
    pub input: Option<String>,

    /// Accrual date when the request has no as_of (defaults to today)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

/// Arguments for a batch penalty sweep
#[derive(Args)]
pub struct SweepArgs {
    /// Path to JSON sweep request (as_of, items)
    #[arg(long)]
    pub input: Option<String>,

    /// Sweep date when the request has no as_of (defaults to today)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

pub fn run_accrue(args: AccrueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AccrualRequest = input::require(args.input.as_deref(), "accrue")?;
    let result = request.run(today_or_local(args.today))?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SweepRequest = input::require(args.input.as_deref(), "sweep")?;
    let as_of = request.as_of.unwrap_or_else(|| today_or_local(args.today));

    let report = penalty::sweep_penalties(request.items, as_of);
    Ok(serde_json::to_value(report)?)
}
