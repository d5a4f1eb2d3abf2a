use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_schedule_core::schedule::{self, LoanTerms, PaymentFrequency, RatePeriod};

use crate::input;

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Amount disbursed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal rate as a percentage (e.g. 24 for 24%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Period the rate is quoted for: annual or monthly
    #[arg(long, default_value = "annual")]
    pub rate_period: RatePeriod,

    /// Term in months
    #[arg(long)]
    pub term: Option<i32>,

    /// Payment frequency: monthly, biweekly or weekly
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Disbursement date (YYYY-MM-DD)
    #[arg(long)]
    pub disbursement_date: Option<NaiveDate>,

    /// Days after the due date before penalty starts
    #[arg(long, default_value = "0")]
    pub grace_days: u32,

    /// Fraction of the outstanding amount charged per overdue day
    #[arg(long, default_value = "0")]
    pub daily_penalty_rate: Decimal,

    /// Path to JSON loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::load(args.input.as_deref())? {
        Some(terms) => terms,
        None => LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            nominal_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            rate_period: args.rate_period,
            term_length: args.term.ok_or("--term is required (or provide --input)")?,
            payment_frequency: args.frequency,
            disbursement_date: args
                .disbursement_date
                .ok_or("--disbursement-date is required (or provide --input)")?,
            grace_days: args.grace_days,
            daily_penalty_rate: args.daily_penalty_rate,
        },
    };

    let result = schedule::build_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}
