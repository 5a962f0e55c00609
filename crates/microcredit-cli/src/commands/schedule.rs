use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use microcredit_core::schedule::{build_schedule, InsuranceModel, ScheduleParams};

use crate::commands::FrequencyArg;
use crate::input;

/// Arguments for a raw amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal in COP
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Periodic rate, already normalized to the payment cadence
    #[arg(long)]
    pub periodic_rate: Option<Decimal>,

    /// Number of payment periods
    #[arg(long)]
    pub term: Option<u32>,

    /// Flat per-period insurance amount
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Payment cadence (used for payment-date projection)
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// First payment date (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: ScheduleParams = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ScheduleParams {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            periodic_rate: args
                .periodic_rate
                .ok_or("--periodic-rate is required (or provide --input)")?,
            term_periods: args.term.ok_or("--term is required (or provide --input)")?,
            insurance: InsuranceModel::FlatAmount(args.insurance),
            frequency: args.frequency.into(),
            first_payment_date: args.first_payment_date,
        }
    };

    let result = build_schedule(&params)?;
    Ok(serde_json::to_value(result)?)
}
