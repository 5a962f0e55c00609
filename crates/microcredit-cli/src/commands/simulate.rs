use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use microcredit_core::schedule::{self, InsuranceModel, LoanRequest};

use crate::commands::{FrequencyArg, TierArg};
use crate::input;

/// Arguments for a full loan simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal in COP
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Number of payment periods
    #[arg(long)]
    pub term: Option<u32>,

    /// Annual effective rate as a fraction (0.28 = 28% EA)
    #[arg(long, alias = "tea")]
    pub annual_rate: Option<Decimal>,

    /// Payment cadence
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Flat per-period insurance amount
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Insurance as a percentage of the payment (overrides --insurance)
    #[arg(long)]
    pub insurance_pct: Option<Decimal>,

    /// Extra contribution on top of the payment, for term reduction
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Product tier (derived from the principal band when omitted)
    #[arg(long, value_enum)]
    pub tier: Option<TierArg>,

    /// First payment date (YYYY-MM-DD); rows carry projected dates
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LoanRequest = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let insurance = match (args.insurance_pct, args.insurance) {
            (Some(pct), _) => InsuranceModel::PercentOfPayment(pct),
            (None, Some(amount)) => InsuranceModel::FlatAmount(amount),
            (None, None) => InsuranceModel::default(),
        };
        LoanRequest {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_periods: args.term.ok_or("--term is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            frequency: args.frequency.into(),
            insurance,
            extra_contribution: args.extra,
            tier: args.tier.map(Into::into),
            first_payment_date: args.first_payment_date,
        }
    };

    let result = schedule::simulate(&request)?;
    Ok(serde_json::to_value(result)?)
}
