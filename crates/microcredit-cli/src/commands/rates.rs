use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use microcredit_core::rates;
use microcredit_core::PaymentFrequency;

use crate::commands::FrequencyArg;

/// Arguments for rate conversion
#[derive(Args)]
pub struct RateArgs {
    /// Annual effective rate to convert down (0.28 = 28% EA)
    #[arg(long, conflicts_with = "periodic")]
    pub annual: Option<Decimal>,

    /// Periodic rate to convert up
    #[arg(long)]
    pub periodic: Option<Decimal>,

    /// Payment cadence
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,
}

pub fn run_rate(args: RateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let frequency: PaymentFrequency = args.frequency.into();

    let (annual, periodic) = match (args.annual, args.periodic) {
        (Some(annual), None) => {
            let periodic = rates::annual_effective_to_periodic(annual, frequency)?;
            (annual, periodic)
        }
        (None, Some(periodic)) => {
            let annual = rates::periodic_to_annual_effective(periodic, frequency)?;
            (annual, periodic)
        }
        _ => return Err("provide exactly one of --annual or --periodic".into()),
    };

    Ok(json!({
        "annual_rate": annual.to_string(),
        "periodic_rate": periodic.to_string(),
        "periods_per_year": frequency.periods_per_year(),
    }))
}
