use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use microcredit_core::compliance::{check_compliance, RateCaps};
use microcredit_core::rates;
use microcredit_core::tiers::ProductTier;
use microcredit_core::PaymentFrequency;

use crate::commands::{FrequencyArg, TierArg};

/// Arguments for usury-cap classification
#[derive(Args)]
pub struct ComplianceArgs {
    /// Annual effective rate to classify (converted to the periodic basis)
    #[arg(long, conflicts_with = "periodic_rate")]
    pub annual_rate: Option<Decimal>,

    /// Periodic rate to classify, already normalized
    #[arg(long)]
    pub periodic_rate: Option<Decimal>,

    /// Product tier supplying the caps
    #[arg(long, value_enum, conflicts_with_all = ["reference", "ceiling"])]
    pub tier: Option<TierArg>,

    /// Custom annual reference rate
    #[arg(long, requires = "ceiling")]
    pub reference: Option<Decimal>,

    /// Custom annual ceiling rate
    #[arg(long, requires = "reference")]
    pub ceiling: Option<Decimal>,

    /// Payment cadence
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,
}

pub fn run_compliance(args: ComplianceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let frequency: PaymentFrequency = args.frequency.into();

    let periodic_rate = match (args.annual_rate, args.periodic_rate) {
        (Some(annual), None) => rates::annual_effective_to_periodic(annual, frequency)?,
        (None, Some(periodic)) => periodic,
        _ => return Err("provide exactly one of --annual-rate or --periodic-rate".into()),
    };

    let caps = match (args.tier, args.reference, args.ceiling) {
        (Some(tier), None, None) => ProductTier::get(tier.into()).caps,
        (None, Some(reference), Some(ceiling)) => RateCaps::new(reference, ceiling)?,
        _ => return Err("provide --tier, or both --reference and --ceiling".into()),
    };

    let status = check_compliance(periodic_rate, &caps, frequency)?;

    Ok(json!({
        "periodic_rate": periodic_rate.to_string(),
        "reference_annual": caps.reference_annual.to_string(),
        "ceiling_annual": caps.ceiling_annual.to_string(),
        "status": format!("{status:?}"),
        "blocking": status.is_blocking(),
    }))
}

pub fn run_tiers() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(ProductTier::all())?)
}
