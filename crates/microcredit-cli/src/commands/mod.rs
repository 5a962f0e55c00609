pub mod compliance;
pub mod rates;
pub mod schedule;
pub mod simulate;

use clap::ValueEnum;
use microcredit_core::tiers::TierKey;
use microcredit_core::PaymentFrequency;

/// Payment cadence as a CLI flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Weekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::Weekly => PaymentFrequency::Weekly,
        }
    }
}

/// Product tier as a CLI flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TierArg {
    LowAmount,
    Standard,
}

impl From<TierArg> for TierKey {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::LowAmount => TierKey::LowAmount,
            TierArg::Standard => TierKey::Standard,
        }
    }
}
