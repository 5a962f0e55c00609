//! Product tiers by principal band.
//!
//! Colombian consumer credit splits into a low-amount regime (crédito de
//! consumo de bajo monto) with its own certified reference rate, and the
//! ordinary consumer regime. Each band carries the regulatory caps, a
//! maximum term, and the default quoted rate for the simulator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::compliance::RateCaps;
use crate::types::{Money, Rate};

/// Principal ceiling for the low-amount band.
const LOW_AMOUNT_MAX_PRINCIPAL: Decimal = dec!(2_000_000);

/// Statutory usury factor: ceiling = 1.5 × certified reference.
const USURY_FACTOR: Decimal = dec!(1.5);

/// Category key selecting a product tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierKey {
    LowAmount,
    Standard,
}

/// Regulatory caps and default bounds for one principal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTier {
    pub key: TierKey,
    /// Inclusive upper bound of the band, None for the open-ended top band.
    pub max_principal: Option<Money>,
    pub caps: RateCaps,
    pub max_term_periods: u32,
    pub default_annual_rate: Rate,
}

impl ProductTier {
    /// The tier configuration for `key`.
    pub fn get(key: TierKey) -> ProductTier {
        match key {
            TierKey::LowAmount => ProductTier {
                key,
                max_principal: Some(LOW_AMOUNT_MAX_PRINCIPAL),
                caps: RateCaps {
                    reference_annual: dec!(0.3653),
                    ceiling_annual: dec!(0.3653) * USURY_FACTOR,
                },
                max_term_periods: 24,
                default_annual_rate: dec!(0.28),
            },
            TierKey::Standard => ProductTier {
                key,
                max_principal: None,
                caps: RateCaps {
                    reference_annual: dec!(0.2635),
                    ceiling_annual: dec!(0.2635) * USURY_FACTOR,
                },
                max_term_periods: 36,
                default_annual_rate: dec!(0.24),
            },
        }
    }

    /// Select the tier whose principal band contains `principal`.
    pub fn for_principal(principal: Money) -> ProductTier {
        if principal <= LOW_AMOUNT_MAX_PRINCIPAL {
            ProductTier::get(TierKey::LowAmount)
        } else {
            ProductTier::get(TierKey::Standard)
        }
    }

    /// All tiers, low band first.
    pub fn all() -> Vec<ProductTier> {
        vec![
            ProductTier::get(TierKey::LowAmount),
            ProductTier::get(TierKey::Standard),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_band_selection() {
        assert_eq!(
            ProductTier::for_principal(dec!(1_200_000)).key,
            TierKey::LowAmount
        );
        assert_eq!(
            ProductTier::for_principal(dec!(5_000_000)).key,
            TierKey::Standard
        );
    }

    #[test]
    fn test_band_edge_is_low_amount() {
        assert_eq!(
            ProductTier::for_principal(dec!(2_000_000)).key,
            TierKey::LowAmount
        );
        assert_eq!(
            ProductTier::for_principal(dec!(2_000_000.01)).key,
            TierKey::Standard
        );
    }

    #[test]
    fn test_default_rates_within_caps() {
        for tier in ProductTier::all() {
            assert!(
                tier.default_annual_rate <= tier.caps.ceiling_annual,
                "{:?} default rate exceeds its own ceiling",
                tier.key
            );
        }
    }

    #[test]
    fn test_low_amount_caps_above_standard() {
        let low = ProductTier::get(TierKey::LowAmount);
        let std_tier = ProductTier::get(TierKey::Standard);
        assert!(low.caps.reference_annual > std_tier.caps.reference_annual);
        assert!(low.max_term_periods < std_tier.max_term_periods);
    }
}
