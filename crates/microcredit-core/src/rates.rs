//! Effective-rate conversions between the annual and per-payment bases.
//!
//! Colombian credit products are quoted as annual effective rates (TEA) but
//! billed monthly or weekly, so the conversion is the compounding root
//! `(1 + annual)^(1/m) - 1`, never a naive division. The compliance checker
//! converts statutory caps through these same functions so the applied rate
//! and the caps always share one basis.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MicrocreditError;
use crate::types::{PaymentFrequency, Rate};
use crate::MicrocreditResult;

/// Convert an annual effective rate to the periodic rate for `frequency`.
///
/// `(1 + annual)^(1/periods_per_year) - 1`
pub fn annual_effective_to_periodic(
    annual_rate: Rate,
    frequency: PaymentFrequency,
) -> MicrocreditResult<Rate> {
    if annual_rate < Decimal::NEGATIVE_ONE {
        return Err(MicrocreditError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual effective rate must be greater than or equal to -100%".into(),
        });
    }

    let one_plus = Decimal::ONE + annual_rate;
    if one_plus.is_zero() {
        // (0)^(1/m) = 0, so the periodic rate is exactly -100%
        return Ok(Decimal::NEGATIVE_ONE);
    }

    let root = Decimal::ONE / Decimal::from(frequency.periods_per_year());
    Ok(one_plus.powd(root) - Decimal::ONE)
}

/// Convert a periodic rate back to the annual effective basis.
///
/// `(1 + periodic)^periods_per_year - 1`
pub fn periodic_to_annual_effective(
    periodic_rate: Rate,
    frequency: PaymentFrequency,
) -> MicrocreditResult<Rate> {
    if periodic_rate < Decimal::NEGATIVE_ONE {
        return Err(MicrocreditError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Periodic rate must be greater than or equal to -100%".into(),
        });
    }

    let one_plus = Decimal::ONE + periodic_rate;
    let exponent = Decimal::from(frequency.periods_per_year());
    Ok(one_plus.powd(exponent) - Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tea_to_monthly() {
        // 28% EA -> ~2.0785% effective monthly
        let tem = annual_effective_to_periodic(dec!(0.28), PaymentFrequency::Monthly).unwrap();
        assert!((tem - dec!(0.020785)).abs() < dec!(0.0001), "got {tem}");
    }

    #[test]
    fn test_tea_to_weekly_below_monthly() {
        let tem = annual_effective_to_periodic(dec!(0.28), PaymentFrequency::Monthly).unwrap();
        let tew = annual_effective_to_periodic(dec!(0.28), PaymentFrequency::Weekly).unwrap();
        assert!(tew < tem, "weekly rate {tew} should be below monthly {tem}");
        assert!(tew > Decimal::ZERO);
    }

    #[test]
    fn test_zero_annual_is_zero_periodic() {
        let r = annual_effective_to_periodic(Decimal::ZERO, PaymentFrequency::Monthly).unwrap();
        assert_eq!(r, Decimal::ZERO);
    }

    #[test]
    fn test_round_trip() {
        let annual = dec!(0.28);
        let periodic = annual_effective_to_periodic(annual, PaymentFrequency::Monthly).unwrap();
        let back = periodic_to_annual_effective(periodic, PaymentFrequency::Monthly).unwrap();
        assert!(
            (back - annual).abs() < dec!(0.0000001),
            "round trip drifted: {back}"
        );
    }

    #[test]
    fn test_below_negative_one_rejected() {
        let err =
            annual_effective_to_periodic(dec!(-1.5), PaymentFrequency::Monthly).unwrap_err();
        match err {
            MicrocreditError::InvalidInput { field, .. } => assert_eq!(field, "annual_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_exactly_negative_one() {
        let r = annual_effective_to_periodic(dec!(-1), PaymentFrequency::Monthly).unwrap();
        assert_eq!(r, Decimal::NEGATIVE_ONE);
    }
}
