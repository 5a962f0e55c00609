//! Term-reduction estimate for extra per-period contributions.
//!
//! Inverts the annuity formula for the period count given an augmented
//! payment: `n = -ln(1 - r·P/payment) / ln(1 + r)`. Insurance is excluded
//! from the augmented payment — it does not amortize principal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// Floor applied to the augmented payment before dividing.
const MIN_AUGMENTED_PAYMENT: Decimal = dec!(0.01);

/// Estimate how many periods retire `principal` at `periodic_rate` when the
/// borrower pays `augmented_payment` (base payment plus extra contribution,
/// insurance excluded) every period.
///
/// Returns `None` when the estimate is undefined: a non-positive rate has no
/// inverse-annuity solution in this model, and a payment at or below the
/// per-period interest accrual never amortizes.
pub fn estimate_reduced_term(
    principal: Money,
    periodic_rate: Rate,
    augmented_payment: Money,
) -> Option<u32> {
    if periodic_rate <= Decimal::ZERO {
        return None;
    }

    let payment = augmented_payment.max(MIN_AUGMENTED_PAYMENT);
    let inside = Decimal::ONE - (periodic_rate * principal) / payment;
    if inside <= Decimal::ZERO {
        return None;
    }

    let n = -inside.ln() / (Decimal::ONE + periodic_rate).ln();
    let rounded = n.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    rounded.to_u32().map(|periods| periods.max(1))
}
