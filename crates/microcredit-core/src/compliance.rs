//! Usury-ceiling and reference-rate classification.
//!
//! Each product tier carries two annual effective values: an advisory
//! reference rate (interest-banking-cost benchmark) and the statutory usury
//! ceiling. Both are converted to the per-payment basis through
//! [`crate::rates::annual_effective_to_periodic`] — the same conversion the
//! amortization engine uses — so a quoted rate is always compared against
//! caps in its own basis.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MicrocreditError;
use crate::rates;
use crate::types::{PaymentFrequency, Rate};
use crate::MicrocreditResult;

/// Outcome of comparing a periodic rate against tier caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// At or below the reference rate.
    Compliant,
    /// Above the reference but at or below the ceiling. Informational only.
    AboveReference,
    /// Above the usury ceiling. The configuration must not be offered.
    AboveCeiling,
}

impl ComplianceStatus {
    /// Whether this status blocks quoting the loan.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ComplianceStatus::AboveCeiling)
    }
}

/// Annual effective reference and ceiling rates for a product tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCaps {
    pub reference_annual: Rate,
    pub ceiling_annual: Rate,
}

impl RateCaps {
    /// Caps given directly as two annual effective rates.
    pub fn new(reference_annual: Rate, ceiling_annual: Rate) -> MicrocreditResult<Self> {
        if reference_annual < Decimal::ZERO {
            return Err(MicrocreditError::InvalidInput {
                field: "reference_annual".into(),
                reason: "Reference rate must be non-negative".into(),
            });
        }
        if ceiling_annual < reference_annual {
            return Err(MicrocreditError::InvalidInput {
                field: "ceiling_annual".into(),
                reason: "Ceiling rate cannot be below the reference rate".into(),
            });
        }
        Ok(RateCaps {
            reference_annual,
            ceiling_annual,
        })
    }

    /// Caps in the ceiling-as-multiple form: `ceiling = reference × factor`,
    /// the usual statutory construction (1.5× the certified reference).
    pub fn from_reference(reference_annual: Rate, statutory_factor: Decimal) -> MicrocreditResult<Self> {
        if statutory_factor < Decimal::ONE {
            return Err(MicrocreditError::InvalidInput {
                field: "statutory_factor".into(),
                reason: "Statutory factor must be at least 1".into(),
            });
        }
        RateCaps::new(reference_annual, reference_annual * statutory_factor)
    }
}

/// Classify `periodic_rate` against `caps`, converting both caps to the
/// periodic basis for `frequency`.
///
/// Boundaries are strict: a rate exactly at the ceiling is advisory, not
/// blocked; exactly at the reference is compliant.
pub fn check_compliance(
    periodic_rate: Rate,
    caps: &RateCaps,
    frequency: PaymentFrequency,
) -> MicrocreditResult<ComplianceStatus> {
    let reference_periodic = rates::annual_effective_to_periodic(caps.reference_annual, frequency)?;
    let ceiling_periodic = rates::annual_effective_to_periodic(caps.ceiling_annual, frequency)?;

    if periodic_rate > ceiling_periodic {
        Ok(ComplianceStatus::AboveCeiling)
    } else if periodic_rate > reference_periodic {
        Ok(ComplianceStatus::AboveReference)
    } else {
        Ok(ComplianceStatus::Compliant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn caps() -> RateCaps {
        RateCaps::from_reference(dec!(0.26), dec!(1.5)).unwrap()
    }

    #[test]
    fn test_ceiling_is_reference_times_factor() {
        assert_eq!(caps().ceiling_annual, dec!(0.39));
    }

    #[test]
    fn test_below_reference_compliant() {
        let periodic =
            rates::annual_effective_to_periodic(dec!(0.20), PaymentFrequency::Monthly).unwrap();
        let status = check_compliance(periodic, &caps(), PaymentFrequency::Monthly).unwrap();
        assert_eq!(status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_between_reference_and_ceiling_advisory() {
        let periodic =
            rates::annual_effective_to_periodic(dec!(0.30), PaymentFrequency::Monthly).unwrap();
        let status = check_compliance(periodic, &caps(), PaymentFrequency::Monthly).unwrap();
        assert_eq!(status, ComplianceStatus::AboveReference);
        assert!(!status.is_blocking());
    }

    #[test]
    fn test_above_ceiling_blocked() {
        let periodic =
            rates::annual_effective_to_periodic(dec!(0.45), PaymentFrequency::Monthly).unwrap();
        let status = check_compliance(periodic, &caps(), PaymentFrequency::Monthly).unwrap();
        assert_eq!(status, ComplianceStatus::AboveCeiling);
        assert!(status.is_blocking());
    }

    #[test]
    fn test_exactly_at_reference_compliant() {
        let periodic =
            rates::annual_effective_to_periodic(dec!(0.26), PaymentFrequency::Monthly).unwrap();
        let status = check_compliance(periodic, &caps(), PaymentFrequency::Monthly).unwrap();
        assert_eq!(status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_exactly_at_ceiling_advisory() {
        let periodic =
            rates::annual_effective_to_periodic(dec!(0.39), PaymentFrequency::Monthly).unwrap();
        let status = check_compliance(periodic, &caps(), PaymentFrequency::Monthly).unwrap();
        assert_eq!(status, ComplianceStatus::AboveReference);
    }

    #[test]
    fn test_ceiling_below_reference_rejected() {
        let err = RateCaps::new(dec!(0.30), dec!(0.20)).unwrap_err();
        match err {
            MicrocreditError::InvalidInput { field, .. } => assert_eq!(field, "ceiling_annual"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
