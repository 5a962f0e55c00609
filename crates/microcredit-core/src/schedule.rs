//! French-method amortization engine and the simulation facade.
//!
//! Builds the level payment, the period-by-period schedule (capital,
//! interest, insurance, running balance), and the aggregate totals for a
//! microcredit quote. All math uses `rust_decimal::Decimal`; totals are the
//! sums of the materialized rows, never derived from a rounded payment.

use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
#[cfg(feature = "compliance")]
use std::time::Instant;

use crate::error::MicrocreditError;
use crate::types::{Money, PaymentFrequency, Rate};
use crate::MicrocreditResult;

#[cfg(feature = "compliance")]
use crate::compliance::{check_compliance, ComplianceStatus};
#[cfg(feature = "compliance")]
use crate::rates;
#[cfg(feature = "compliance")]
use crate::term_reduction::estimate_reduced_term;
#[cfg(feature = "compliance")]
use crate::tiers::{ProductTier, TierKey};
#[cfg(feature = "compliance")]
use crate::types::{with_metadata, ComputationOutput};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Whole-currency-unit rounding for the legacy quick totals.
const WHOLE_UNIT: u32 = 0;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// How the per-period insurance surcharge is derived.
///
/// Insurance never enters the level-payment formula; it rides on top of the
/// base payment and does not amortize principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsuranceModel {
    /// Fixed amount added to every payment.
    FlatAmount(Money),
    /// Percentage of the base payment (0.015 = 1.5%), the age-banded form.
    PercentOfPayment(Rate),
}

impl Default for InsuranceModel {
    fn default() -> Self {
        InsuranceModel::FlatAmount(Decimal::ZERO)
    }
}

/// Engine-level parameters: the periodic rate is already normalized to the
/// payment cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub term_periods: u32,
    #[serde(default)]
    pub insurance: InsuranceModel,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// When present, rows carry projected payment dates.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_payment_date: Option<NaiveDate>,
}

/// One payment period, index 1..N.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_date: Option<NaiveDate>,
    pub interest: Money,
    pub capital: Money,
    pub insurance: Money,
    pub total_payment: Money,
    pub remaining_balance: Money,
}

/// Full amortization result for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Level payment before insurance.
    pub periodic_payment: Money,
    /// Per-period insurance surcharge implied by the insurance model.
    pub periodic_insurance: Money,
    pub rows: Vec<ScheduleRow>,
    pub total_interest: Money,
    pub total_insurance: Money,
    pub total_paid: Money,
}

/// Totals from the legacy rounded-payment shortcut. Approximate; use only
/// when no schedule is materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickTotals {
    pub total_paid: Money,
    pub total_insurance: Money,
    pub total_interest: Money,
}

/// A full simulation request: raw quote inputs, rate still on the annual
/// effective basis.
#[cfg(feature = "compliance")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    pub term_periods: u32,
    /// Annual effective rate as a fraction (0.28 = 28% EA).
    pub annual_rate: Rate,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub insurance: InsuranceModel,
    #[serde(default)]
    pub extra_contribution: Money,
    /// Explicit tier; derived from the principal band when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tier: Option<TierKey>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_payment_date: Option<NaiveDate>,
}

/// Aggregate result of a simulation.
#[cfg(feature = "compliance")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Rate normalized to the payment cadence, shared by the schedule and
    /// the compliance check.
    pub periodic_rate: Rate,
    pub tier: TierKey,
    pub schedule: AmortizationSchedule,
    /// Estimated term under `payment + extra_contribution`, only when it is
    /// strictly below the requested term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced_term_periods: Option<u32>,
    /// Periods saved relative to the requested term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_periods: Option<u32>,
    pub compliance: ComplianceStatus,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the level payment and the full amortization schedule.
///
/// A zero term yields a degenerate result (zero payment, no rows) rather
/// than an error; callers treat it as "nothing to display."
pub fn build_schedule(params: &ScheduleParams) -> MicrocreditResult<AmortizationSchedule> {
    validate_schedule_params(params)?;

    if params.term_periods == 0 {
        return Ok(AmortizationSchedule {
            periodic_payment: Decimal::ZERO,
            periodic_insurance: Decimal::ZERO,
            rows: Vec::new(),
            total_interest: Decimal::ZERO,
            total_insurance: Decimal::ZERO,
            total_paid: Decimal::ZERO,
        });
    }

    let payment = level_payment(params.principal, params.periodic_rate, params.term_periods)?;
    let periodic_insurance = match &params.insurance {
        InsuranceModel::FlatAmount(amount) => *amount,
        InsuranceModel::PercentOfPayment(pct) => payment * pct,
    };

    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(params.term_periods as usize);
    let mut balance = params.principal;
    let mut payment_date = params.first_payment_date;

    for period in 1..=params.term_periods {
        let interest = balance * params.periodic_rate;
        // Clamp so the final period retires the balance exactly and the
        // reported balance never dips below zero.
        let capital = (payment - interest).min(balance);
        balance = (balance - capital).max(Decimal::ZERO);

        rows.push(ScheduleRow {
            period,
            payment_date,
            interest,
            capital,
            insurance: periodic_insurance,
            total_payment: payment + periodic_insurance,
            remaining_balance: balance,
        });

        payment_date = payment_date.and_then(|d| next_payment_date(d, params.frequency));
    }

    let total_interest: Money = rows.iter().map(|r| r.interest).sum();
    let total_insurance: Money = rows.iter().map(|r| r.insurance).sum();
    let total_paid = params.principal + total_interest + total_insurance;

    Ok(AmortizationSchedule {
        periodic_payment: payment,
        periodic_insurance,
        rows,
        total_interest,
        total_insurance,
        total_paid,
    })
}

/// Legacy totals from a rounded payment, for callers that never materialize
/// a schedule. Rounding makes these drift from the summed totals by up to a
/// few currency units; the schedule sums are authoritative.
pub fn quick_totals(
    principal: Money,
    term_periods: u32,
    periodic_payment: Money,
    periodic_insurance: Money,
) -> QuickTotals {
    let n = Decimal::from(term_periods);
    let total_paid = round_unit(periodic_payment + periodic_insurance) * n;
    let total_insurance = round_unit(periodic_insurance) * n;
    let total_interest = total_paid - principal - total_insurance;
    QuickTotals {
        total_paid,
        total_insurance,
        total_interest,
    }
}

/// Run a full simulation: normalize the rate, amortize, estimate the
/// term reduction, and classify the rate against the tier caps.
///
/// This is the single recompute entry point the UI layer calls on every
/// input change; it holds no state between invocations.
#[cfg(feature = "compliance")]
pub fn simulate(request: &LoanRequest) -> MicrocreditResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_request(request)?;

    let tier = match request.tier {
        Some(key) => ProductTier::get(key),
        None => ProductTier::for_principal(request.principal),
    };

    let periodic_rate = rates::annual_effective_to_periodic(request.annual_rate, request.frequency)?;

    if request.term_periods == 0 {
        warnings.push("Term of zero periods: no schedule to display".into());
    }
    if request.term_periods > tier.max_term_periods {
        warnings.push(format!(
            "Requested term of {} periods exceeds the {} maximum for the {:?} tier",
            request.term_periods, tier.max_term_periods, tier.key
        ));
    }

    let schedule = build_schedule(&ScheduleParams {
        principal: request.principal,
        periodic_rate,
        term_periods: request.term_periods,
        insurance: request.insurance.clone(),
        frequency: request.frequency,
        first_payment_date: request.first_payment_date,
    })?;

    // Term reduction from the augmented payment. Insurance is excluded:
    // it does not amortize principal.
    let (reduced_term_periods, savings_periods) = if request.extra_contribution > Decimal::ZERO
        && request.term_periods > 0
    {
        let augmented = schedule.periodic_payment + request.extra_contribution;
        match estimate_reduced_term(request.principal, periodic_rate, augmented) {
            Some(n) if n < request.term_periods => (Some(n), Some(request.term_periods - n)),
            Some(_) => {
                warnings.push("Extra contribution does not shorten the term".into());
                (None, None)
            }
            None => {
                warnings.push(
                    "Extra contribution is insufficient to reduce the term at this rate".into(),
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    // Same periodic rate the engine amortized with.
    let compliance = check_compliance(periodic_rate, &tier.caps, request.frequency)?;
    match compliance {
        ComplianceStatus::AboveCeiling => warnings.push(format!(
            "Rate {} EA exceeds the usury ceiling {} EA for the {:?} tier; this quote must not be offered",
            request.annual_rate, tier.caps.ceiling_annual, tier.key
        )),
        ComplianceStatus::AboveReference => warnings.push(format!(
            "Rate {} EA is above the {} EA reference rate for the {:?} tier",
            request.annual_rate, tier.caps.reference_annual, tier.key
        )),
        ComplianceStatus::Compliant => {}
    }

    let output = SimulationOutput {
        periodic_rate,
        tier: tier.key,
        schedule,
        reduced_term_periods,
        savings_periods,
        compliance,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French-method amortization with effective-rate conversion, inverse-annuity term reduction, and usury-cap check",
        &serde_json::json!({
            "principal": request.principal.to_string(),
            "term_periods": request.term_periods,
            "annual_rate": request.annual_rate.to_string(),
            "frequency": format!("{:?}", request.frequency),
            "tier": format!("{:?}", tier.key),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_schedule_params(params: &ScheduleParams) -> MicrocreditResult<()> {
    if params.principal <= Decimal::ZERO {
        return Err(MicrocreditError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if params.periodic_rate < Decimal::ZERO {
        return Err(MicrocreditError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Periodic rate must be non-negative".into(),
        });
    }
    validate_insurance(&params.insurance)
}

#[cfg(feature = "compliance")]
fn validate_request(request: &LoanRequest) -> MicrocreditResult<()> {
    if request.principal <= Decimal::ZERO {
        return Err(MicrocreditError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if request.annual_rate < Decimal::ZERO {
        return Err(MicrocreditError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual effective rate must be non-negative".into(),
        });
    }
    if request.extra_contribution < Decimal::ZERO {
        return Err(MicrocreditError::InvalidInput {
            field: "extra_contribution".into(),
            reason: "Extra contribution cannot be negative".into(),
        });
    }
    validate_insurance(&request.insurance)
}

fn validate_insurance(insurance: &InsuranceModel) -> MicrocreditResult<()> {
    match insurance {
        InsuranceModel::FlatAmount(amount) if *amount < Decimal::ZERO => {
            Err(MicrocreditError::InvalidInput {
                field: "insurance".into(),
                reason: "Flat insurance amount cannot be negative".into(),
            })
        }
        InsuranceModel::PercentOfPayment(pct) if *pct < Decimal::ZERO => {
            Err(MicrocreditError::InvalidInput {
                field: "insurance".into(),
                reason: "Insurance percentage cannot be negative".into(),
            })
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Level payment of the French method.
///
/// The zero-rate branch is explicit: the general formula divides by
/// `(1+r)^n - 1`, which is zero at `r = 0`.
fn level_payment(principal: Money, periodic_rate: Rate, term_periods: u32) -> MicrocreditResult<Money> {
    let n = Decimal::from(term_periods);

    if periodic_rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = (Decimal::ONE + periodic_rate).powd(n);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(MicrocreditError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    Ok(principal * periodic_rate * factor / denominator)
}

/// Step a payment date forward one period.
fn next_payment_date(date: NaiveDate, frequency: PaymentFrequency) -> Option<NaiveDate> {
    match frequency {
        PaymentFrequency::Monthly => date.checked_add_months(Months::new(1)),
        PaymentFrequency::Weekly => date.checked_add_signed(Duration::weeks(1)),
    }
}

fn round_unit(value: Money) -> Money {
    value.round_dp_with_strategy(WHOLE_UNIT, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn params(principal: Money, rate: Rate, term: u32) -> ScheduleParams {
        ScheduleParams {
            principal,
            periodic_rate: rate,
            term_periods: term,
            insurance: InsuranceModel::default(),
            frequency: PaymentFrequency::Monthly,
            first_payment_date: None,
        }
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let schedule = build_schedule(&params(dec!(1_200_000), dec!(0), 12)).unwrap();
        assert_eq!(schedule.periodic_payment, dec!(100_000));
        for row in &schedule.rows {
            assert_eq!(row.capital, dec!(100_000));
            assert_eq!(row.interest, Decimal::ZERO);
        }
        assert_eq!(schedule.total_interest, Decimal::ZERO);
        assert_eq!(schedule.total_paid, dec!(1_200_000));
        assert_eq!(schedule.rows.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_degenerate() {
        let schedule = build_schedule(&params(dec!(1_000_000), dec!(0.02), 0)).unwrap();
        assert_eq!(schedule.periodic_payment, Decimal::ZERO);
        assert!(schedule.rows.is_empty());
        assert_eq!(schedule.total_paid, Decimal::ZERO);
    }

    #[test]
    fn test_full_amortization() {
        let schedule = build_schedule(&params(dec!(1_000_000), dec!(0.02), 12)).unwrap();
        let final_balance = schedule.rows.last().unwrap().remaining_balance;
        assert!(
            final_balance < dec!(1),
            "schedule should fully amortize, residual {final_balance}"
        );
        // capital + interest = base payment on every row except terminal drift
        for row in &schedule.rows[..schedule.rows.len() - 1] {
            let split = row.capital + row.interest;
            assert!(
                (split - schedule.periodic_payment).abs() < dec!(0.000001),
                "period {}: {} vs payment {}",
                row.period,
                split,
                schedule.periodic_payment
            );
        }
    }

    #[test]
    fn test_balance_monotonically_non_increasing() {
        let schedule = build_schedule(&params(dec!(2_500_000), dec!(0.018), 18)).unwrap();
        let mut prev = dec!(2_500_000);
        for row in &schedule.rows {
            assert!(row.remaining_balance <= prev);
            prev = row.remaining_balance;
        }
    }

    #[test]
    fn test_flat_insurance_rides_on_top() {
        let mut p = params(dec!(1_000_000), dec!(0.02), 12);
        p.insurance = InsuranceModel::FlatAmount(dec!(5_000));
        let with_ins = build_schedule(&p).unwrap();
        let without = build_schedule(&params(dec!(1_000_000), dec!(0.02), 12)).unwrap();

        // Base payment unchanged by insurance
        assert_eq!(with_ins.periodic_payment, without.periodic_payment);
        assert_eq!(with_ins.periodic_insurance, dec!(5_000));
        assert_eq!(with_ins.total_insurance, dec!(60_000));
        assert_eq!(
            with_ins.rows[0].total_payment,
            without.periodic_payment + dec!(5_000)
        );
        assert_eq!(with_ins.total_paid, without.total_paid + dec!(60_000));
    }

    #[test]
    fn test_percent_insurance_matches_equivalent_flat() {
        let base = build_schedule(&params(dec!(1_000_000), dec!(0.02), 12)).unwrap();
        let pct = dec!(0.015);
        let equivalent_flat = base.periodic_payment * pct;

        let mut p_pct = params(dec!(1_000_000), dec!(0.02), 12);
        p_pct.insurance = InsuranceModel::PercentOfPayment(pct);
        let mut p_flat = params(dec!(1_000_000), dec!(0.02), 12);
        p_flat.insurance = InsuranceModel::FlatAmount(equivalent_flat);

        let s_pct = build_schedule(&p_pct).unwrap();
        let s_flat = build_schedule(&p_flat).unwrap();
        assert_eq!(s_pct.total_paid, s_flat.total_paid);
        assert_eq!(s_pct.periodic_insurance, s_flat.periodic_insurance);
    }

    #[test]
    fn test_payment_dates_monthly() {
        let mut p = params(dec!(600_000), dec!(0.02), 3);
        p.first_payment_date = NaiveDate::from_ymd_opt(2026, 1, 15);
        let schedule = build_schedule(&p).unwrap();
        let dates: Vec<NaiveDate> = schedule.rows.iter().filter_map(|r| r.payment_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            ]
        );
    }

    #[test]
    fn test_payment_dates_weekly() {
        let mut p = params(dec!(200_000), dec!(0.005), 2);
        p.frequency = PaymentFrequency::Weekly;
        p.first_payment_date = NaiveDate::from_ymd_opt(2026, 3, 2);
        let schedule = build_schedule(&p).unwrap();
        assert_eq!(
            schedule.rows[1].payment_date,
            NaiveDate::from_ymd_opt(2026, 3, 9)
        );
    }

    #[test]
    fn test_negative_principal_rejected() {
        let err = build_schedule(&params(dec!(-100), dec!(0.02), 12)).unwrap_err();
        match err {
            MicrocreditError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = build_schedule(&params(dec!(100), dec!(-0.01), 12)).unwrap_err();
        match err {
            MicrocreditError::InvalidInput { field, .. } => assert_eq!(field, "periodic_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_insurance_rejected() {
        let mut p = params(dec!(100_000), dec!(0.02), 6);
        p.insurance = InsuranceModel::FlatAmount(dec!(-1));
        assert!(build_schedule(&p).is_err());
    }

    #[test]
    fn test_quick_totals_zero_rate_exact() {
        // With a whole payment and no rounding drift the shortcut agrees
        // with the summed totals.
        let qt = quick_totals(dec!(1_200_000), 12, dec!(100_000), dec!(0));
        assert_eq!(qt.total_paid, dec!(1_200_000));
        assert_eq!(qt.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_quick_totals_rounding_drift() {
        let schedule = build_schedule(&params(dec!(1_000_000), dec!(0.02), 12)).unwrap();
        let qt = quick_totals(
            dec!(1_000_000),
            12,
            schedule.periodic_payment,
            Decimal::ZERO,
        );
        // Drift bounded by half a unit per period
        assert!((qt.total_paid - schedule.total_paid).abs() <= dec!(6));
    }
}
