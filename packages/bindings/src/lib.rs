use napi::Result as NapiResult;
use napi_derive::napi;

use serde::Deserialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_loan(input_json: String) -> NapiResult<String> {
    let request: microcredit_core::schedule::LoanRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = microcredit_core::schedule::simulate(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let params: microcredit_core::schedule::ScheduleParams =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = microcredit_core::schedule::build_schedule(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rates & compliance
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RateConversionInput {
    annual_rate: Option<microcredit_core::Rate>,
    periodic_rate: Option<microcredit_core::Rate>,
    #[serde(default)]
    frequency: microcredit_core::PaymentFrequency,
}

#[napi]
pub fn convert_rate(input_json: String) -> NapiResult<String> {
    let input: RateConversionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;

    let (annual, periodic) = match (input.annual_rate, input.periodic_rate) {
        (Some(annual), None) => {
            let periodic =
                microcredit_core::rates::annual_effective_to_periodic(annual, input.frequency)
                    .map_err(to_napi_error)?;
            (annual, periodic)
        }
        (None, Some(periodic)) => {
            let annual =
                microcredit_core::rates::periodic_to_annual_effective(periodic, input.frequency)
                    .map_err(to_napi_error)?;
            (annual, periodic)
        }
        _ => {
            return Err(napi::Error::from_reason(
                "provide exactly one of annual_rate or periodic_rate",
            ))
        }
    };

    serde_json::to_string(&serde_json::json!({
        "annual_rate": annual.to_string(),
        "periodic_rate": periodic.to_string(),
        "periods_per_year": input.frequency.periods_per_year(),
    }))
    .map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ComplianceCheckInput {
    periodic_rate: microcredit_core::Rate,
    caps: microcredit_core::compliance::RateCaps,
    #[serde(default)]
    frequency: microcredit_core::PaymentFrequency,
}

#[napi]
pub fn check_rate_compliance(input_json: String) -> NapiResult<String> {
    let input: ComplianceCheckInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let status = microcredit_core::compliance::check_compliance(
        input.periodic_rate,
        &input.caps,
        input.frequency,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&status).map_err(to_napi_error)
}
