//! Validates a calculation request and runs it end to end.
use crate::core::engine::{self, CalculationResult};
use crate::core::error::CalcError;
use crate::core::resolver::resolve_observations;
use crate::core::scenario::{ScenarioMode, select_series};
use crate::core::series::SeriesProvider;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Earliest start date the statistics API reliably covers.
pub fn default_earliest_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Caller-configured rules on accepted date ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    #[serde(default = "default_earliest_start")]
    pub earliest_start: NaiveDate,
    #[serde(default = "default_allow_future_end")]
    pub allow_future_end: bool,
    /// How many months past today an end date may reach
    #[serde(default = "default_max_projected_months")]
    pub max_projected_months: u32,
}

fn default_allow_future_end() -> bool {
    true
}

fn default_max_projected_months() -> u32 {
    120
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy {
            earliest_start: default_earliest_start(),
            allow_future_end: default_allow_future_end(),
            max_projected_months: default_max_projected_months(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub mode: ScenarioMode,
    pub principal: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Annual fixed rate in percent, e.g. `6.0` for 6% a year
    pub annual_fixed_rate: f64,
}

impl CalculationRequest {
    pub fn validate(&self, policy: &ValidationPolicy, today: NaiveDate) -> Result<(), CalcError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(CalcError::invalid(format!(
                "principal must be a positive amount, got {}",
                self.principal
            )));
        }
        if !self.annual_fixed_rate.is_finite() {
            return Err(CalcError::invalid(format!(
                "fixed rate must be a number, got {}",
                self.annual_fixed_rate
            )));
        }
        validate_range(self.start, self.end, policy, today)
    }
}

/// Checks a requested date range against `policy`.
pub fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    policy: &ValidationPolicy,
    today: NaiveDate,
) -> Result<(), CalcError> {
    if start >= end {
        return Err(CalcError::invalid(format!(
            "start date {start} must be before end date {end}"
        )));
    }
    if start < policy.earliest_start {
        return Err(CalcError::invalid(format!(
            "start date {start} is before the earliest supported date {}",
            policy.earliest_start
        )));
    }
    if !policy.allow_future_end && end > today {
        return Err(CalcError::invalid(format!("end date {end} is in the future")));
    }
    let months_ahead = months_between(today, end);
    if months_ahead > i64::from(policy.max_projected_months) {
        return Err(CalcError::invalid(format!(
            "end date {end} is {months_ahead} months ahead, at most {} can be projected",
            policy.max_projected_months
        )));
    }
    Ok(())
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Parses a user supplied date in either `YYYY-MM-DD` or `dd/mm/yyyy` form.
pub fn parse_date(input: &str) -> Result<NaiveDate, CalcError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CalcError::invalid("date is missing"));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| CalcError::invalid(format!("invalid date '{input}'")))
}

pub async fn calculate(
    request: &CalculationRequest,
    provider: &(dyn SeriesProvider + Send + Sync),
    policy: &ValidationPolicy,
    today: NaiveDate,
) -> Result<CalculationResult, CalcError> {
    request.validate(policy, today)?;

    let selection = select_series(request.mode);
    debug!(
        "Scenario {} uses series {} (index rate applied: {})",
        request.mode, selection.series, selection.use_index_rate
    );

    let observations =
        resolve_observations(provider, selection.series, request.start, request.end).await?;

    let evolution = engine::build_evolution(
        request.principal,
        &observations,
        request.annual_fixed_rate,
        selection.use_index_rate,
    );
    let final_value = engine::compound_value(
        request.principal,
        &observations,
        request.annual_fixed_rate,
        selection.use_index_rate,
    );
    let total_index_variation_pct = if selection.use_index_rate {
        engine::cumulative_variation(&observations)
    } else {
        0.0
    };

    if !final_value.is_finite() || !total_index_variation_pct.is_finite() {
        return Err(CalcError::Calculation(format!(
            "non-finite result over {} month(s)",
            observations.len()
        )));
    }

    Ok(CalculationResult {
        mode: request.mode,
        series_label: selection.label.map(str::to_string),
        annual_fixed_rate: request.annual_fixed_rate,
        initial_value: request.principal,
        final_value,
        total_index_variation_pct,
        projected_months: observations.iter().filter(|o| o.is_projected).count(),
        evolution,
    })
}
