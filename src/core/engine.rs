//! Monthly compounding of index and fixed rates.
//!
//! Every function here is a left-to-right fold over the observations in
//! chronological order, so results are reproducible bit for bit.
use crate::core::scenario::ScenarioMode;
use crate::core::series::MonthlyObservation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value of the investment right after one month has been compounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub date: NaiveDate,
    /// Running value with the index rate alone
    pub value_index_only: f64,
    /// Running value with the index and the fixed rate
    pub value_combined: f64,
    pub monthly_rate: f64,
    pub is_projected: bool,
}

/// Outcome of a single calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub mode: ScenarioMode,
    pub series_label: Option<String>,
    pub annual_fixed_rate: f64,
    pub initial_value: f64,
    pub final_value: f64,
    pub total_index_variation_pct: f64,
    pub projected_months: usize,
    pub evolution: Vec<EvolutionPoint>,
}

/// Converts an annual rate to a monthly one by plain division by twelve.
///
/// This is not the compounding-equivalent rate `(1 + f)^(1/12) - 1`; results
/// depend on the simple division being kept as is.
pub fn monthly_fixed_rate(annual_fixed_rate: f64) -> f64 {
    annual_fixed_rate / 12.0
}

/// Accumulated variation of the series, in percent.
pub fn cumulative_variation(observations: &[MonthlyObservation]) -> f64 {
    let factor = observations
        .iter()
        .fold(1.0, |acc, obs| acc * (1.0 + obs.monthly_rate / 100.0));
    (factor - 1.0) * 100.0
}

fn effective_rate(obs: &MonthlyObservation, use_index_rate: bool) -> f64 {
    if use_index_rate { obs.monthly_rate } else { 0.0 }
}

fn combined_factor(obs: &MonthlyObservation, monthly_fixed: f64, use_index_rate: bool) -> f64 {
    (1.0 + effective_rate(obs, use_index_rate) / 100.0) * (1.0 + monthly_fixed / 100.0)
}

pub fn compound_value(
    principal: f64,
    observations: &[MonthlyObservation],
    annual_fixed_rate: f64,
    use_index_rate: bool,
) -> f64 {
    let monthly_fixed = monthly_fixed_rate(annual_fixed_rate);
    observations.iter().fold(principal, |value, obs| {
        value * combined_factor(obs, monthly_fixed, use_index_rate)
    })
}

/// Builds one snapshot per observation, carrying the index-only and the
/// combined totals side by side.
pub fn build_evolution(
    principal: f64,
    observations: &[MonthlyObservation],
    annual_fixed_rate: f64,
    use_index_rate: bool,
) -> Vec<EvolutionPoint> {
    let monthly_fixed = monthly_fixed_rate(annual_fixed_rate);
    let mut index_only = principal;
    let mut combined = principal;

    observations
        .iter()
        .map(|obs| {
            index_only *= 1.0 + effective_rate(obs, use_index_rate) / 100.0;
            combined *= combined_factor(obs, monthly_fixed, use_index_rate);
            EvolutionPoint {
                date: obs.date,
                value_index_only: index_only,
                value_combined: combined,
                monthly_rate: obs.monthly_rate,
                is_projected: obs.is_projected,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn observations(rates: &[f64]) -> Vec<MonthlyObservation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        rates
            .iter()
            .enumerate()
            .map(|(i, rate)| {
                let date = start
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap();
                MonthlyObservation::published(date, *rate)
            })
            .collect()
    }

    #[test]
    fn test_cumulative_variation_matches_product() {
        let obs = observations(&[0.5, -0.2, 1.1, 0.33]);
        let expected = (1.005 * 0.998 * 1.011 * 1.0033 - 1.0) * 100.0;
        assert!((cumulative_variation(&obs) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_cumulative_variation_single_rate() {
        let obs = observations(&[0.53]);
        assert!((cumulative_variation(&obs) - 0.53).abs() < TOLERANCE);
    }

    #[test]
    fn test_cumulative_variation_empty_is_zero() {
        assert_eq!(cumulative_variation(&[]), 0.0);
    }

    #[test]
    fn test_zero_fixed_rate_is_noop() {
        let obs = observations(&[0.5, 0.3, 0.2]);
        let value = compound_value(1000.0, &obs, 0.0, true);
        assert!((value - 1000.0 * 1.005 * 1.003 * 1.002).abs() < TOLERANCE);
    }

    #[test]
    fn test_index_rate_ignored_when_disabled() {
        let obs = observations(&[0.5, 3.0, -1.0, 0.2]);
        let value = compound_value(1000.0, &obs, 6.0, false);
        let expected = 1000.0 * (1.0 + 6.0 / 12.0 / 100.0_f64).powi(4);
        assert!((value - expected).abs() < 1e-6);
    }

    #[test]
    fn test_monthly_fixed_rate_is_simple_division() {
        assert_eq!(monthly_fixed_rate(12.0), 1.0);
        assert_eq!(monthly_fixed_rate(10.0), 10.0 / 12.0);
    }

    #[test]
    fn test_evolution_ends_at_compound_value() {
        let obs = observations(&[0.42, 0.83, 0.16, 0.38, 0.46, 0.21]);
        let evolution = build_evolution(2500.0, &obs, 7.5, true);
        let value = compound_value(2500.0, &obs, 7.5, true);

        assert_eq!(evolution.len(), obs.len());
        assert_eq!(evolution.last().unwrap().value_combined, value);
    }

    #[test]
    fn test_evolution_tracks_both_totals() {
        let obs = observations(&[0.5, 0.3, 0.2]);
        let evolution = build_evolution(1000.0, &obs, 12.0, true);

        let last = evolution.last().unwrap();
        let index_only = 1000.0 * 1.005 * 1.003 * 1.002;
        let combined = 1000.0 * (1.005 * 1.01) * (1.003 * 1.01) * (1.002 * 1.01);
        assert!((last.value_index_only - index_only).abs() < 1e-6);
        assert!((last.value_combined - combined).abs() < 1e-6);
        assert!((last.value_index_only - 1010.03).abs() < 0.01);
        assert!((last.value_combined - 1040.64).abs() < 0.01);

        assert!((evolution[0].value_index_only - 1005.0).abs() < 1e-9);
        assert!((evolution[0].value_combined - 1015.05).abs() < 1e-9);
        assert_eq!(evolution[1].monthly_rate, 0.3);
        assert_eq!(evolution[2].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_evolution_fixed_only_keeps_index_flat() {
        let obs = observations(&[0.5, 0.3, 0.2]);
        let evolution = build_evolution(1000.0, &obs, 12.0, false);

        for point in &evolution {
            assert_eq!(point.value_index_only, 1000.0);
        }
        assert!((evolution[2].value_combined - 1030.301).abs() < 1e-6);
    }

    #[test]
    fn test_negative_rate_decreases_value() {
        let obs = observations(&[1.0, -2.0]);
        let evolution = build_evolution(100.0, &obs, 0.0, true);
        assert!(evolution[1].value_combined < evolution[0].value_combined);
    }

    #[test]
    fn test_projected_flag_carried_through() {
        let mut obs = observations(&[0.4, 0.4]);
        obs[1].is_projected = true;
        let evolution = build_evolution(100.0, &obs, 0.0, true);
        assert!(!evolution[0].is_projected);
        assert!(evolution[1].is_projected);
    }
}
