//! Turns fetched series records into a monthly calendar covering the
//! requested range, projecting months that are not published yet.
use crate::core::error::CalcError;
use crate::core::projection::{average_rate, project_forward};
use crate::core::series::{MonthlyObservation, SeriesId, SeriesProvider, SeriesRecord};
use chrono::NaiveDate;
use tracing::debug;

const RECORD_DATE_FORMAT: &str = "%d/%m/%Y";

fn parse_record(series: SeriesId, record: &SeriesRecord) -> Result<MonthlyObservation, CalcError> {
    let date = NaiveDate::parse_from_str(record.date.trim(), RECORD_DATE_FORMAT).map_err(|e| {
        CalcError::unavailable(series, format!("invalid date '{}': {e}", record.date))
    })?;
    let monthly_rate = record
        .value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| {
            CalcError::unavailable(series, format!("invalid rate '{}': {e}", record.value))
        })?;
    if !monthly_rate.is_finite() {
        return Err(CalcError::unavailable(
            series,
            format!("invalid rate '{}'", record.value),
        ));
    }
    Ok(MonthlyObservation::published(date, monthly_rate))
}

/// Parses raw records into chronologically ordered observations, keeping one
/// entry per date.
pub fn parse_records(
    series: SeriesId,
    records: &[SeriesRecord],
) -> Result<Vec<MonthlyObservation>, CalcError> {
    let mut observations = records
        .iter()
        .map(|record| parse_record(series, record))
        .collect::<Result<Vec<_>, _>>()?;

    observations.sort_by_key(|obs| obs.date);
    observations.dedup_by_key(|obs| obs.date);
    Ok(observations)
}

/// Appends projected months when the published data stops before `end`.
pub fn extend_to(mut observations: Vec<MonthlyObservation>, end: NaiveDate) -> Vec<MonthlyObservation> {
    let Some(last) = observations.last() else {
        return observations;
    };
    if last.date >= end {
        return observations;
    }

    let rate = average_rate(&observations);
    let projected = project_forward(last.date, end, rate);
    debug!(
        "Published data ends at {}; projecting {} month(s) at {:.4}%",
        last.date,
        projected.len(),
        rate
    );
    observations.extend(projected);
    observations
}

/// Fetches `series` for `[start, end]` and extends it by projection up to
/// `end` when published data does not reach that far.
pub async fn resolve_observations(
    provider: &(dyn SeriesProvider + Send + Sync),
    series: SeriesId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MonthlyObservation>, CalcError> {
    let records = provider
        .fetch_series(series, start, end)
        .await
        .map_err(|e| CalcError::unavailable(series, format!("{e:#}")))?;

    if records.is_empty() {
        return Err(CalcError::unavailable(series, "fetch returned no records"));
    }

    let observations = parse_records(series, &records)?;
    debug!(
        "Resolved {} published observation(s) for {}",
        observations.len(),
        series
    );
    Ok(extend_to(observations, end))
}
