//! Monthly index series abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Index series published by the statistics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesId {
    Ipca,
    Selic,
}

impl SeriesId {
    /// Numeric code of the series in the BCB SGS catalogue.
    pub fn code(&self) -> u32 {
        match self {
            SeriesId::Ipca => 433,
            SeriesId::Selic => 4390,
        }
    }
}

impl Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SeriesId::Ipca => "IPCA",
                SeriesId::Selic => "SELIC",
            }
        )
    }
}

impl FromStr for SeriesId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IPCA" | "433" => Ok(SeriesId::Ipca),
            "SELIC" | "4390" => Ok(SeriesId::Selic),
            _ => Err(anyhow::anyhow!("Invalid series: {}", s)),
        }
    }
}

/// A raw record as returned by the fetch collaborator, before parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Date formatted as `dd/mm/yyyy`
    pub date: String,
    /// Monthly rate as a decimal string, in percent
    pub value: String,
}

/// One month of an index series. `monthly_rate` is a percentage, so `0.53`
/// means 0.53%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyObservation {
    pub date: NaiveDate,
    pub monthly_rate: f64,
    pub is_projected: bool,
}

impl MonthlyObservation {
    pub fn published(date: NaiveDate, monthly_rate: f64) -> Self {
        Self {
            date,
            monthly_rate,
            is_projected: false,
        }
    }

    pub fn projected(date: NaiveDate, monthly_rate: f64) -> Self {
        Self {
            date,
            monthly_rate,
            is_projected: true,
        }
    }
}

#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetches the published records of `series` between `start` and `end`,
    /// both inclusive.
    async fn fetch_series(
        &self,
        series: SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeriesRecord>>;
}
