//! Scenario modes and the series each one draws its rates from.

use crate::core::series::SeriesId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioMode {
    /// IPCA plus a fixed annual rate
    #[serde(alias = "ipca")]
    IndexPlusFixed,
    /// SELIC plus a fixed annual rate
    #[serde(alias = "selic")]
    SelicPlusFixed,
    /// Fixed annual rate only
    #[serde(alias = "fixed")]
    FixedOnly,
}

/// Which series a scenario requests and whether its rates contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSelection {
    pub series: SeriesId,
    pub label: Option<&'static str>,
    pub use_index_rate: bool,
}

// FixedOnly still requests IPCA: its calendar drives the number of months.
const SCENARIOS: [(ScenarioMode, SeriesSelection); 3] = [
    (
        ScenarioMode::IndexPlusFixed,
        SeriesSelection {
            series: SeriesId::Ipca,
            label: Some("IPCA"),
            use_index_rate: true,
        },
    ),
    (
        ScenarioMode::SelicPlusFixed,
        SeriesSelection {
            series: SeriesId::Selic,
            label: Some("SELIC"),
            use_index_rate: true,
        },
    ),
    (
        ScenarioMode::FixedOnly,
        SeriesSelection {
            series: SeriesId::Ipca,
            label: None,
            use_index_rate: false,
        },
    ),
];

impl ScenarioMode {
    pub const ALL: [ScenarioMode; 3] = [
        ScenarioMode::IndexPlusFixed,
        ScenarioMode::SelicPlusFixed,
        ScenarioMode::FixedOnly,
    ];

    const fn table_index(self) -> usize {
        match self {
            ScenarioMode::IndexPlusFixed => 0,
            ScenarioMode::SelicPlusFixed => 1,
            ScenarioMode::FixedOnly => 2,
        }
    }
}

pub fn select_series(mode: ScenarioMode) -> SeriesSelection {
    SCENARIOS[mode.table_index()].1
}

impl Display for ScenarioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ScenarioMode::IndexPlusFixed => "IPCA + fixed",
                ScenarioMode::SelicPlusFixed => "SELIC + fixed",
                ScenarioMode::FixedOnly => "Fixed only",
            }
        )
    }
}

impl FromStr for ScenarioMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ipca" | "index" => Ok(ScenarioMode::IndexPlusFixed),
            "selic" => Ok(ScenarioMode::SelicPlusFixed),
            "fixed" | "prefixado" => Ok(ScenarioMode::FixedOnly),
            _ => Err(anyhow::anyhow!("Invalid scenario mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_series_mapping() {
        let ipca = select_series(ScenarioMode::IndexPlusFixed);
        assert_eq!(ipca.series, SeriesId::Ipca);
        assert_eq!(ipca.label, Some("IPCA"));
        assert!(ipca.use_index_rate);

        let selic = select_series(ScenarioMode::SelicPlusFixed);
        assert_eq!(selic.series, SeriesId::Selic);
        assert_eq!(selic.label, Some("SELIC"));
        assert!(selic.use_index_rate);

        let fixed = select_series(ScenarioMode::FixedOnly);
        assert_eq!(fixed.series, SeriesId::Ipca);
        assert!(fixed.label.is_none());
        assert!(!fixed.use_index_rate);
    }

    #[test]
    fn test_every_mode_is_mapped_once() {
        for mode in ScenarioMode::ALL {
            assert_eq!(SCENARIOS.iter().filter(|(m, _)| *m == mode).count(), 1);
        }
    }

    #[test]
    fn test_table_rows_match_their_mode() {
        for (mode, selection) in SCENARIOS {
            assert_eq!(SCENARIOS[mode.table_index()].0, mode);
            assert_eq!(select_series(mode), selection);
        }
    }

    #[test]
    fn test_parse_scenario_mode() {
        assert_eq!(
            "IPCA".parse::<ScenarioMode>().unwrap(),
            ScenarioMode::IndexPlusFixed
        );
        assert_eq!(
            "selic".parse::<ScenarioMode>().unwrap(),
            ScenarioMode::SelicPlusFixed
        );
        assert_eq!(
            "fixed".parse::<ScenarioMode>().unwrap(),
            ScenarioMode::FixedOnly
        );
        assert!("cdi".parse::<ScenarioMode>().is_err());
    }
}
