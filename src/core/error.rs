//! Domain errors raised while validating, fetching and compounding.

use crate::core::series::SeriesId;

/// Terminal failure of a single calculation request. No partial results are
/// produced once one of these is raised.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no data available for series {series}: {reason}")]
    DataUnavailable { series: SeriesId, reason: String },

    #[error("calculation error: {0}")]
    Calculation(String),
}

impl CalcError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        CalcError::InvalidInput(reason.into())
    }

    pub fn unavailable(series: SeriesId, reason: impl Into<String>) -> Self {
        CalcError::DataUnavailable {
            series,
            reason: reason.into(),
        }
    }
}
