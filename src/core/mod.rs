//! Core business logic: scenario dispatch, series resolution, projection and
//! compounding

pub mod cache;
pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod projection;
pub mod resolver;
pub mod scenario;
pub mod series;

// Re-export main types for cleaner imports
pub use calculator::{CalculationRequest, ValidationPolicy, calculate};
pub use engine::{CalculationResult, EvolutionPoint};
pub use error::CalcError;
pub use scenario::{ScenarioMode, SeriesSelection, select_series};
pub use series::{MonthlyObservation, SeriesId, SeriesProvider, SeriesRecord};
