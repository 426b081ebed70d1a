pub mod calc;
pub mod compare;
pub mod series;
pub mod setup;
pub mod ui;
