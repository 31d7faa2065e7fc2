//! Date picker engine: Monday-first month grids with navigation state.
//!
//! Features:
//! - Week/day matrices padded with blank slots, one per displayed month
//! - Month and year navigation with explicit calendar normalization
//! - Selection through command objects instead of per-cell callbacks
//! - Terminal rendering for the `datepick` binary

pub mod args;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod types;

pub use engine::{CalendarEngine, EngineConfig, EngineOutput, NavigationState};
pub use error::CalError;
pub use types::{CalDate, Command, Day, DayCell, DayKey, DayProps, Key, KeyHandler, MonthGrid, Week};
