//! Errors of the command-line surface. The engine itself never fails.

use thiserror::Error;

use crate::types::MAX_MONTHS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalError {
    #[error("Invalid columns value: {0}")]
    InvalidColumns(String),

    #[error("Columns must be positive")]
    ZeroColumns,

    #[error("Invalid number of months: {0} (must be 1-{max})", max = MAX_MONTHS)]
    InvalidMonthCount(usize),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Day {0} is not shown in the current month")]
    DayNotShown(u32),
}
