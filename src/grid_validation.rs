use crate::calendar::{DAY_COUNT, Day, HOUR_COUNT};
use crate::grid::{Cell, DayColumn, Grid};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GridValidationError {
    message: String,
}

impl GridValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_cell(day: Day, hour_index: usize, cell: &Cell) -> Result<(), GridValidationError> {
    if cell.title.trim().is_empty() {
        return Err(GridValidationError::new(format!(
            "cell {day} #{hour_index} has an empty title"
        )));
    }
    Ok(())
}

pub fn validate_column(expected: Day, column: &DayColumn) -> Result<(), GridValidationError> {
    if column.day != expected {
        return Err(GridValidationError::new(format!(
            "expected day {expected} but found {}",
            column.day
        )));
    }
    if column.slots.len() != HOUR_COUNT {
        return Err(GridValidationError::new(format!(
            "day {} has {} slots (expected {HOUR_COUNT})",
            column.day,
            column.slots.len()
        )));
    }
    for (hour_index, slot) in column.slots.iter().enumerate() {
        if let Some(cell) = slot {
            validate_cell(column.day, hour_index, cell)?;
        }
    }
    Ok(())
}

/// Checks a decoded column list against the fixed grid shape and wraps it.
pub fn validate_columns(columns: Vec<DayColumn>) -> Result<Grid, GridValidationError> {
    if columns.len() != DAY_COUNT {
        return Err(GridValidationError::new(format!(
            "grid has {} days (expected {DAY_COUNT})",
            columns.len()
        )));
    }
    for (column, expected) in columns.iter().zip(Day::ALL) {
        validate_column(expected, column)?;
    }
    Ok(Grid::from_columns_unchecked(columns))
}
