use thiserror::Error;

/// Defects that make a dispensing rule unusable for projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CadenceError {
    #[error("rule has no visit days")]
    NoVisitDays,
    #[error("visit day {0} is not a positive integer")]
    NonPositiveVisitDay(i64),
    #[error("visit day {0} is listed more than once")]
    DuplicateVisitDay(u32),
    #[error("cycle length must be positive, got {0}")]
    NonPositiveCycleLength(i64),
    #[error("visit day {day} falls outside the {cycle_length}-day cycle")]
    VisitDayBeyondCycle { day: u32, cycle_length: u32 },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid cadence: {0}")]
    InvalidCadence(#[from] CadenceError),
    #[error("dispensing quantity must be a positive number, got {0}")]
    InvalidQuantity(f64),
    #[error("rule names no drug to dispense")]
    MissingDrug,
    #[error("months ahead must be at least 1, got {0}")]
    InvalidHorizon(u32),
    #[error("horizon date overflows the calendar")]
    HorizonOverflow,
}

pub type Result<T> = std::result::Result<T, ModelError>;
