//! Error types for irradiance construction, parsing and arithmetic.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestep: {0} (must be a divisor of 60)")]
    InvalidTimestep(u32),

    #[error(
        "Series length mismatch: expected {expected} values at timestep {timestep} \
         (leap year: {is_leap_year}), got {actual}"
    )]
    LengthMismatch {
        expected: usize,
        actual: usize,
        timestep: u32,
        is_leap_year: bool,
    },

    #[error("Series mismatch: {0}")]
    SeriesMismatch(String),

    #[error("Timestep mismatch: requested {requested}, file records {recorded}")]
    TimestepMismatch { requested: u32, recorded: u32 },

    #[error("WEA parse error at line {line}: {reason}")]
    WeaParse { line: usize, reason: String },

    #[error("EPW parse error at line {line}: {reason}")]
    EpwParse { line: usize, reason: String },

    #[error("STAT parse error: {0}")]
    StatParse(String),

    #[error("Stat file contains no optical data.")]
    NoOpticalData,

    #[error("Missing optical depth data for {name} at month {month}")]
    MissingOpticalDepth { name: &'static str, month: usize },

    #[error("Missing weather field: {0}")]
    MissingField(String),

    #[error("Invalid hour of year: {0}")]
    InvalidHour(f64),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
