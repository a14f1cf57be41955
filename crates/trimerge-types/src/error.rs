use thiserror::Error;

/// Errors produced when moving values in and out of the value model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The source value has no counterpart in the value model
    /// (non-finite floats, datetimes, ...).
    #[error("value is not representable: {0}")]
    NotRepresentable(String),

    /// An `Absent` marker was found where a concrete value is required.
    #[error("absent value cannot be converted")]
    AbsentValue,
}
