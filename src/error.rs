use std::fmt;

/// Failure conditions the set-building core signals to its caller.
///
/// Per-track data problems never abort a request: tracks with
/// unrecognized keys or unusable tempos are dropped from the output.
/// Only problems with the starting track itself are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetlistError {
    /// The starting key is not a recognized Camelot code.
    InvalidStartKey(String),

    /// The starting track's tempo could not be read as a positive number.
    UnparseableTempo(String),
}

impl fmt::Display for SetlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetlistError::InvalidStartKey(key) => {
                write!(f, "'{key}' is not a recognized Camelot key")
            }
            SetlistError::UnparseableTempo(detail) => {
                write!(f, "unparseable tempo: {detail}")
            }
        }
    }
}

impl std::error::Error for SetlistError {}
