//! Errors raised while building gasket geometry.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GasketError {
    /// A caller passed a value outside the accepted range (e.g. a negative depth).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A coordinate was NaN or infinite.
    #[error("Bad vertex data: {0}")]
    DataError(String),

    /// The buffer is not in a state that accepts writes.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The flush callback could not upload or draw the buffer.
    #[error("Flush failed: {0}")]
    Flush(String),
}

pub type GasketResult<T> = Result<T, GasketError>;
