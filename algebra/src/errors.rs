use ark_std::{error, fmt};

/// Errors of field and group operations.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AlgebraError {
    /// Malformed or truncated bytes.
    DeserializationError,
    /// Zero has no inverse.
    ZeroInversion,
}

impl fmt::Display for AlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgebraError::DeserializationError => f.write_str("Could not deserialize object"),
            AlgebraError::ZeroInversion => f.write_str("Zero is not invertible"),
        }
    }
}

impl error::Error for AlgebraError {}
