use crate::poly_commit::errors::PolyComSchemeError;
use ark_std::{error, fmt};
use tessera_algebra::prelude::AlgebraError;

pub(crate) type Result<T> = core::result::Result<T, PlonkError>;

/// The errors of the PLONK prover and verifier.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlonkError {
    /// The witness does not match the inputs of the constraint system.
    InvalidWitness,
    /// The solver could not satisfy the constraint at the given row.
    UnsatisfiedConstraint(usize),
    /// The proving context was cancelled before this step could run.
    ContextCancelled,
    /// An internal consistency check failed.
    InvariantViolation(&'static str),
    /// The requested operation is not supported.
    NotSupported(&'static str),
    /// Algebra error
    Algebra(AlgebraError),
    /// Polynomial commitment error.
    CommitmentError,
    /// Error occurred when setup.
    SetupError,
    /// Error occurred when verify.
    VerificationError,
    /// Division by zero.
    DivisionByZero,
    /// Function params error.
    FuncParamsError,
    /// The degree of the polynomial is higher than the maximum degree supported.
    DegreeError,
    /// The opening proof could not be computed as the claimed value is wrong.
    PCSProveEvalError,
    /// No evaluation domain of this size exists in the field.
    DomainNotFound(usize),
    /// The bytes could not be decoded.
    Serialization,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            InvalidWitness => f.write_str("Invalid witness."),
            UnsatisfiedConstraint(row) => write!(f, "Constraint at row {} is not satisfied.", row),
            ContextCancelled => f.write_str("Context cancelled."),
            InvariantViolation(what) => write!(f, "Invariant violation: {}.", what),
            NotSupported(what) => write!(f, "Not supported: {}.", what),
            Algebra(e) => write!(f, "Algebra: {}", e),
            CommitmentError => f.write_str("Commitment error."),
            SetupError => f.write_str("Setup error."),
            VerificationError => f.write_str("Verification error."),
            DivisionByZero => f.write_str("Division by zero."),
            FuncParamsError => f.write_str("Function params error."),
            DegreeError => f.write_str(
                "The degree of the polynomial is higher than the maximum degree supported.",
            ),
            PCSProveEvalError => f.write_str("Cannot compute the proof as F(x) != y."),
            DomainNotFound(n) => write!(f, "No evaluation domain of size {}.", n),
            Serialization => f.write_str("Serialization error."),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}

impl From<PolyComSchemeError> for PlonkError {
    fn from(e: PolyComSchemeError) -> PlonkError {
        match e {
            PolyComSchemeError::PCSProveEvalError => PlonkError::PCSProveEvalError,
            PolyComSchemeError::PCSCommitError => PlonkError::CommitmentError,
            PolyComSchemeError::DegreeError => PlonkError::DegreeError,
            PolyComSchemeError::VerifierOnly => {
                PlonkError::NotSupported("a verifier-only commitment scheme cannot commit")
            }
        }
    }
}
