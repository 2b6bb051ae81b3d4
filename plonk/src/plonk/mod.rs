//! The PLONK implementation over sparse gate constraint systems.

/// Module for help functions.
pub(crate) mod helpers;

/// Module for the constraint system.
pub mod constraint_system;

/// Module for the blinding polynomials.
pub mod blinding;

/// Module for the step graph of the prover.
pub mod dag;

/// Module for the numerator of the quotient polynomial.
pub mod numerator;

/// Module for the quotient polynomial.
pub mod quotient;

/// Module for the linearization polynomial.
pub mod linearization;

/// Module for the openings.
pub mod opening;

/// Module for prover.
pub mod prover;

/// Module for indexer.
pub mod indexer;

/// Module for transcript.
pub mod transcript;

/// Module for verifier.
pub mod verifier;
