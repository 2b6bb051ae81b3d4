//! A PLONK prover and verifier over KZG polynomial commitments.
//!
//! The prover runs as a dependency-ordered graph of steps, each on its own
//! thread, see [`plonk::prover`].
#![warn(unused_import_braces, unused_qualifications, trivial_casts)]
#![warn(trivial_numeric_casts, non_shorthand_field_patterns)]
#![warn(unused_attributes, unused_imports, unused_mut, missing_docs)]
#![warn(unused_allocation, unused_comparisons, bare_trait_objects, unused_must_use)]
#![forbid(unsafe_code)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate serde_derive;

/// Module for the errors.
pub mod errors;

/// Module for the PLONK protocol.
pub mod plonk;

/// Module for polynomial commitments.
pub mod poly_commit;

pub use errors::PlonkError;
