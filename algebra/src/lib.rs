//! Field and group abstractions used by the Tessera proof system, together with
//! the BLS12-381 instantiation built on arkworks.
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(unused_import_braces, trivial_numeric_casts, missing_docs)]
#![warn(unused_comparisons, bare_trait_objects, unused_must_use)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate serde_derive;

pub use ark_std::{fmt, iter, ops, rand, One, UniformRand, Zero};

/// Module for the BLS12-381 curve.
pub mod bls12_381;

/// Module for error handling.
pub mod errors;

/// Module for the prelude.
pub mod prelude;

/// Module for test rngs.
pub mod rand_helper;

/// Module for serialization of scalars and group elements.
pub mod serialization;

/// Module for traits.
pub mod traits;

/// Module for utils.
pub mod utils;
