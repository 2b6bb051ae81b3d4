use crate::prelude::*;
use ark_ff::FftField;
use ark_std::fmt::Debug;
use digest::{generic_array::typenum::U64, Digest};
use serde::{Deserialize, Serialize};

/// An element of a prime field.
pub trait Scalar:
    Copy
    + Default
    + Debug
    + Eq
    + Serialize
    + for<'de> Deserialize<'de>
    + One
    + Zero
    + Add<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Sum<Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> Sum<&'a Self>
    + From<u32>
    + From<u64>
    + Neg<Output = Self>
    + Sync
    + Send
{
    /// Sample a uniformly random element.
    fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self;

    /// Map a 64-byte digest to a field element.
    fn from_hash<D>(hash: D) -> Self
    where
        D: Digest<OutputSize = U64> + Default;

    /// A generator of the multiplicative group. It is a quadratic non-residue.
    fn multiplicative_generator() -> Self;

    /// The modulus, little-endian.
    fn get_field_size_le_bytes() -> Vec<u8>;

    /// Little-endian canonical bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Parse the canonical bytes written by [`Scalar::to_bytes`].
    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    /// The inverse, or an error for zero.
    fn inv(&self) -> Result<Self>;

    #[allow(missing_docs)]
    fn square(&self) -> Self;

    /// Raise to the power given as u64 limbs, least significant first.
    fn pow(&self, exponent: &[u64]) -> Self;
}

/// A scalar backed by an arkworks field with radix-2 FFT support.
pub trait Domain: Scalar {
    /// The underlying arkworks field.
    type Field: FftField;

    /// Unwrap into the arkworks field.
    fn get_field(&self) -> Self::Field;

    /// Wrap an arkworks field element.
    fn from_field(field: Self::Field) -> Self;
}

/// An additively written group of prime order.
pub trait Group:
    Debug
    + Default
    + Copy
    + Eq
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self::ScalarType, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + Serialize
    + for<'de> Deserialize<'de>
    + Neg<Output = Self>
    + Send
    + Sync
{
    /// The scalar field of the group.
    type ScalarType: Scalar;

    #[allow(missing_docs)]
    fn get_identity() -> Self;

    /// The fixed generator.
    fn get_base() -> Self;

    #[allow(missing_docs)]
    fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self;

    /// Compressed encoding, the one used by serde.
    fn to_compressed_bytes(&self) -> Vec<u8>;

    /// Parse and check a compressed encoding.
    fn from_compressed_bytes(bytes: &[u8]) -> Result<Self>;

    /// Uncompressed encoding without subgroup data, for trusted storage.
    fn to_unchecked_bytes(&self) -> Vec<u8>;

    /// Parse an uncompressed encoding without validating it.
    fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self>;

    /// The length of [`Group::to_unchecked_bytes`].
    fn unchecked_size() -> usize;

    /// `sum_i scalars[i] * points[i]`.
    fn multi_exp(scalars: &[&Self::ScalarType], points: &[&Self]) -> Self {
        scalars
            .iter()
            .zip(points.iter())
            .fold(Self::get_identity(), |acc, (s, p)| acc.add(&(**p).mul(*s)))
    }
}

/// The target group of a pairing. Only equality checks are needed on it.
pub trait TargetGroup: Debug + Copy + Eq + Send + Sync {
    /// The neutral element.
    fn identity() -> Self;

    #[allow(missing_docs)]
    fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

/// A bilinear pairing `G1 x G2 -> Gt`.
pub trait Pairing {
    /// The common scalar field of G1 and G2.
    type ScalarField: Domain;

    #[allow(missing_docs)]
    type G1: Group<ScalarType = Self::ScalarField>;

    #[allow(missing_docs)]
    type G2: Group<ScalarType = Self::ScalarField>;

    #[allow(missing_docs)]
    type Gt: TargetGroup;

    /// `e(a, b)`.
    fn pairing(a: &Self::G1, b: &Self::G2) -> Self::Gt;

    /// `prod_i e(a[i], b[i])` with a single final exponentiation.
    fn product_of_pairings(a: &[Self::G1], b: &[Self::G2]) -> Self::Gt;
}
