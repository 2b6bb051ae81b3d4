use crate::bls12_381::{point_from_bytes, point_to_bytes, BLSScalar};
use crate::prelude::*;
use ark_bls12_381::{G2Affine, G2Projective};
use ark_ec::{CurveGroup, Group as ArkGroup};
use ark_serialize::{CanonicalSerialize, Compress, Validate};
use ark_std::fmt::{Debug, Display, Formatter};

/// The second source group of BLS12-381.
#[derive(Copy, Default, Clone, PartialEq, Eq)]
pub struct BLSG2(pub(crate) G2Projective);

impl Debug for BLSG2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> ark_std::fmt::Result {
        <G2Affine as Display>::fmt(&self.0.into_affine(), f)
    }
}

impl Group for BLSG2 {
    type ScalarType = BLSScalar;

    fn get_identity() -> Self {
        Self(G2Projective::zero())
    }

    fn get_base() -> Self {
        Self(G2Projective::generator())
    }

    fn random<R: CryptoRng + RngCore>(prng: &mut R) -> Self {
        Self(G2Projective::rand(prng))
    }

    fn to_compressed_bytes(&self) -> Vec<u8> {
        point_to_bytes(&self.0.into_affine(), Compress::Yes)
    }

    fn from_compressed_bytes(bytes: &[u8]) -> Result<Self> {
        point_from_bytes::<G2Affine>(bytes, Compress::Yes, Validate::Yes).map(|p| Self(p.into()))
    }

    fn to_unchecked_bytes(&self) -> Vec<u8> {
        point_to_bytes(&self.0.into_affine(), Compress::No)
    }

    fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        point_from_bytes::<G2Affine>(bytes, Compress::No, Validate::No).map(|p| Self(p.into()))
    }

    fn unchecked_size() -> usize {
        G2Affine::default().serialized_size(Compress::No)
    }
}

impl<'a> Add<&'a BLSG2> for BLSG2 {
    type Output = BLSG2;

    #[inline]
    fn add(self, rhs: &Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Sub<&'a BLSG2> for BLSG2 {
    type Output = BLSG2;

    #[inline]
    fn sub(self, rhs: &Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Mul<&'a BLSScalar> for BLSG2 {
    type Output = BLSG2;

    #[inline]
    fn mul(self, rhs: &BLSScalar) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<'a> AddAssign<&'a BLSG2> for BLSG2 {
    #[inline]
    fn add_assign(&mut self, rhs: &'a BLSG2) {
        self.0 += rhs.0
    }
}

impl<'a> SubAssign<&'a BLSG2> for BLSG2 {
    #[inline]
    fn sub_assign(&mut self, rhs: &'a BLSG2) {
        self.0 -= rhs.0
    }
}

impl Neg for BLSG2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
