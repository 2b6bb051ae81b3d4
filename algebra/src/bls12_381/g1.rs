use crate::bls12_381::{point_from_bytes, point_to_bytes, BLSScalar};
use crate::prelude::*;
use ark_bls12_381::{G1Affine, G1Projective};
use ark_ec::{CurveGroup, Group as ArkGroup, VariableBaseMSM};
use ark_serialize::{CanonicalSerialize, Compress, Validate};
use ark_std::fmt::{Debug, Display, Formatter};

/// The first source group of BLS12-381.
#[derive(Copy, Default, Clone, PartialEq, Eq)]
pub struct BLSG1(pub(crate) G1Projective);

impl Debug for BLSG1 {
    fn fmt(&self, f: &mut Formatter<'_>) -> ark_std::fmt::Result {
        <G1Affine as Display>::fmt(&self.0.into_affine(), f)
    }
}

impl Group for BLSG1 {
    type ScalarType = BLSScalar;

    fn get_identity() -> Self {
        Self(G1Projective::zero())
    }

    fn get_base() -> Self {
        Self(G1Projective::generator())
    }

    fn random<R: CryptoRng + RngCore>(prng: &mut R) -> Self {
        Self(G1Projective::rand(prng))
    }

    fn to_compressed_bytes(&self) -> Vec<u8> {
        point_to_bytes(&self.0.into_affine(), Compress::Yes)
    }

    fn from_compressed_bytes(bytes: &[u8]) -> Result<Self> {
        point_from_bytes::<G1Affine>(bytes, Compress::Yes, Validate::Yes).map(|p| Self(p.into()))
    }

    fn to_unchecked_bytes(&self) -> Vec<u8> {
        point_to_bytes(&self.0.into_affine(), Compress::No)
    }

    fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        point_from_bytes::<G1Affine>(bytes, Compress::No, Validate::No).map(|p| Self(p.into()))
    }

    fn unchecked_size() -> usize {
        G1Affine::default().serialized_size(Compress::No)
    }

    fn multi_exp(scalars: &[&BLSScalar], points: &[&Self]) -> Self {
        let scalars: Vec<_> = scalars.iter().map(|s| s.0).collect();
        let points = G1Projective::normalize_batch(&points.iter().map(|p| p.0).collect::<Vec<_>>());
        Self(G1Projective::msm_unchecked(&points, &scalars))
    }
}

impl<'a> Add<&'a BLSG1> for BLSG1 {
    type Output = BLSG1;

    #[inline]
    fn add(self, rhs: &Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Sub<&'a BLSG1> for BLSG1 {
    type Output = BLSG1;

    #[inline]
    fn sub(self, rhs: &Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Mul<&'a BLSScalar> for BLSG1 {
    type Output = BLSG1;

    #[inline]
    fn mul(self, rhs: &BLSScalar) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<'a> AddAssign<&'a BLSG1> for BLSG1 {
    #[inline]
    fn add_assign(&mut self, rhs: &'a BLSG1) {
        self.0 += rhs.0
    }
}

impl<'a> SubAssign<&'a BLSG1> for BLSG1 {
    #[inline]
    fn sub_assign(&mut self, rhs: &'a BLSG1) {
        self.0 -= rhs.0
    }
}

impl Neg for BLSG1 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
