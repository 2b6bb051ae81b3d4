use crate::traits::TargetGroup;
use ark_bls12_381::Fq12;
use ark_ff::Field;

/// The target group of the BLS12-381 pairing, a subgroup of `Fq12^*`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BLSGt(pub(crate) Fq12);

impl TargetGroup for BLSGt {
    #[inline]
    fn identity() -> Self {
        Self(Fq12::ONE)
    }
}
