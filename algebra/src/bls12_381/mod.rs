/// The number of bytes for a scalar value over BLS12-381.
pub const BLS12_381_SCALAR_LEN: usize = 32;

mod fr;
pub use fr::*;

mod g1;
pub use g1::*;

mod g2;
pub use g2::*;

mod gt;
pub use gt::*;

mod pairing;
pub use pairing::*;

use crate::prelude::*;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};

pub(crate) fn point_to_bytes<T: CanonicalSerialize>(point: &T, compress: Compress) -> Vec<u8> {
    let mut buf = Vec::with_capacity(point.serialized_size(compress));
    point.serialize_with_mode(&mut buf, compress).unwrap();
    buf
}

pub(crate) fn point_from_bytes<T: CanonicalDeserialize>(
    bytes: &[u8],
    compress: Compress,
    validate: Validate,
) -> Result<T> {
    T::deserialize_with_mode(bytes, compress, validate)
        .map_err(|_| AlgebraError::DeserializationError)
}

#[cfg(test)]
mod bls12_381_groups_test {
    use crate::{
        bls12_381::{BLSGt, BLSPairingEngine, BLSScalar, BLSG1, BLSG2},
        prelude::*,
        traits::{
            group_tests::{test_scalar_operations, test_scalar_serialization},
            Domain, Pairing,
        },
    };
    use ark_ff::{FftField, Field, LegendreSymbol};

    #[test]
    fn test_scalar_ops() {
        test_scalar_operations::<BLSScalar>();
    }

    #[test]
    fn scalar_deser() {
        test_scalar_serialization::<BLSScalar>();
    }

    #[test]
    fn scalar_from_to_bytes() {
        let small_value = BLSScalar::from(165747u32);
        let small_value_bytes = small_value.to_bytes();
        let mut expected = [0u8; 32];
        expected[0] = 115;
        expected[1] = 135;
        expected[2] = 2;
        assert_eq!(small_value_bytes, expected);

        let small_value_from_bytes = BLSScalar::from_bytes(&small_value_bytes).unwrap();
        assert_eq!(small_value_from_bytes, small_value);
    }

    #[test]
    fn generator_is_a_non_residue_outside_small_subgroups() {
        let g = BLSScalar::multiplicative_generator();
        let g_field = g.get_field();
        assert_eq!(g_field, <BLSScalar as Domain>::Field::GENERATOR);
        assert_eq!(g_field.legendre(), LegendreSymbol::QuadraticNonResidue);

        // the generator must not lie in any 2-adic subgroup used by the FFTs
        let two_adicity = <BLSScalar as Domain>::Field::TWO_ADICITY;
        let one = <BLSScalar as Domain>::Field::ONE;
        assert_ne!(g_field.pow([1u64 << two_adicity]), one);
    }

    #[test]
    fn pairing_is_bilinear() {
        let mut prng = test_rng();
        let a = BLSScalar::random(&mut prng);
        let b = BLSScalar::random(&mut prng);
        let g1 = BLSG1::get_base();
        let g2 = BLSG2::get_base();

        let lhs = BLSPairingEngine::pairing(&g1.mul(&a), &g2.mul(&b));
        assert_eq!(lhs, BLSPairingEngine::pairing(&g1.mul(&a.mul(&b)), &g2));
        assert_eq!(lhs, BLSPairingEngine::pairing(&g1, &g2.mul(&a.mul(&b))));
        assert_ne!(lhs, BLSGt::identity());

        let with_identity = BLSPairingEngine::pairing(&BLSG1::get_identity(), &g2);
        assert!(with_identity.is_identity());
    }

    #[test]
    fn product_of_pairings_matches_the_sum() {
        let mut prng = test_rng();
        let a = BLSScalar::random(&mut prng);
        let p = BLSG1::get_base().mul(&a);
        let q = BLSG2::get_base();

        // e(aG, H) * e(-aG, H) = 1
        let prod = BLSPairingEngine::product_of_pairings(&[p, p.neg()], &[q, q]);
        assert!(prod.is_identity());
        let doubled = BLSPairingEngine::product_of_pairings(&[p, p], &[q, q]);
        assert!(!doubled.is_identity());
    }

    #[test]
    fn multi_exp_agrees_with_naive_sum() {
        let mut prng = test_rng();
        let scalars: Vec<BLSScalar> = (0..5).map(|_| BLSScalar::random(&mut prng)).collect();
        let points: Vec<BLSG1> = (0..5).map(|_| BLSG1::random(&mut prng)).collect();

        let mut expected = BLSG1::get_identity();
        for (s, p) in scalars.iter().zip(points.iter()) {
            expected = expected.add(&p.mul(s));
        }
        let got = BLSG1::multi_exp(
            &scalars.iter().collect::<Vec<_>>(),
            &points.iter().collect::<Vec<_>>(),
        );
        assert_eq!(got, expected);
        assert_eq!(BLSG1::multi_exp(&[], &[]), BLSG1::get_identity());
    }

    #[test]
    fn test_serialization_of_points() {
        let mut prng = test_rng();

        let g1 = BLSG1::random(&mut prng);
        let g1_bytes = g1.to_compressed_bytes();
        assert_eq!(g1_bytes.len(), 48);
        assert_eq!(BLSG1::from_compressed_bytes(&g1_bytes).unwrap(), g1);
        let g1_unchecked = g1.to_unchecked_bytes();
        assert_eq!(g1_unchecked.len(), BLSG1::unchecked_size());
        assert_eq!(BLSG1::from_unchecked_bytes(&g1_unchecked).unwrap(), g1);
        assert!(BLSG1::from_compressed_bytes(&g1_bytes[1..]).is_err());

        let g2 = BLSG2::random(&mut prng);
        let g2_bytes = g2.to_compressed_bytes();
        assert_eq!(g2_bytes.len(), 96);
        assert_eq!(BLSG2::from_compressed_bytes(&g2_bytes).unwrap(), g2);
        assert_eq!(
            BLSG2::from_unchecked_bytes(&g2.to_unchecked_bytes()).unwrap(),
            g2
        );
    }
}
