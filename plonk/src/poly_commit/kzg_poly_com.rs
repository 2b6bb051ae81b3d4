use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    errors::PolyComSchemeError,
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme, ToBytes},
};
use tessera_algebra::{bls12_381::BLSPairingEngine, prelude::*, traits::Pairing};

/// KZG commitment scheme over the `Group`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G: Group> ToBytes for KZGCommitment<G> {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }
}

impl<G: Group> HomomorphicPolyComElem for KZGCommitment<G> {
    type Scalar = G::ScalarType;

    fn get_base() -> Self {
        KZGCommitment(G::get_base())
    }

    fn get_identity() -> Self {
        KZGCommitment(G::get_identity())
    }

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn sub_assign(&mut self, other: &Self) {
        self.0.sub_assign(&other.0)
    }

    fn mul(&self, exp: &G::ScalarType) -> Self {
        KZGCommitment(self.0.mul(exp))
    }

    fn mul_assign(&mut self, exp: &G::ScalarType) {
        self.0 = self.0.mul(exp)
    }
}

/// KZG commitment scheme about `Pairing`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// public parameter about G1.
    pub public_parameter_group_1: Vec<P::G1>,
    /// public parameter about G2.
    pub public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> KZGCommitmentScheme<P> {
    /// Create a new instance of a KZG polynomial commitment scheme.
    /// `max_degree` - max degree of the polynomial,
    /// `prng` - pseudo-random generator.
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KZGCommitmentScheme<P> {
        let s = P::ScalarField::random(prng);

        let mut public_parameter_group_1: Vec<P::G1> = Vec::with_capacity(max_degree + 1);
        let mut elem_g1 = P::G1::get_base();
        for _ in 0..=max_degree {
            public_parameter_group_1.push(elem_g1);
            elem_g1 = elem_g1.mul(&s);
        }

        let elem_g2 = P::G2::get_base();
        let public_parameter_group_2 = vec![elem_g2, elem_g2.mul(&s)];

        KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2,
        }
    }

    /// Return true if the parameters were shrunk for verification.
    pub fn is_verifier_only(&self) -> bool {
        self.public_parameter_group_1.len() <= 1
    }

    /// Return `(G1, G2, [s]G2)`, the part of the parameters every
    /// verification needs.
    fn verifier_basis(&self) -> Result<(P::G1, P::G2, P::G2)> {
        match (
            self.public_parameter_group_1.first(),
            self.public_parameter_group_2.get(0..2),
        ) {
            (Some(g1_0), Some([g2_0, g2_1])) => Ok((*g1_0, *g2_0, *g2_1)),
            _ => Err(PlonkError::SetupError),
        }
    }

    /// Serialize the parameters to unchecked bytes.
    pub fn to_unchecked_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![];
        let len_1 = self.public_parameter_group_1.len() as u32;
        let len_2 = self.public_parameter_group_2.len() as u32;
        bytes.extend(len_1.to_le_bytes());
        bytes.extend(len_2.to_le_bytes());

        for i in &self.public_parameter_group_1 {
            bytes.extend(i.to_unchecked_bytes());
        }
        for i in &self.public_parameter_group_2 {
            bytes.extend(i.to_unchecked_bytes());
        }
        bytes
    }

    /// Deserialize the parameters from unchecked bytes.
    pub fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(PlonkError::Serialization);
        }
        let mut len_1_bytes = [0u8; 4];
        let mut len_2_bytes = [0u8; 4];
        len_1_bytes.copy_from_slice(&bytes[0..4]);
        len_2_bytes.copy_from_slice(&bytes[4..8]);
        let len_1 = u32::from_le_bytes(len_1_bytes) as usize;
        let len_2 = u32::from_le_bytes(len_2_bytes) as usize;
        if len_1 == 0 || len_2 != 2 {
            return Err(PlonkError::Serialization);
        }
        let n_1 = P::G1::unchecked_size();
        let n_2 = P::G2::unchecked_size();

        if bytes.len() != 8 + n_1 * len_1 + n_2 * len_2 {
            return Err(PlonkError::Serialization);
        }
        let bytes_1 = &bytes[8..8 + n_1 * len_1];
        let bytes_2 = &bytes[8 + n_1 * len_1..];

        let public_parameter_group_1 = bytes_1
            .chunks(n_1)
            .map(P::G1::from_unchecked_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let public_parameter_group_2 = bytes_2
            .chunks(n_2)
            .map(P::G2::from_unchecked_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            public_parameter_group_1,
            public_parameter_group_2,
        })
    }
}

/// KZG commitment scheme over the BLS12-381 curve
pub type KZGCommitmentSchemeBLS = KZGCommitmentScheme<BLSPairingEngine>;

impl<P: Pairing> PolyComScheme for KZGCommitmentScheme<P> {
    type Field = P::ScalarField;
    type Commitment = KZGCommitment<P::G1>;

    fn max_degree(&self) -> usize {
        self.public_parameter_group_1.len().saturating_sub(1)
    }

    fn commit(&self, polynomial: &FpPolynomial<P::ScalarField>) -> Result<Self::Commitment> {
        if self.is_verifier_only() {
            return Err(PolyComSchemeError::VerifierOnly.into());
        }

        let coefs = polynomial.get_coefs_ref();
        let degree = polynomial.degree();
        if degree + 1 > self.public_parameter_group_1.len() {
            return Err(PolyComSchemeError::DegreeError.into());
        }

        let coefs_ref: Vec<&P::ScalarField> = coefs.iter().collect();
        let pub_param_group_1_as_ref: Vec<&P::G1> = self.public_parameter_group_1
            [0..coefs.len()]
            .iter()
            .collect();

        let commitment_value = P::G1::multi_exp(&coefs_ref[..], &pub_param_group_1_as_ref[..]);

        Ok(KZGCommitment(commitment_value))
    }

    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        x: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment> {
        if poly.degree() > max_degree {
            return Err(PolyComSchemeError::DegreeError.into());
        }

        // f(X) - f(x)
        let eval = poly.eval(x);
        let nominator = poly.sub(&FpPolynomial::from_coefs(vec![eval]));

        // X - x
        let vanishing_poly = FpPolynomial::from_coefs(vec![x.neg(), Self::Field::one()]);
        let (q_poly, r_poly) = nominator.div_rem(&vanishing_poly)?;

        if !r_poly.is_zero() {
            return Err(PolyComSchemeError::PCSProveEvalError.into());
        }

        self.commit(&q_poly)
    }

    fn verify(
        &self,
        cm: &Self::Commitment,
        _degree: usize,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()> {
        let (g1_0, g2_0, g2_1) = self.verifier_basis()?;

        // e(cm - eval * G1, G2) == e(proof, [s]G2 - point * G2)
        let x_minus_point_group_element_group_2 = g2_1.sub(&g2_0.mul(point));
        let left = cm.0.sub(&g1_0.mul(eval));

        let pairing_eval = P::product_of_pairings(
            &[left, proof.0.neg()],
            &[g2_0, x_minus_point_group_element_group_2],
        );

        if pairing_eval.is_identity() {
            Ok(())
        } else {
            Err(PolyComSchemeError::PCSProveEvalError.into())
        }
    }

    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()> {
        if proofs.is_empty()
            || proofs.len() != point_vec.len()
            || proofs.len() != eval_vec.len()
            || proofs.len() != cm_vec.len()
        {
            return Err(PlonkError::FuncParamsError);
        }

        let (g1_0, g2_0, g2_1) = self.verifier_basis()?;

        // sum_i c^i * proof_i paired with [s]G2 must equal
        // sum_i c^i * (point_i * proof_i + cm_i - eval_i * G1) paired with G2.
        let mut left_first = proofs[0].0;
        let mut right_first = proofs[0].0.mul(&point_vec[0]);
        let mut right_first_val = eval_vec[0];
        let mut right_first_comm = cm_vec[0].0;

        let mut cur_challenge = *challenge;
        for i in 1..proofs.len() {
            let new_comm = proofs[i].0.mul(&cur_challenge);

            left_first.add_assign(&new_comm);
            right_first.add_assign(&new_comm.mul(&point_vec[i]));
            right_first_val.add_assign(&eval_vec[i].mul(&cur_challenge));
            right_first_comm.add_assign(&cm_vec[i].0.mul(&cur_challenge));

            cur_challenge.mul_assign(challenge);
        }
        right_first.sub_assign(&g1_0.mul(&right_first_val));
        right_first.add_assign(&right_first_comm);

        let pairing_eval =
            P::product_of_pairings(&[left_first, right_first.neg()], &[g2_1, g2_0]);

        if pairing_eval.is_identity() {
            Ok(())
        } else {
            Err(PolyComSchemeError::PCSProveEvalError.into())
        }
    }

    fn shrink_to_verifier_only(&self) -> Self {
        Self {
            public_parameter_group_1: self
                .public_parameter_group_1
                .iter()
                .take(1)
                .copied()
                .collect(),
            public_parameter_group_2: self
                .public_parameter_group_2
                .iter()
                .take(2)
                .copied()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests_kzg_impl {
    use crate::errors::PlonkError;
    use crate::poly_commit::{
        field_polynomial::FpPolynomial,
        kzg_poly_com::{KZGCommitmentScheme, KZGCommitmentSchemeBLS},
        pcs::{HomomorphicPolyComElem, PolyComScheme},
    };
    use tessera_algebra::{
        bls12_381::{BLSPairingEngine, BLSScalar, BLSG1},
        prelude::*,
        traits::Pairing,
    };

    fn check_public_parameters_generation<P: Pairing>() {
        let param_size = 5;
        let mut prng = test_rng();
        let kzg_scheme = KZGCommitmentScheme::<P>::new(param_size, &mut prng);
        let g1_power1 = kzg_scheme.public_parameter_group_1[1];
        let g2_power1 = kzg_scheme.public_parameter_group_2[1];

        // Check parameters for G1
        for i in 0..param_size - 1 {
            let elem_first_group_1 = kzg_scheme.public_parameter_group_1[i];
            let elem_next_group_1 = kzg_scheme.public_parameter_group_1[i + 1];
            let elem_next_group_1_target = P::pairing(&elem_next_group_1, &P::G2::get_base());
            let elem_next_group_1_target_recomputed = P::pairing(&elem_first_group_1, &g2_power1);
            assert_eq!(
                elem_next_group_1_target_recomputed,
                elem_next_group_1_target
            );
        }

        // Check parameters for G2
        let elem_first_group_2 = kzg_scheme.public_parameter_group_2[0];
        let elem_second_group_2 = kzg_scheme.public_parameter_group_2[1];
        let elem_next_group_2_target = P::pairing(&P::G1::get_base(), &elem_second_group_2);
        let elem_next_group_2_target_recomputed = P::pairing(&g1_power1, &elem_first_group_2);

        assert_eq!(
            elem_next_group_2_target_recomputed,
            elem_next_group_2_target
        );
    }

    #[test]
    fn test_public_parameters() {
        check_public_parameters_generation::<BLSPairingEngine>();
    }

    #[test]
    fn test_generation_of_crs() {
        let n = 1 << 5;
        let mut prng = test_rng();
        let kzg_scheme = KZGCommitmentSchemeBLS::new(n, &mut prng);
        assert_eq!(kzg_scheme.public_parameter_group_1.len(), n + 1);
        assert_eq!(kzg_scheme.public_parameter_group_2.len(), 2);
        assert_eq!(kzg_scheme.max_degree(), n);
    }

    #[test]
    fn test_homomorphic_poly_com_elem() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBLS::new(20, &mut prng);
        type Field = BLSScalar;
        let poly1 = FpPolynomial::from_coefs(vec![
            Field::from(2u32),
            Field::from(3u32),
            Field::from(6u32),
        ]);
        let commitment1 = pcs.commit(&poly1).unwrap();

        let poly2 = FpPolynomial::from_coefs(vec![
            Field::from(1u32),
            Field::from(8u32),
            Field::from(4u32),
        ]);
        let commitment2 = pcs.commit(&poly2).unwrap();

        let poly_sum = poly1.add(&poly2);
        let commitment_sum = pcs.commit(&poly_sum).unwrap();
        assert_eq!(commitment_sum, commitment1.add(&commitment2));

        let poly_diff = poly1.sub(&poly2);
        assert_eq!(
            pcs.commit(&poly_diff).unwrap(),
            commitment1.sub(&commitment2)
        );

        let exponent = Field::from(5u32);
        let poly1_mult_5 = poly1.mul_scalar(&exponent);
        let commitment_poly1_mult_5 = pcs.commit(&poly1_mult_5).unwrap();
        assert_eq!(commitment_poly1_mult_5, commitment1.mul(&exponent));
    }

    #[test]
    fn test_commit() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBLS::new(10, &mut prng);
        let fq_poly = FpPolynomial::from_coefs(vec![
            BLSScalar::from(2u32),
            BLSScalar::from(3u32),
            BLSScalar::from(6u32),
        ]);
        let commitment = pcs.commit(&fq_poly).unwrap();

        // Doing the multiexp by hand
        let mut expected_committed_value = BLSG1::get_identity();
        for (i, coef) in fq_poly.get_coefs_ref().iter().enumerate() {
            let g_i = pcs.public_parameter_group_1[i];
            expected_committed_value = expected_committed_value.add(&g_i.mul(coef));
        }
        assert_eq!(expected_committed_value, commitment.0);

        let too_big = FpPolynomial::<BLSScalar>::random(&mut prng, 11);
        assert_eq!(pcs.commit(&too_big), Err(PlonkError::DegreeError));
    }

    #[test]
    fn test_eval() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBLS::new(10, &mut prng);
        let one = BLSScalar::one();
        let seven = BLSScalar::from(7u32);
        let fq_poly =
            FpPolynomial::from_coefs(vec![one, BLSScalar::from(2u32), BLSScalar::from(4u32)]);
        let point = one;
        let max_degree = fq_poly.degree();
        let degree = fq_poly.degree();
        let commitment_value = pcs.commit(&fq_poly).unwrap();

        // The degree of the polynomial exceeds the maximum degree.
        assert!(pcs.prove(&fq_poly, &point, 1).is_err());

        let proof = pcs.prove(&fq_poly, &point, max_degree).unwrap();
        assert!(pcs
            .verify(&commitment_value, degree, &point, &seven, &proof)
            .is_ok());

        let new_pcs = pcs.shrink_to_verifier_only();
        assert!(new_pcs
            .verify(&commitment_value, degree, &point, &seven, &proof)
            .is_ok());
        assert!(matches!(
            new_pcs.commit(&fq_poly),
            Err(PlonkError::NotSupported(_))
        ));

        assert!(pcs
            .verify(&commitment_value, degree, &point, &one, &proof)
            .is_err());
    }

    #[test]
    fn test_unchecked_bytes() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBLS::new(8, &mut prng);
        let bytes = pcs.to_unchecked_bytes();
        let restored = KZGCommitmentSchemeBLS::from_unchecked_bytes(&bytes).unwrap();
        assert_eq!(
            restored.public_parameter_group_1,
            pcs.public_parameter_group_1
        );
        assert_eq!(
            restored.public_parameter_group_2,
            pcs.public_parameter_group_2
        );
        let truncated = &bytes[..bytes.len() - 1];
        let res = KZGCommitmentSchemeBLS::from_unchecked_bytes(truncated);
        assert!(res.is_err());
    }

    #[test]
    fn test_malformed_headers() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBLS::new(2, &mut prng);
        let g1_size = BLSG1::unchecked_size();
        let g1_bytes = pcs.public_parameter_group_1[0].to_unchecked_bytes();
        let g2_bytes: Vec<u8> = pcs
            .public_parameter_group_2
            .iter()
            .flat_map(|g| g.to_unchecked_bytes())
            .collect();

        let with_header = |len_1: u32, len_2: u32, body: &[u8]| {
            let mut bytes = len_1.to_le_bytes().to_vec();
            bytes.extend(len_2.to_le_bytes());
            bytes.extend_from_slice(body);
            KZGCommitmentSchemeBLS::from_unchecked_bytes(&bytes)
        };

        // the lengths agree with the body but leave no basis to verify with
        assert_eq!(
            with_header(0, 0, &[]).err(),
            Some(PlonkError::Serialization)
        );
        assert_eq!(
            with_header(0, 2, &g2_bytes).err(),
            Some(PlonkError::Serialization)
        );
        assert_eq!(
            with_header(1, 0, &g1_bytes).err(),
            Some(PlonkError::Serialization)
        );
        assert_eq!(g1_bytes.len(), g1_size);

        let mut body = g1_bytes.clone();
        body.extend_from_slice(&g2_bytes);
        let restored = with_header(1, 2, &body).unwrap();
        assert!(restored.is_verifier_only());

        // hand-built parameters without G2 fail to verify instead of panicking
        let broken = KZGCommitmentSchemeBLS {
            public_parameter_group_1: pcs.public_parameter_group_1.clone(),
            public_parameter_group_2: vec![],
        };
        let poly = FpPolynomial::from_coefs(vec![BLSScalar::one(), BLSScalar::one()]);
        let cm = pcs.commit(&poly).unwrap();
        let point = BLSScalar::from(3u32);
        let proof = pcs.prove(&poly, &point, 1).unwrap();
        let eval = poly.eval(&point);
        assert!(pcs.verify(&cm, 1, &point, &eval, &proof).is_ok());
        assert_eq!(
            broken.verify(&cm, 1, &point, &eval, &proof),
            Err(PlonkError::SetupError)
        );
        assert_eq!(
            broken.batch_verify_diff_points(&[cm], &[point], &[eval], &[proof], &point),
            Err(PlonkError::SetupError)
        );
        let verifier_only = broken.shrink_to_verifier_only();
        assert!(verifier_only.public_parameter_group_2.is_empty());
    }
}
