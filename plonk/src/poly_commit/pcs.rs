use crate::errors::{PlonkError, Result};
use crate::poly_commit::field_polynomial::FpPolynomial;
use ark_std::fmt::Debug;
use digest::{generic_array::typenum::U64, Digest};
use serde::{Deserialize, Serialize};
use tessera_algebra::{prelude::*, traits::Domain};

/// The trait for help serialize to bytes,
/// implement by polynomial commitment.
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// The trait for homomorphic polynomial commitment field.
pub trait HomomorphicPolyComElem: ToBytes {
    /// This is the scalar field of the polynomial.
    type Scalar;

    /// Get base (generator) of the group.
    fn get_base() -> Self;

    /// Get identity of the group.
    fn get_identity() -> Self;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Subtract assign the underlying polynomials.
    fn sub_assign(&mut self, other: &Self);

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul(&self, exp: &Self::Scalar) -> Self;

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul_assign(&mut self, exp: &Self::Scalar);
}

impl<F: Scalar> ToBytes for FpPolynomial<F> {
    fn to_bytes(&self) -> Vec<u8> {
        self.coefs.iter().flat_map(|c| c.to_bytes()).collect()
    }
}

/// Polynomials act as their own trivial commitments, so that the same code
/// combines polynomials (prover) and commitments (verifier).
impl<F: Scalar> HomomorphicPolyComElem for FpPolynomial<F> {
    type Scalar = F;

    fn get_base() -> Self {
        FpPolynomial::one()
    }

    fn get_identity() -> Self {
        FpPolynomial::zero()
    }

    fn add(&self, other: &Self) -> Self {
        FpPolynomial::add(self, other)
    }

    fn add_assign(&mut self, other: &Self) {
        FpPolynomial::add_assign(self, other)
    }

    fn sub(&self, other: &Self) -> Self {
        FpPolynomial::sub(self, other)
    }

    fn sub_assign(&mut self, other: &Self) {
        FpPolynomial::sub_assign(self, other)
    }

    fn mul(&self, exp: &F) -> Self {
        self.mul_scalar(exp)
    }

    fn mul_assign(&mut self, exp: &F) {
        self.mul_scalar_assign(exp)
    }
}

/// Trait for polynomial commitment scheme.
pub trait PolyComScheme: Sized + Sync {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment produces, need to implement `HomomorphicPolyComElem`.
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + Debug
        + PartialEq
        + Eq
        + Clone
        + Send
        + Sync
        + Serialize
        + for<'de> Deserialize<'de>;

    /// Return the max degree of the polynomials this scheme can commit to.
    fn max_degree(&self) -> usize;

    /// Commit to the polynomial, commitment is binding.
    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment>;

    /// Evaluate the polynomial.
    fn eval(&self, poly: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field {
        poly.eval(point)
    }

    /// Compute the opening proof of `poly` at `point`.
    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        point: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment>;

    /// Verify an opening proof that the polynomial inside `cm`
    /// evaluates to `eval` on input `point`.
    fn verify(
        &self,
        cm: &Self::Commitment,
        degree: usize,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()>;

    /// Verify several single-point openings at once, combined with powers of `challenge`.
    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()>;

    /// Shrink this to only for verifier use.
    fn shrink_to_verifier_only(&self) -> Self;

    /// Derive the folding challenge of a batch opening at a single point.
    /// The challenge binds the point, every commitment and every claimed value.
    fn batch_fold_challenge<D>(
        point: &Self::Field,
        cm_vec: &[&Self::Commitment],
        eval_vec: &[Self::Field],
    ) -> Self::Field
    where
        D: Digest<OutputSize = U64> + Default,
    {
        let mut hasher = D::default();
        hasher.update(b"batch opening");
        hasher.update(point.to_bytes());
        for cm in cm_vec.iter() {
            hasher.update(cm.to_bytes());
        }
        for eval in eval_vec.iter() {
            hasher.update(eval.to_bytes());
        }
        Self::Field::from_hash(hasher)
    }

    /// Open several polynomials at the same point with one proof.
    /// Return the claimed values and the proof of the folded polynomial.
    fn batch_prove_single_point<D>(
        &self,
        polys: &[&FpPolynomial<Self::Field>],
        cm_vec: &[&Self::Commitment],
        point: &Self::Field,
        max_degree: usize,
    ) -> Result<(Vec<Self::Field>, Self::Commitment)>
    where
        D: Digest<OutputSize = U64> + Default,
    {
        if polys.is_empty() || polys.len() != cm_vec.len() {
            return Err(PlonkError::FuncParamsError);
        }
        let eval_vec: Vec<Self::Field> = polys.iter().map(|p| self.eval(p, point)).collect();
        let challenge = Self::batch_fold_challenge::<D>(point, cm_vec, &eval_vec);

        let mut folded = FpPolynomial::zero();
        let mut multiplier = Self::Field::one();
        for poly in polys.iter() {
            folded.add_assign(&poly.mul_scalar(&multiplier));
            multiplier.mul_assign(&challenge);
        }
        let proof = self.prove(&folded, point, max_degree)?;
        Ok((eval_vec, proof))
    }

    /// Fold the commitments and the claimed values of a single-point batch
    /// opening into one commitment and one value.
    fn fold_single_point<D>(
        cm_vec: &[&Self::Commitment],
        point: &Self::Field,
        eval_vec: &[Self::Field],
    ) -> Result<(Self::Commitment, Self::Field)>
    where
        D: Digest<OutputSize = U64> + Default,
    {
        if cm_vec.is_empty() || cm_vec.len() != eval_vec.len() {
            return Err(PlonkError::FuncParamsError);
        }
        let challenge = Self::batch_fold_challenge::<D>(point, cm_vec, eval_vec);

        let mut folded_cm = Self::Commitment::get_identity();
        let mut folded_eval = Self::Field::zero();
        let mut multiplier = Self::Field::one();
        for (cm, eval) in cm_vec.iter().zip(eval_vec.iter()) {
            folded_cm.add_assign(&cm.mul(&multiplier));
            folded_eval.add_assign(&eval.mul(&multiplier));
            multiplier.mul_assign(&challenge);
        }
        Ok((folded_cm, folded_eval))
    }

    /// Verify a single-point batch opening.
    fn batch_verify_single_point<D>(
        &self,
        cm_vec: &[&Self::Commitment],
        point: &Self::Field,
        eval_vec: &[Self::Field],
        proof: &Self::Commitment,
        max_degree: usize,
    ) -> Result<()>
    where
        D: Digest<OutputSize = U64> + Default,
    {
        let (folded_cm, folded_eval) = Self::fold_single_point::<D>(cm_vec, point, eval_vec)?;
        self.verify(&folded_cm, max_degree, point, &folded_eval, proof)
    }
}

#[cfg(test)]
mod test {
    use crate::poly_commit::{
        field_polynomial::FpPolynomial, kzg_poly_com::KZGCommitmentSchemeBLS, pcs::PolyComScheme,
    };
    use rand_chacha::ChaChaRng;
    use sha2::Sha512;
    use tessera_algebra::{bls12_381::BLSScalar, prelude::*};

    type F = BLSScalar;

    #[test]
    fn test_pcs_eval() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let poly = FpPolynomial::from_zeroes(&[F::zero(), F::one(), F::from(2u32)]);
        let degree = poly.degree();
        let pcs = KZGCommitmentSchemeBLS::new(degree, &mut prng);
        let com = pcs.commit(&poly).unwrap();
        let point = F::random(&mut prng);
        let proof = pcs.prove(&poly, &point, degree).unwrap();
        let eval = pcs.eval(&poly, &point);
        assert!(pcs.verify(&com, degree, &point, &eval, &proof).is_ok());
        assert!(pcs
            .verify(&com, degree, &point, &eval.add(&F::one()), &proof)
            .is_err());
    }

    #[test]
    fn test_batch_single_point() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let degree = 16;
        let pcs = KZGCommitmentSchemeBLS::new(degree, &mut prng);
        let polys: Vec<FpPolynomial<F>> = (0..5)
            .map(|i| FpPolynomial::random(&mut prng, degree - i))
            .collect();
        let cms: Vec<_> = polys.iter().map(|p| pcs.commit(p).unwrap()).collect();
        let poly_refs: Vec<&FpPolynomial<F>> = polys.iter().collect();
        let cm_refs: Vec<_> = cms.iter().collect();
        let point = F::random(&mut prng);

        let (evals, proof) = pcs
            .batch_prove_single_point::<Sha512>(&poly_refs, &cm_refs, &point, degree)
            .unwrap();
        for (poly, eval) in polys.iter().zip(evals.iter()) {
            assert_eq!(poly.eval(&point), *eval);
        }
        assert!(pcs
            .batch_verify_single_point::<Sha512>(&cm_refs, &point, &evals, &proof, degree)
            .is_ok());

        let mut wrong = evals.clone();
        wrong[3] = wrong[3].add(&F::one());
        assert!(pcs
            .batch_verify_single_point::<Sha512>(&cm_refs, &point, &wrong, &proof, degree)
            .is_err());

        let other_point = point.add(&F::one());
        assert!(pcs
            .batch_verify_single_point::<Sha512>(&cm_refs, &other_point, &evals, &proof, degree)
            .is_err());
    }

    #[test]
    fn test_batch_diff_points() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let degree = 10;
        let pcs = KZGCommitmentSchemeBLS::new(degree, &mut prng);
        let mut cms = vec![];
        let mut points = vec![];
        let mut evals = vec![];
        let mut proofs = vec![];
        for _ in 0..3 {
            let poly = FpPolynomial::<F>::random(&mut prng, degree);
            let point = F::random(&mut prng);
            cms.push(pcs.commit(&poly).unwrap());
            evals.push(poly.eval(&point));
            proofs.push(pcs.prove(&poly, &point, degree).unwrap());
            points.push(point);
        }
        let challenge = F::random(&mut prng);
        assert!(pcs
            .batch_verify_diff_points(&cms, &points, &evals, &proofs, &challenge)
            .is_ok());

        evals[1] = evals[1].add(&F::one());
        assert!(pcs
            .batch_verify_diff_points(&cms, &points, &evals, &proofs, &challenge)
            .is_err());
    }
}
