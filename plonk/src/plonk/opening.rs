use crate::errors::Result;
use crate::plonk::quotient::N_QUOTIENT_CHUNKS;
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme},
};
use sha2::Sha512;
use tessera_algebra::prelude::*;

/// A batched opening of several polynomials at one point.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize, Clone)]
pub struct BatchOpeningProof<C, F> {
    /// The opening proof of the folded polynomial.
    pub proof: C,
    /// The claimed value of each polynomial.
    pub claimed_values: Vec<F>,
}

/// An opening of one polynomial at one point.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize, Clone)]
pub struct OpeningProof<C, F> {
    /// The opening proof.
    pub proof: C,
    /// The claimed value.
    pub claimed_value: F,
}

/// Fold the quotient chunks, or their commitments, into
/// `h1 + zeta^{n+2} h2 + zeta^{2(n+2)} h3`.
pub fn fold_h<F: Scalar, E: HomomorphicPolyComElem<Scalar = F>>(
    h: &[E; N_QUOTIENT_CHUNKS],
    zeta: &F,
    n: usize,
) -> E {
    let factor = zeta.pow(&[(n + 2) as u64]);
    let mut folded = h[N_QUOTIENT_CHUNKS - 1].mul(&F::one());
    for chunk in h.iter().rev().skip(1) {
        folded.mul_assign(&factor);
        folded.add_assign(chunk);
    }
    folded
}

/// Open `poly` at `point`.
pub fn open<PCS: PolyComScheme>(
    pcs: &PCS,
    poly: &FpPolynomial<PCS::Field>,
    point: &PCS::Field,
    max_degree: usize,
) -> Result<OpeningProof<PCS::Commitment, PCS::Field>> {
    let claimed_value = pcs.eval(poly, point);
    let proof = pcs.prove(poly, point, max_degree)?;
    Ok(OpeningProof {
        proof,
        claimed_value,
    })
}

/// Open every polynomial of `polys` at `point` with one proof.
/// The folding challenge hashes the point, the commitments and the values.
pub fn batch_open<PCS: PolyComScheme>(
    pcs: &PCS,
    polys: &[&FpPolynomial<PCS::Field>],
    cm_vec: &[&PCS::Commitment],
    point: &PCS::Field,
    max_degree: usize,
) -> Result<BatchOpeningProof<PCS::Commitment, PCS::Field>> {
    let (claimed_values, proof) =
        pcs.batch_prove_single_point::<Sha512>(polys, cm_vec, point, max_degree)?;
    Ok(BatchOpeningProof {
        proof,
        claimed_values,
    })
}

/// Fold a batched opening into one commitment and one value.
pub fn fold_batch_opening<PCS: PolyComScheme>(
    cm_vec: &[&PCS::Commitment],
    point: &PCS::Field,
    proof: &BatchOpeningProof<PCS::Commitment, PCS::Field>,
) -> Result<(PCS::Commitment, PCS::Field)> {
    PCS::fold_single_point::<Sha512>(cm_vec, point, &proof.claimed_values)
}
