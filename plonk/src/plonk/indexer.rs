use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{ConstraintSystem, CsIndex, CustomGate, N_SELECTORS, N_WIRES_PER_GATE, Q_K},
    opening::{BatchOpeningProof, OpeningProof},
};
use crate::poly_commit::{field_polynomial::FpPolynomial, pcs::PolyComScheme};
use ark_poly::EvaluationDomain;
use ark_std::{end_timer, start_timer};
use tessera_algebra::{prelude::*, traits::Domain};

/// The data structure of a Plonk proof.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize, Clone)]
pub struct PlonkProof<C, F> {
    /// The commitments of the blinded L, R and O polynomials.
    pub cm_lro: [C; N_WIRES_PER_GATE],
    /// The commitment of the blinded grand product polynomial.
    pub cm_z: C,
    /// The commitments of the three chunks of the quotient polynomial.
    pub cm_h: [C; 3],
    /// The commitments of the custom gate polynomials.
    pub cm_custom: Vec<C>,
    /// The batched opening at \zeta.
    pub batched_proof: BatchOpeningProof<C, F>,
    /// The opening of z(X) at \zeta * \omega.
    pub z_shifted_proof: OpeningProof<C, F>,
}

/// The type of the Plonk proof with a specific polynomial commitment scheme.
pub type PlonkPf<PCS> =
    PlonkProof<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Plonk prover parameters.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlonkProverParams<O, C, F> {
    /// The polynomials of the fixed selectors, in the order Ql, Qr, Qm, Qo, Qk.
    pub q_polys: Vec<O>,
    /// The selector polynomials of the custom gates.
    pub qcp_polys: Vec<O>,
    /// The polynomials of perm1, perm2, perm3.
    pub s_polys: Vec<O>,
    /// The values of Qk on the domain, completed by the prover for each proof.
    pub qk_evals: Vec<F>,
    /// The permutation over the `3 * n` wire slots.
    pub permutation: Vec<usize>,
    /// The layout of the custom gates.
    pub custom_gates: Vec<CustomGate>,
    /// The size of the evaluation domain of the quotient polynomial.
    pub quot_size: usize,
    /// The generator of the evaluation domain of the quotient polynomial.
    pub root_m: F,
    /// The generator of the cosets the quotient polynomial is evaluated on.
    pub coset_generator: F,
    /// The Plonk verifier parameters.
    pub verifier_params: PlonkVerifierParams<C, F>,
}

/// Prover parameters over a particular polynomial commitment scheme.
pub type PlonkPK<PCS> = PlonkProverParams<
    FpPolynomial<<PCS as PolyComScheme>::Field>,
    <PCS as PolyComScheme>::Commitment,
    <PCS as PolyComScheme>::Field,
>;

impl<O, C, F> PlonkProverParams<O, C, F> {
    /// Return the verifier parameters.
    pub fn get_verifier_params(self) -> PlonkVerifierParams<C, F> {
        self.verifier_params
    }

    /// Return a reference of verifier parameters.
    pub fn get_verifier_params_ref(&self) -> &PlonkVerifierParams<C, F> {
        &self.verifier_params
    }
}

/// Plonk verifier parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlonkVerifierParams<C, F> {
    /// The commitments of the fixed selectors.
    pub cm_q_vec: Vec<C>,
    /// The commitments of the custom gate selectors.
    pub cm_qcp_vec: Vec<C>,
    /// The commitments of perm1, perm2, perm3.
    pub cm_s_vec: Vec<C>,
    /// The shifts of the identity permutation: 1, s and s^2.
    pub k: Vec<F>,
    /// The generator of the evaluation domain.
    pub root: F,
    /// The size of constraint system.
    pub cs_size: usize,
    /// The rows of the public inputs.
    pub public_rows: Vec<CsIndex>,
    /// The rows holding the hash of each custom gate commitment.
    pub commitment_rows: Vec<CsIndex>,
}

/// Define the PLONK verifier params by given `PolyComScheme`.
pub type PlonkVK<PCS> =
    PlonkVerifierParams<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Encode the permutation value, from an index to a group element.
/// Slot `p` of wire `p / n` maps to `k[p / n] * group[p % n]`.
pub fn encode_perm_to_group<F: Scalar>(group: &[F], perm: &[usize], k: &[F]) -> Vec<F> {
    let n = group.len();
    perm.iter().map(|p| k[p / n].mul(&group[p % n])).collect()
}

/// Return the shifts `1, s, s^2` of the identity permutation, with `s` the
/// multiplicative generator of the field. The cosets `k_i * H` of the order-n
/// subgroup H are pairwise disjoint.
pub fn permutation_shifts<F: Scalar>() -> Vec<F> {
    let s = F::multiplicative_generator();
    vec![F::one(), s, s.square()]
}

/// Run the Plonk indexer.
/// Before invoking indexer function, the constraint system `cs` should pad the number of
/// constraints to a power of two.
pub fn indexer<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    pcs: &PCS,
) -> Result<PlonkPK<PCS>> {
    if !cs.is_padded() {
        return Err(PlonkError::FuncParamsError);
    }
    let n = cs.size();
    let m = cs.quot_eval_dom_size();
    if m % n != 0 {
        return Err(PlonkError::SetupError);
    }
    // the blinded grand product has degree n + 2
    if pcs.max_degree() < n + 2 {
        return Err(PlonkError::SetupError);
    }

    let indexer_timer = start_timer!(|| format!("Indexer for {} constraints", n));

    let domain = FpPolynomial::<PCS::Field>::evaluation_domain(n)?;
    let domain_m = FpPolynomial::<PCS::Field>::evaluation_domain(m)?;
    let root = FpPolynomial::<PCS::Field>::domain_generator(&domain);
    let root_m = FpPolynomial::<PCS::Field>::domain_generator(&domain_m);
    let group: Vec<PCS::Field> = domain.elements().map(PCS::Field::from_field).collect();
    let k = permutation_shifts::<PCS::Field>();

    // Step 1: compute permutation polynomials and commit them.
    let perm_timer = start_timer!(|| "Permutation polynomials");
    let permutation = cs.compute_permutation();
    let encoded_perm = encode_perm_to_group(&group, &permutation, &k);
    let mut s_polys = Vec::with_capacity(N_WIRES_PER_GATE);
    let mut cm_s_vec = Vec::with_capacity(N_WIRES_PER_GATE);
    for i in 0..N_WIRES_PER_GATE {
        let s_coefs = FpPolynomial::ifft_with_domain(&domain, &encoded_perm[i * n..(i + 1) * n])?;
        cm_s_vec.push(pcs.commit(&s_coefs)?);
        s_polys.push(s_coefs);
    }
    end_timer!(perm_timer);

    // Step 2: compute selector polynomials and commit them.
    let selectors_timer = start_timer!(|| "Selector polynomials");
    let mut q_polys = Vec::with_capacity(N_SELECTORS);
    let mut cm_q_vec = Vec::with_capacity(N_SELECTORS);
    for i in 0..N_SELECTORS {
        let q_coefs = FpPolynomial::ifft_with_domain(&domain, cs.selector(i)?)?;
        cm_q_vec.push(pcs.commit(&q_coefs)?);
        q_polys.push(q_coefs);
    }

    let custom_gates = cs.custom_gates().to_vec();
    let mut qcp_polys = Vec::with_capacity(custom_gates.len());
    let mut cm_qcp_vec = Vec::with_capacity(custom_gates.len());
    for i in 0..custom_gates.len() {
        let qcp_coefs = FpPolynomial::ifft_with_domain(&domain, cs.custom_selector(i)?)?;
        cm_qcp_vec.push(pcs.commit(&qcp_coefs)?);
        qcp_polys.push(qcp_coefs);
    }
    end_timer!(selectors_timer);

    let verifier_params = PlonkVerifierParams {
        cm_q_vec,
        cm_qcp_vec,
        cm_s_vec,
        k,
        root,
        cs_size: n,
        public_rows: cs.public_rows().to_vec(),
        commitment_rows: custom_gates.iter().map(|g| g.commitment_row).collect(),
    };

    end_timer!(indexer_timer);

    Ok(PlonkProverParams {
        q_polys,
        qcp_polys,
        s_polys,
        qk_evals: cs.selector(Q_K)?.to_vec(),
        permutation,
        custom_gates,
        quot_size: m,
        root_m,
        coset_generator: PCS::Field::multiplicative_generator(),
        verifier_params,
    })
}
