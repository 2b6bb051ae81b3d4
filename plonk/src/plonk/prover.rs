use crate::errors::{PlonkError, Result};
use crate::plonk::{
    blinding::{blind, blinded_eval, BlindingPolynomials},
    constraint_system::{
        hints::custom_gate_hint_id, ConstraintSystem, HintRegistry, Witness, N_SELECTORS,
        N_WIRES_PER_GATE, Q_K, Q_L, Q_M, Q_O, Q_R,
    },
    dag::{CancelToken, Step, StepGraph},
    helpers::{commitment_hash, domain_elements, first_lagrange_eval, qk_completion, z_evals},
    indexer::{PlonkPK, PlonkPf, PlonkProof},
    linearization::{
        linearization_poly, linearization_scalars, LinearizationChallenges, LinearizationEvals,
    },
    numerator::{coset_shifts, evaluate_numerator, NumeratorInputs},
    opening::{batch_open, fold_h, open, BatchOpeningProof, OpeningProof},
    quotient::{divide_by_vanishing, N_QUOTIENT_CHUNKS},
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
        transcript_get_plonk_challenge_gamma, transcript_get_plonk_challenge_zeta,
        transcript_init_plonk,
    },
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial, pcs::PolyComScheme, transcript::PolyComTranscript,
};
use ark_poly::Radix2EvaluationDomain;
use ark_std::{cfg_iter, end_timer, start_timer};
use merlin::Transcript;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rand_chacha::ChaChaRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::Arc;
use tessera_algebra::{prelude::*, traits::Domain};

/// PLONK Prover: it produces a proof that `witness` satisfies the constraint system `cs`.
/// The verifier must use a transcript in the same state as the prover's.
///
/// The proof is computed by the steps of [`Step`], each on its own thread.
/// It returns the first error of any step: [`PlonkError::InvalidWitness`] or
/// [`PlonkError::UnsatisfiedConstraint`] when the witness does not satisfy `cs`,
/// or an error of the commitment scheme when `pcs` does not match the parameters.
/// # Example
/// ```
/// use tessera_plonk::plonk::{
///     constraint_system::{SparseCS, Witness},
///     indexer::indexer,
///     prover::prover,
///     verifier::verifier,
/// };
/// use tessera_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBLS;
/// use merlin::Transcript;
/// use rand_chacha::ChaChaRng;
/// use tessera_algebra::{prelude::*, bls12_381::BLSScalar};
///
/// let mut prng = ChaChaRng::from_seed([0u8; 32]);
///
/// // x * y == 12, with x public
/// let mut cs = SparseCS::<BLSScalar>::new();
/// let x = cs.new_public_input();
/// let y = cs.new_secret_input();
/// let z = cs.mul(x, y);
/// cs.assert_constant(z, BLSScalar::from(12u32));
/// cs.pad();
///
/// let pcs = KZGCommitmentSchemeBLS::new(cs.size + 2, &mut prng);
/// let prover_params = indexer(&cs, &pcs).unwrap();
/// let witness = Witness::new(vec![BLSScalar::from(3u32)], vec![BLSScalar::from(4u32)]);
///
/// let proof = {
///     let mut transcript = Transcript::new(b"Test");
///     prover(&mut prng, &mut transcript, &pcs, &cs, &prover_params, &witness).unwrap()
/// };
///
/// let mut transcript = Transcript::new(b"Test");
/// assert!(verifier(
///     &mut transcript,
///     &pcs,
///     prover_params.get_verifier_params_ref(),
///     &witness.public,
///     &proof
/// )
/// .is_ok());
/// ```
pub fn prover<
    R: CryptoRng + RngCore,
    PCS: PolyComScheme,
    CS: ConstraintSystem<Field = PCS::Field>,
>(
    prng: &mut R,
    transcript: &mut Transcript,
    pcs: &PCS,
    cs: &CS,
    prover_params: &PlonkPK<PCS>,
    witness: &Witness<PCS::Field>,
) -> Result<PlonkPf<PCS>> {
    prover_with_cancel(
        prng,
        transcript,
        pcs,
        cs,
        prover_params,
        witness,
        &HintRegistry::with_defaults(),
        &CancelToken::new(),
    )
}

/// Prover with caller-supplied hints and a token cancelling the proof.
/// Once `cancel` is cancelled the steps stop at their next wait point
/// and the prover returns [`PlonkError::ContextCancelled`]. No step starts
/// when `cancel` was cancelled before the call. On error `transcript` is
/// left as it was.
///
/// The commitment hints of the custom gates in `hints` are replaced by
/// functions committing to the gates.
#[allow(clippy::too_many_arguments)]
pub fn prover_with_cancel<
    R: CryptoRng + RngCore,
    PCS: PolyComScheme,
    CS: ConstraintSystem<Field = PCS::Field>,
>(
    prng: &mut R,
    transcript: &mut Transcript,
    pcs: &PCS,
    cs: &CS,
    prover_params: &PlonkPK<PCS>,
    witness: &Witness<PCS::Field>,
    hints: &HintRegistry<'_, PCS::Field>,
    cancel: &CancelToken,
) -> Result<PlonkPf<PCS>> {
    let prover_timer = start_timer!(|| format!("PLONK prover for {} constraints", cs.size()));
    // `transcript` only advances when a proof is returned
    let mut local_transcript = transcript.clone();
    let state = ProverState::new(
        prng,
        &mut local_transcript,
        pcs,
        cs,
        prover_params,
        witness,
        hints,
    )?;
    let graph = StepGraph::new(cancel);
    if let Some(err) = graph.error() {
        return Err(err);
    }

    std::thread::scope(|s| {
        for step in Step::ALL {
            let state = &state;
            let graph = &graph;
            s.spawn(move || {
                graph.run(step, || {
                    let step_timer = start_timer!(|| step.name());
                    let res = state.run_step(step);
                    end_timer!(step_timer);
                    res
                })
            });
        }
    });

    if let Some(err) = graph.error() {
        return Err(err);
    }
    let proof = state.into_proof()?;
    *transcript = local_transcript;
    end_timer!(prover_timer);
    Ok(proof)
}

/// The wire values on the domain and their polynomials, before blinding.
struct Wires<F> {
    values: [Vec<F>; N_WIRES_PER_GATE],
    polys: [FpPolynomial<F>; N_WIRES_PER_GATE],
}

/// The inputs of one proof and the slot of every value a step publishes.
/// Each slot is written once by its producing step and read only after
/// that step completed.
struct ProverState<'a, 'h, PCS: PolyComScheme, CS> {
    pcs: &'a PCS,
    cs: &'a CS,
    params: &'a PlonkPK<PCS>,
    witness: &'a Witness<PCS::Field>,
    hints: &'a HintRegistry<'h, PCS::Field>,
    transcript: Mutex<&'a mut Transcript>,
    domain: Radix2EvaluationDomain<<PCS::Field as Domain>::Field>,
    n: usize,
    root: PCS::Field,
    group: Vec<PCS::Field>,
    blinding_seed: [u8; 32],
    slack_values: Vec<PCS::Field>,

    wires: OnceCell<Wires<PCS::Field>>,
    blinding: OnceCell<BlindingPolynomials<PCS::Field>>,
    custom: Vec<OnceCell<(FpPolynomial<PCS::Field>, PCS::Commitment)>>,
    qk: OnceCell<FpPolynomial<PCS::Field>>,
    lro: OnceCell<[FpPolynomial<PCS::Field>; N_WIRES_PER_GATE]>,
    cm_lro: OnceCell<[PCS::Commitment; N_WIRES_PER_GATE]>,
    gamma_beta: OnceCell<(PCS::Field, PCS::Field)>,
    z: OnceCell<FpPolynomial<PCS::Field>>,
    z_blinded: OnceCell<FpPolynomial<PCS::Field>>,
    cm_z: OnceCell<PCS::Commitment>,
    alpha: OnceCell<PCS::Field>,
    h: OnceCell<[FpPolynomial<PCS::Field>; N_QUOTIENT_CHUNKS]>,
    cm_h: OnceCell<[PCS::Commitment; N_QUOTIENT_CHUNKS]>,
    zeta: OnceCell<PCS::Field>,
    z_shifted_proof: OnceCell<OpeningProof<PCS::Commitment, PCS::Field>>,
    folded_h: OnceCell<(FpPolynomial<PCS::Field>, PCS::Commitment)>,
    linearization: OnceCell<(FpPolynomial<PCS::Field>, PCS::Commitment)>,
    batched_proof: OnceCell<BatchOpeningProof<PCS::Commitment, PCS::Field>>,
}

fn publish<T>(cell: &OnceCell<T>, value: T) -> Result<()> {
    let err = PlonkError::InvariantViolation("a value was published twice");
    cell.set(value).map_err(|_| err)
}

fn read<T>(cell: &OnceCell<T>) -> Result<&T> {
    let err = PlonkError::InvariantViolation("a value was read before it was published");
    cell.get().ok_or(err)
}

fn take<T>(cell: OnceCell<T>) -> Result<T> {
    let err = PlonkError::InvariantViolation("a value was never published");
    cell.into_inner().ok_or(err)
}

fn into_array<T, const N: usize>(v: Vec<T>) -> Result<[T; N]> {
    let err = PlonkError::InvariantViolation("unexpected number of values");
    v.try_into().map_err(|_| err)
}

impl<'a, 'h, PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>
    ProverState<'a, 'h, PCS, CS>
{
    fn new<R: CryptoRng + RngCore>(
        prng: &mut R,
        transcript: &'a mut Transcript,
        pcs: &'a PCS,
        cs: &'a CS,
        params: &'a PlonkPK<PCS>,
        witness: &'a Witness<PCS::Field>,
        hints: &'a HintRegistry<'h, PCS::Field>,
    ) -> Result<Self> {
        let n = cs.size();
        if !cs.is_padded()
            || n != params.verifier_params.cs_size
            || params.q_polys.len() != N_SELECTORS
            || params.s_polys.len() != N_WIRES_PER_GATE
            || params.custom_gates.len() != cs.custom_gates().len()
            || params.qcp_polys.len() != params.custom_gates.len()
            || params.quot_size % n != 0
        {
            return Err(PlonkError::FuncParamsError);
        }

        let domain = FpPolynomial::<PCS::Field>::evaluation_domain(n)?;
        let root = FpPolynomial::<PCS::Field>::domain_generator(&domain);
        let group = domain_elements(&root, n);

        // the steps never share the caller's rng
        let mut blinding_seed = [0u8; 32];
        prng.fill_bytes(&mut blinding_seed);
        let slack_values = params
            .custom_gates
            .iter()
            .map(|_| PCS::Field::random(prng))
            .collect();

        transcript_init_plonk(transcript, &params.verifier_params, &witness.public);

        Ok(Self {
            pcs,
            cs,
            params,
            witness,
            hints,
            transcript: Mutex::new(transcript),
            domain,
            n,
            root,
            group,
            blinding_seed,
            slack_values,
            wires: OnceCell::new(),
            blinding: OnceCell::new(),
            custom: params.custom_gates.iter().map(|_| OnceCell::new()).collect(),
            qk: OnceCell::new(),
            lro: OnceCell::new(),
            cm_lro: OnceCell::new(),
            gamma_beta: OnceCell::new(),
            z: OnceCell::new(),
            z_blinded: OnceCell::new(),
            cm_z: OnceCell::new(),
            alpha: OnceCell::new(),
            h: OnceCell::new(),
            cm_h: OnceCell::new(),
            zeta: OnceCell::new(),
            z_shifted_proof: OnceCell::new(),
            folded_h: OnceCell::new(),
            linearization: OnceCell::new(),
            batched_proof: OnceCell::new(),
        })
    }

    fn run_step(&self, step: Step) -> Result<()> {
        match step {
            Step::SolveConstraints => self.solve_constraints(),
            Step::InitBlindingPolynomials => self.init_blinding_polynomials(),
            Step::CompleteQk => self.complete_qk(),
            Step::CommitToLro => self.commit_to_lro(),
            Step::DeriveGammaAndBeta => self.derive_gamma_and_beta(),
            Step::BuildRatioCopyConstraint => self.build_ratio_copy_constraint(),
            Step::EvaluateConstraints => self.evaluate_constraints(),
            Step::OpenZ => self.open_z(),
            Step::FoldH => self.fold_h(),
            Step::ComputeLinearizedPolynomial => self.compute_linearized_polynomial(),
            Step::BatchOpening => self.batch_opening(),
        }
    }

    /// Build Pi_i, whose values are the committed inputs on the committed rows
    /// and a random value on the slack row, commit to it and return the hash
    /// of the commitment.
    fn commit_custom_gate(&self, index: usize, inputs: &[PCS::Field]) -> Result<Vec<PCS::Field>> {
        let gate = &self.params.custom_gates[index];
        if inputs.len() != gate.committed_rows.len() {
            return Err(PlonkError::InvariantViolation(
                "wrong number of committed values",
            ));
        }
        let mut values = vec![PCS::Field::zero(); self.n];
        for (row, v) in gate.committed_rows.iter().zip(inputs.iter()) {
            values[*row] = *v;
        }
        values[gate.slack_row] = self.slack_values[index];

        let poly = FpPolynomial::ifft_with_domain(&self.domain, &values)?;
        let cm = self.pcs.commit(&poly)?;
        let hash = commitment_hash(&cm);
        publish(&self.custom[index], (poly, cm))?;
        Ok(vec![hash])
    }

    fn solve_constraints(&self) -> Result<()> {
        let mut hints = self.hints.clone();
        for index in 0..self.custom.len() {
            hints.register(
                custom_gate_hint_id(index),
                Arc::new(move |inputs: &[PCS::Field]| -> Result<Vec<PCS::Field>> {
                    self.commit_custom_gate(index, inputs)
                }),
            );
        }
        let solution = self.cs.solve(self.witness, &hints)?;
        if self.custom.iter().any(|c| c.get().is_none()) {
            return Err(PlonkError::InvariantViolation(
                "a custom gate was not committed",
            ));
        }

        let values = [solution.l, solution.r, solution.o];
        let polys = cfg_iter!(values)
            .map(|v| FpPolynomial::ifft_with_domain(&self.domain, v))
            .collect::<Result<Vec<_>>>()?;
        publish(
            &self.wires,
            Wires {
                values,
                polys: into_array(polys)?,
            },
        )
    }

    fn init_blinding_polynomials(&self) -> Result<()> {
        let mut prng = ChaChaRng::from_seed(self.blinding_seed);
        publish(&self.blinding, BlindingPolynomials::random(&mut prng))
    }

    /// Qk with the public inputs and the hashed custom gate commitments
    /// written into their rows. The proving key keeps the original Qk.
    fn complete_qk(&self) -> Result<()> {
        let vk = &self.params.verifier_params;
        let hashes = self
            .custom
            .iter()
            .map(|c| read(c).map(|(_, cm)| commitment_hash(cm)))
            .collect::<Result<Vec<PCS::Field>>>()?;
        let mut values = self.params.qk_evals.clone();
        for (row, v) in qk_completion(
            &vk.public_rows,
            &self.witness.public,
            &vk.commitment_rows,
            &hashes,
        ) {
            values[row].add_assign(&v);
        }
        publish(
            &self.qk,
            FpPolynomial::ifft_with_domain(&self.domain, &values)?,
        )
    }

    fn commit_to_lro(&self) -> Result<()> {
        let wires = read(&self.wires)?;
        let blinding = read(&self.blinding)?;
        let lro: Vec<_> = (0..N_WIRES_PER_GATE)
            .map(|i| blind(&wires.polys[i], blinding.wire(i), self.n))
            .collect();
        let cm_lro = cfg_iter!(lro)
            .map(|p| self.pcs.commit(p))
            .collect::<Result<Vec<_>>>()?;
        publish(&self.lro, into_array(lro)?)?;
        publish(&self.cm_lro, into_array(cm_lro)?)
    }

    fn derive_gamma_and_beta(&self) -> Result<()> {
        let cm_lro = read(&self.cm_lro)?;
        let mut transcript = self.transcript.lock();
        for cm in cm_lro.iter() {
            transcript.append_commitment(cm);
        }
        let gamma = transcript_get_plonk_challenge_gamma(&mut transcript, self.n);
        let beta = transcript_get_plonk_challenge_beta(&mut transcript, self.n);
        publish(&self.gamma_beta, (gamma, beta))
    }

    fn build_ratio_copy_constraint(&self) -> Result<()> {
        let wires = read(&self.wires)?;
        let blinding = read(&self.blinding)?;
        let (gamma, beta) = read(&self.gamma_beta)?;
        let values = z_evals(
            [&wires.values[0], &wires.values[1], &wires.values[2]],
            &self.params.permutation,
            &self.group,
            &self.params.verifier_params.k,
            gamma,
            beta,
        )?;
        let z = FpPolynomial::ifft_with_domain(&self.domain, &values)?;
        let z_blinded = blind(&z, &blinding.z, self.n);
        let cm_z = self.pcs.commit(&z_blinded)?;
        publish(&self.z, z)?;
        publish(&self.z_blinded, z_blinded)?;
        publish(&self.cm_z, cm_z)
    }

    fn evaluate_constraints(&self) -> Result<()> {
        let (gamma, beta) = *read(&self.gamma_beta)?;
        let cm_z = read(&self.cm_z)?;
        let custom = self.custom.iter().map(read).collect::<Result<Vec<_>>>()?;

        let alpha: PCS::Field = {
            let mut transcript = self.transcript.lock();
            for (_, cm) in custom.iter() {
                transcript.append_commitment(cm);
            }
            transcript.append_commitment(cm_z);
            transcript_get_plonk_challenge_alpha(&mut transcript, self.n)
        };

        let wires = read(&self.wires)?;
        let q = &self.params.q_polys;
        let inputs = NumeratorInputs {
            wires: [&wires.polys[0], &wires.polys[1], &wires.polys[2]],
            z: read(&self.z)?,
            blinding: read(&self.blinding)?,
            selectors: [&q[Q_L], &q[Q_R], &q[Q_M], &q[Q_O], read(&self.qk)?],
            qcp: &self.params.qcp_polys,
            custom: custom.iter().map(|(p, _)| p).collect(),
            perms: &self.params.s_polys,
            k: &self.params.verifier_params.k,
            gamma,
            beta,
            alpha,
        };
        let rho = self.params.quot_size / self.n;
        let shifts = coset_shifts(&self.params.coset_generator, &self.params.root_m, rho);
        let numerator = evaluate_numerator(&inputs, self.n, &shifts)?;
        let h = divide_by_vanishing(&numerator, &shifts, &self.params.coset_generator)?;
        let cm_h = cfg_iter!(h)
            .map(|p| self.pcs.commit(p))
            .collect::<Result<Vec<_>>>()?;
        let cm_h: [PCS::Commitment; N_QUOTIENT_CHUNKS] = into_array(cm_h)?;

        let zeta: PCS::Field = {
            let mut transcript = self.transcript.lock();
            for cm in cm_h.iter() {
                transcript.append_commitment(cm);
            }
            transcript_get_plonk_challenge_zeta(&mut transcript, self.n)
        };

        publish(&self.alpha, alpha)?;
        publish(&self.h, h)?;
        publish(&self.cm_h, cm_h)?;
        publish(&self.zeta, zeta)
    }

    fn open_z(&self) -> Result<()> {
        let zeta = read(&self.zeta)?;
        let point = zeta.mul(&self.root);
        let proof = open(self.pcs, read(&self.z_blinded)?, &point, self.n + 2)?;
        publish(&self.z_shifted_proof, proof)
    }

    fn fold_h(&self) -> Result<()> {
        let zeta = read(&self.zeta)?;
        let folded = fold_h(read(&self.h)?, zeta, self.n);
        let digest = fold_h(read(&self.cm_h)?, zeta, self.n);
        publish(&self.folded_h, (folded, digest))
    }

    fn compute_linearized_polynomial(&self) -> Result<()> {
        let (gamma, beta) = *read(&self.gamma_beta)?;
        let alpha = *read(&self.alpha)?;
        let zeta = *read(&self.zeta)?;
        let wires = read(&self.wires)?;
        let blinding = read(&self.blinding)?;
        let z_blinded = read(&self.z_blinded)?;
        let s_polys = &self.params.s_polys;

        // X^n - 1 takes the same value at zeta and zeta * omega
        let (z_h_eval, l1_eval) = first_lagrange_eval(&zeta, self.n)?;
        let zeta_omega = zeta.mul(&self.root);
        let z_eval = read(&self.z)?.eval(&zeta_omega);
        let evals = LinearizationEvals {
            wires: [0, 1, 2].map(|i| {
                let eval = wires.polys[i].eval(&zeta);
                blinded_eval(&eval, blinding.wire(i), &zeta, &z_h_eval)
            }),
            perms: [s_polys[0].eval(&zeta), s_polys[1].eval(&zeta)],
            z_shifted: blinded_eval(&z_eval, &blinding.z, &zeta_omega, &z_h_eval),
            qcp: self.params.qcp_polys.iter().map(|q| q.eval(&zeta)).collect(),
        };
        let challenges = LinearizationChallenges {
            gamma,
            beta,
            alpha,
            zeta,
            l1_eval,
        };
        let scalars =
            linearization_scalars(&evals, &challenges, &self.params.verifier_params.k);

        let q = &self.params.q_polys;
        let custom = self
            .custom
            .iter()
            .map(|c| read(c).map(|(p, _)| p))
            .collect::<Result<Vec<_>>>()?;
        let r = linearization_poly(
            &scalars,
            [&q[Q_L], &q[Q_R], &q[Q_M], &q[Q_O], &q[Q_K]],
            &custom,
            &s_polys[N_WIRES_PER_GATE - 1],
            z_blinded,
        )?;
        let cm_r = self.pcs.commit(&r)?;
        publish(&self.linearization, (r, cm_r))
    }

    fn batch_opening(&self) -> Result<()> {
        let zeta = read(&self.zeta)?;
        let (folded_h, cm_folded_h) = read(&self.folded_h)?;
        let (r, cm_r) = read(&self.linearization)?;
        let lro = read(&self.lro)?;
        let cm_lro = read(&self.cm_lro)?;
        let vk = &self.params.verifier_params;

        let mut polys = vec![folded_h, r];
        polys.extend(lro.iter());
        polys.extend(self.params.s_polys[..N_WIRES_PER_GATE - 1].iter());
        polys.extend(self.params.qcp_polys.iter());

        let mut cm_vec = vec![cm_folded_h, cm_r];
        cm_vec.extend(cm_lro.iter());
        cm_vec.extend(vk.cm_s_vec[..N_WIRES_PER_GATE - 1].iter());
        cm_vec.extend(vk.cm_qcp_vec.iter());

        let proof = batch_open(self.pcs, &polys, &cm_vec, zeta, self.n + 2)?;
        publish(&self.batched_proof, proof)
    }

    fn into_proof(self) -> Result<PlonkPf<PCS>> {
        let cm_custom = self
            .custom
            .into_iter()
            .map(|c| take(c).map(|(_, cm)| cm))
            .collect::<Result<Vec<_>>>()?;
        Ok(PlonkProof {
            cm_lro: take(self.cm_lro)?,
            cm_z: take(self.cm_z)?,
            cm_h: take(self.cm_h)?,
            cm_custom,
            batched_proof: take(self.batched_proof)?,
            z_shifted_proof: take(self.z_shifted_proof)?,
        })
    }
}
