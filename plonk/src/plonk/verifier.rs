use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{N_SELECTORS, N_WIRES_PER_GATE},
    helpers::{
        commitment_hash, eval_lagrange_sum, first_lagrange_eval, qk_completion, PlonkChallenges,
    },
    indexer::{PlonkPf, PlonkVK},
    linearization::{
        linearization_combine, linearization_scalars, LinearizationChallenges, LinearizationEvals,
    },
    opening::{fold_batch_opening, fold_h},
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
        transcript_get_plonk_challenge_gamma, transcript_get_plonk_challenge_u,
        transcript_get_plonk_challenge_zeta, transcript_init_plonk,
    },
};
use crate::poly_commit::{pcs::PolyComScheme, transcript::PolyComTranscript};
use ark_std::{end_timer, start_timer};
use merlin::Transcript;
use tessera_algebra::prelude::*;

/// The number of values opened at \zeta besides the custom gate selectors:
/// the folded quotient, r, L, R, O, S1 and S2.
const N_OPENED_AT_ZETA: usize = 7;

/// Verify a proof that the circuit of `vk` is satisfied with `public_inputs`.
/// The transcript must be in the same state as the prover's was.
/// # Example
/// See [`crate::plonk::prover::prover`].
pub fn verifier<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    pcs: &PCS,
    vk: &PlonkVK<PCS>,
    public_inputs: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    let n = vk.cs_size;
    let n_custom = vk.cm_qcp_vec.len();
    if public_inputs.len() != vk.public_rows.len()
        || vk.commitment_rows.len() != n_custom
        || vk.cm_q_vec.len() != N_SELECTORS
        || vk.cm_s_vec.len() != N_WIRES_PER_GATE
    {
        return Err(PlonkError::FuncParamsError);
    }
    if proof.cm_custom.len() != n_custom
        || proof.batched_proof.claimed_values.len() != N_OPENED_AT_ZETA + n_custom
    {
        return Err(PlonkError::VerificationError);
    }

    let verifier_timer = start_timer!(|| format!("PLONK verifier for {} constraints", n));

    transcript_init_plonk(transcript, vk, public_inputs);
    let mut challenges = PlonkChallenges::<PCS::Field>::new();

    for cm in proof.cm_lro.iter() {
        transcript.append_commitment(cm);
    }
    let gamma = transcript_get_plonk_challenge_gamma(transcript, n);
    let beta = transcript_get_plonk_challenge_beta(transcript, n);
    challenges.insert_gamma_beta(gamma, beta)?;

    for cm in proof.cm_custom.iter() {
        transcript.append_commitment(cm);
    }
    transcript.append_commitment(&proof.cm_z);
    let alpha = transcript_get_plonk_challenge_alpha(transcript, n);
    challenges.insert_alpha(alpha)?;

    for cm in proof.cm_h.iter() {
        transcript.append_commitment(cm);
    }
    let zeta = transcript_get_plonk_challenge_zeta(transcript, n);
    challenges.insert_zeta(zeta)?;

    let values = &proof.batched_proof.claimed_values;
    let h_eval = values[0];
    let r_eval = values[1];
    let evals = LinearizationEvals {
        wires: [values[2], values[3], values[4]],
        perms: [values[5], values[6]],
        z_shifted: proof.z_shifted_proof.claimed_value,
        qcp: values[N_OPENED_AT_ZETA..].to_vec(),
    };

    let (gamma, beta) = challenges.get_gamma_beta()?;
    let alpha = challenges.get_alpha()?;
    let zeta = challenges.get_zeta()?;
    let (z_h_eval, l1_eval) = first_lagrange_eval(zeta, n)?;

    // the public inputs and the hashed custom gate commitments complete Qk
    let hashes: Vec<PCS::Field> = proof.cm_custom.iter().map(commitment_hash).collect();
    let pi_eval = eval_lagrange_sum(
        &vk.root,
        n,
        &qk_completion(&vk.public_rows, public_inputs, &vk.commitment_rows, &hashes),
        zeta,
        &z_h_eval,
    )?;

    // r(zeta) + PI(zeta) + alpha * zu * (l + beta s1 + gamma)(r + beta s2 + gamma)(o + gamma)
    // - alpha^2 L1(zeta) == H(zeta)(zeta^n - 1)
    let [_, _, o] = evals.wires;
    let mut perm_term = alpha.mul(&evals.z_shifted).mul(&o.add(gamma));
    for (w, s) in evals.wires.iter().zip(evals.perms.iter()) {
        perm_term.mul_assign(&w.add(&beta.mul(s)).add(gamma));
    }
    let lhs = r_eval
        .add(&pi_eval)
        .add(&perm_term)
        .sub(&alpha.square().mul(&l1_eval));
    if lhs != h_eval.mul(&z_h_eval) {
        return Err(PlonkError::VerificationError);
    }

    let scalars = linearization_scalars(
        &evals,
        &LinearizationChallenges {
            gamma: *gamma,
            beta: *beta,
            alpha: *alpha,
            zeta: *zeta,
            l1_eval,
        },
        &vk.k,
    );
    let cm_r = linearization_combine(
        &scalars,
        &vk.cm_q_vec,
        &proof.cm_custom,
        &vk.cm_s_vec[N_WIRES_PER_GATE - 1],
        &proof.cm_z,
    )?;
    let cm_folded_h = fold_h(&proof.cm_h, zeta, n);

    let mut cm_vec = vec![&cm_folded_h, &cm_r];
    cm_vec.extend(proof.cm_lro.iter());
    cm_vec.extend(vk.cm_s_vec[..N_WIRES_PER_GATE - 1].iter());
    cm_vec.extend(vk.cm_qcp_vec.iter());
    let (cm_batched, eval_batched) =
        fold_batch_opening::<PCS>(&cm_vec, zeta, &proof.batched_proof)?;

    for v in values.iter() {
        transcript.append_field_elem(v);
    }
    transcript.append_field_elem(&evals.z_shifted);
    let u = transcript_get_plonk_challenge_u(transcript, n);

    let res = pcs
        .batch_verify_diff_points(
            &[cm_batched, proof.cm_z.clone()],
            &[*zeta, zeta.mul(&vk.root)],
            &[eval_batched, evals.z_shifted],
            &[
                proof.batched_proof.proof.clone(),
                proof.z_shifted_proof.proof.clone(),
            ],
            &u,
        )
        .map_err(|_| PlonkError::VerificationError);
    end_timer!(verifier_timer);
    res
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        constraint_system::{SparseCS, Witness},
        indexer::{indexer, PlonkPf},
        prover::prover,
        verifier::verifier,
    };
    use crate::poly_commit::kzg_poly_com::KZGCommitmentSchemeBLS;
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;
    use tessera_algebra::{bls12_381::BLSScalar, prelude::*};

    type F = BLSScalar;

    #[test]
    fn test_tampered_values_are_rejected() {
        let mut prng = ChaChaRng::from_seed([7u8; 32]);
        let mut cs = SparseCS::<F>::new();
        let x = cs.new_public_input();
        let y = cs.new_secret_input();
        let z = cs.mul(x, y);
        let _ = cs.commit(&[z]).unwrap();
        cs.pad();
        let pcs = KZGCommitmentSchemeBLS::new(cs.size + 2, &mut prng);
        let params = indexer(&cs, &pcs).unwrap();
        let vk = params.get_verifier_params_ref();
        let witness = Witness::new(vec![F::from(2u32)], vec![F::from(9u32)]);
        let proof = prover(
            &mut prng,
            &mut Transcript::new(b"Test"),
            &pcs,
            &cs,
            &params,
            &witness,
        )
        .unwrap();

        let verify = |public: &[F], proof: &PlonkPf<KZGCommitmentSchemeBLS>| {
            verifier(&mut Transcript::new(b"Test"), &pcs, vk, public, proof)
        };
        assert!(verify(&witness.public, &proof).is_ok());
        assert_eq!(
            verify(&[F::from(3u32)], &proof),
            Err(PlonkError::VerificationError)
        );
        assert_eq!(verify(&[], &proof), Err(PlonkError::FuncParamsError));

        // every opened value is bound by the relation or the openings
        for i in 0..proof.batched_proof.claimed_values.len() {
            let mut tampered = proof.clone();
            tampered.batched_proof.claimed_values[i].add_assign(&F::one());
            assert!(verify(&witness.public, &tampered).is_err(), "value {}", i);
        }
        let mut tampered = proof.clone();
        tampered.z_shifted_proof.claimed_value.add_assign(&F::one());
        assert!(verify(&witness.public, &tampered).is_err());

        let mut tampered = proof.clone();
        tampered.cm_custom.swap_remove(0);
        assert_eq!(
            verify(&witness.public, &tampered),
            Err(PlonkError::VerificationError)
        );

        let mut tampered = proof.clone();
        tampered.cm_h.swap(0, 1);
        assert!(verify(&witness.public, &tampered).is_err());

        // a different transcript label derives other challenges
        assert!(verifier(
            &mut Transcript::new(b"Other"),
            &pcs,
            vk,
            &witness.public,
            &proof
        )
        .is_err());
    }
}
