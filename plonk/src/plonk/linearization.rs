//! The linearization polynomial
//! `r(X) = l Ql + r Qr + l r Qm + o Qo + Qk + sum_i qcp_i(zeta) Pi_i
//!  + alpha beta Z(w zeta) (l + beta s1 + gamma)(r + beta s2 + gamma) S3
//!  + (alpha^2 L1(zeta) - alpha prod_j (w_j + beta k_j zeta + gamma)) Z`,
//! where l, r, o, s1, s2 are the values at \zeta.
//! It leaves symbolic every polynomial whose value at \zeta is not opened,
//! so one opening of r replaces the openings of the selectors, S3 and Z.
use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{N_SELECTORS, N_WIRES_PER_GATE};
use crate::poly_commit::{field_polynomial::FpPolynomial, pcs::HomomorphicPolyComElem};
use ark_std::cfg_into_iter;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tessera_algebra::prelude::*;

/// The opened values the linearization depends on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearizationEvals<F> {
    /// The blinded L, R and O at \zeta.
    pub wires: [F; N_WIRES_PER_GATE],
    /// S1 and S2 at \zeta.
    pub perms: [F; N_WIRES_PER_GATE - 1],
    /// The blinded Z at \zeta\omega.
    pub z_shifted: F,
    /// The custom gate selectors at \zeta.
    pub qcp: Vec<F>,
}

/// The challenges and the first Lagrange base at \zeta.
#[derive(Clone, Debug)]
pub struct LinearizationChallenges<F> {
    /// \gamma
    pub gamma: F,
    /// \beta
    pub beta: F,
    /// \alpha
    pub alpha: F,
    /// \zeta
    pub zeta: F,
    /// L1(\zeta)
    pub l1_eval: F,
}

/// The scalar of each polynomial in r(X).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearizationScalars<F> {
    /// The scalars of Ql, Qr, Qm, Qo, Qk.
    pub selectors: [F; N_SELECTORS],
    /// The scalars of the custom gate polynomials.
    pub custom: Vec<F>,
    /// The scalar of S3.
    pub s3: F,
    /// The scalar of Z.
    pub z: F,
}

/// Compute the scalars of r(X).
pub fn linearization_scalars<F: Scalar>(
    evals: &LinearizationEvals<F>,
    challenges: &LinearizationChallenges<F>,
    k: &[F],
) -> LinearizationScalars<F> {
    let LinearizationChallenges {
        gamma,
        beta,
        alpha,
        zeta,
        l1_eval,
    } = challenges;
    let [l, r, o] = evals.wires;

    let mut s3 = alpha.mul(beta).mul(&evals.z_shifted);
    for (w, s) in evals.wires.iter().zip(evals.perms.iter()) {
        s3.mul_assign(&w.add(&beta.mul(s)).add(gamma));
    }

    let beta_zeta = beta.mul(zeta);
    let mut id_prod = *alpha;
    for (w, k_j) in evals.wires.iter().zip(k.iter()) {
        id_prod.mul_assign(&w.add(&beta_zeta.mul(k_j)).add(gamma));
    }
    let z = alpha.square().mul(l1_eval).sub(&id_prod);

    LinearizationScalars {
        selectors: [l, r, l.mul(&r), o, F::one()],
        custom: evals.qcp.clone(),
        s3,
        z,
    }
}

/// Combine the polynomials, or their commitments, of r(X).
pub fn linearization_combine<F: Scalar, E: HomomorphicPolyComElem<Scalar = F>>(
    scalars: &LinearizationScalars<F>,
    selectors: &[E],
    custom: &[E],
    s3: &E,
    z: &E,
) -> Result<E> {
    if selectors.len() != N_SELECTORS || custom.len() != scalars.custom.len() {
        return Err(PlonkError::InvariantViolation(
            "malformed linearization inputs",
        ));
    }
    let mut res = E::get_identity();
    for (e, s) in selectors
        .iter()
        .chain(custom.iter())
        .zip(scalars.selectors.iter().chain(scalars.custom.iter()))
    {
        res.add_assign(&e.mul(s));
    }
    res.add_assign(&s3.mul(&scalars.s3));
    res.add_assign(&z.mul(&scalars.z));
    Ok(res)
}

/// Compute r(X) coefficient by coefficient.
pub fn linearization_poly<F: Scalar>(
    scalars: &LinearizationScalars<F>,
    selectors: [&FpPolynomial<F>; N_SELECTORS],
    custom: &[&FpPolynomial<F>],
    s3: &FpPolynomial<F>,
    z: &FpPolynomial<F>,
) -> Result<FpPolynomial<F>> {
    if custom.len() != scalars.custom.len() {
        return Err(PlonkError::InvariantViolation(
            "malformed linearization inputs",
        ));
    }
    let mut terms: Vec<(&F, &FpPolynomial<F>)> = scalars
        .selectors
        .iter()
        .zip(selectors.iter().copied())
        .chain(scalars.custom.iter().zip(custom.iter().copied()))
        .collect();
    terms.push((&scalars.s3, s3));
    terms.push((&scalars.z, z));

    let len = terms.iter().map(|(_, p)| p.coefs.len()).max().unwrap_or(0);
    let coefs: Vec<F> = cfg_into_iter!(0..len)
        .map(|j| {
            let mut c = F::zero();
            for (s, p) in terms.iter() {
                if let Some(coef) = p.coefs.get(j) {
                    c.add_assign(&s.mul(coef));
                }
            }
            c
        })
        .collect();
    Ok(FpPolynomial::from_coefs(coefs))
}
