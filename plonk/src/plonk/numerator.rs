//! Evaluation of the PLONK identity on the cosets of the quotient domain.
//!
//! The identity
//! `alpha^2 * L1 * (Z - 1) + alpha * [Z(wX) prod(w_j + beta * S_j + gamma)
//!  - Z prod(w_j + beta * k_j * X + gamma)] + gate(X)`
//! vanishes on the domain of size n. It is evaluated on `rho` cosets
//! `shift_k * H` with `shift_k = g * w1^k`, whose union is `g * H1`,
//! the coset of the domain H1 of size `rho * n`.
use crate::errors::{PlonkError, Result};
use crate::plonk::{
    blinding::BlindingPolynomials,
    constraint_system::{N_SELECTORS, N_WIRES_PER_GATE, Q_K, Q_L, Q_M, Q_O, Q_R},
    helpers::{batch_inverse, domain_elements},
};
use crate::poly_commit::field_polynomial::FpPolynomial;
use ark_std::{cfg_into_iter, end_timer, start_timer};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tessera_algebra::{prelude::*, traits::Domain};

/// The basis a vector of values is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Values on the domain.
    Lagrange,
    /// Values on cosets of the domain.
    LagrangeCoset,
}

/// The order of the values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Natural order.
    Regular,
    /// Bit-reversed order.
    BitReversed,
}

/// The values of the identity on the cosets; point `i` of coset `k`
/// is stored at index `k * n + i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Numerator<F> {
    /// The values.
    pub evals: Vec<F>,
    /// The basis of `evals`.
    pub basis: Basis,
    /// The layout of `evals`.
    pub layout: Layout,
    /// The size of each coset.
    pub coset_size: usize,
}

/// The polynomials and challenges of the identity.
/// Every polynomial is in canonical form with at most n coefficients.
pub struct NumeratorInputs<'a, F> {
    /// The unblinded L, R and O.
    pub wires: [&'a FpPolynomial<F>; N_WIRES_PER_GATE],
    /// The unblinded grand product.
    pub z: &'a FpPolynomial<F>,
    /// The blinding polynomials of the wires and of Z.
    pub blinding: &'a BlindingPolynomials<F>,
    /// Ql, Qr, Qm, Qo and the completed Qk.
    pub selectors: [&'a FpPolynomial<F>; N_SELECTORS],
    /// The custom gate selectors.
    pub qcp: &'a [FpPolynomial<F>],
    /// The custom gate polynomials.
    pub custom: Vec<&'a FpPolynomial<F>>,
    /// The permutation polynomials.
    pub perms: &'a [FpPolynomial<F>],
    /// The shifts of the identity permutation.
    pub k: &'a [F],
    /// The challenge \gamma.
    pub gamma: F,
    /// The challenge \beta.
    pub beta: F,
    /// The challenge \alpha.
    pub alpha: F,
}

/// Return the coset shifts `g * root_m^k` for `k < rho`.
pub fn coset_shifts<F: Scalar>(coset_generator: &F, root_m: &F, rho: usize) -> Vec<F> {
    domain_elements(root_m, rho)
        .into_iter()
        .map(|r| coset_generator.mul(&r))
        .collect()
}

/// Evaluate the identity on the `shifts.len()` cosets of the domain of size n.
pub fn evaluate_numerator<F: Domain>(
    inputs: &NumeratorInputs<'_, F>,
    n: usize,
    shifts: &[F],
) -> Result<Numerator<F>> {
    if inputs.qcp.len() != inputs.custom.len() || inputs.perms.len() != N_WIRES_PER_GATE {
        return Err(PlonkError::InvariantViolation("malformed identity inputs"));
    }
    let domain = FpPolynomial::<F>::evaluation_domain(n)?;
    let root = FpPolynomial::<F>::domain_generator(&domain);
    let group = domain_elements(&root, n);

    let mut evals = Vec::with_capacity(shifts.len() * n);
    for shift in shifts.iter() {
        let coset_timer = start_timer!(|| "Evaluate the identity on a coset");
        evals.extend(evaluate_on_coset(inputs, &domain, &group, shift)?);
        end_timer!(coset_timer);
    }

    Ok(Numerator {
        evals,
        basis: Basis::LagrangeCoset,
        layout: Layout::Regular,
        coset_size: n,
    })
}

fn evaluate_on_coset<F: Domain>(
    inputs: &NumeratorInputs<'_, F>,
    domain: &ark_poly::Radix2EvaluationDomain<F::Field>,
    group: &[F],
    shift: &F,
) -> Result<Vec<F>> {
    let n = group.len();
    let one = F::one();
    // `coset_fft_with_domain` scales a copy of the coefficients
    let on_coset = |p: &FpPolynomial<F>| p.coset_fft_with_domain(domain, shift);
    let points: Vec<F> = group.iter().map(|w| shift.mul(w)).collect();
    let z_h = shift.pow(&[n as u64]).sub(&one);

    // (X^n - 1) * B(X) is the constant z_h times B on the coset
    let blinded = |p: &FpPolynomial<F>, b: &FpPolynomial<F>| -> Result<Vec<F>> {
        let mut values = on_coset(p)?;
        for (v, x) in values.iter_mut().zip(points.iter()) {
            v.add_assign(&z_h.mul(&b.eval(x)));
        }
        Ok(values)
    };

    let mut wires = Vec::with_capacity(N_WIRES_PER_GATE);
    for (w, b) in inputs.wires.iter().zip(inputs.blinding.wires.iter()) {
        wires.push(blinded(w, b)?);
    }
    let z = blinded(inputs.z, &inputs.blinding.z)?;
    let selectors = inputs
        .selectors
        .iter()
        .map(|q| on_coset(q))
        .collect::<Result<Vec<_>>>()?;
    let qcp = inputs
        .qcp
        .iter()
        .map(|q| on_coset(q))
        .collect::<Result<Vec<_>>>()?;
    let custom = inputs
        .custom
        .iter()
        .map(|p| on_coset(p))
        .collect::<Result<Vec<_>>>()?;
    let perms = inputs
        .perms
        .iter()
        .map(|s| on_coset(s))
        .collect::<Result<Vec<_>>>()?;

    // L1(x) = (x^n - 1) / (n * (x - 1))
    let n_field = F::from(n as u64);
    let mut l1 = points
        .iter()
        .map(|x| n_field.mul(&x.sub(&one)))
        .collect::<Vec<F>>();
    batch_inverse(&mut l1)?;
    for v in l1.iter_mut() {
        v.mul_assign(&z_h);
    }

    let (gamma, beta, alpha) = (inputs.gamma, inputs.beta, inputs.alpha);
    let alpha_sq = alpha.square();
    let k = inputs.k;

    let values: Vec<F> = cfg_into_iter!(0..n)
        .map(|i| {
            let (l, r, o) = (wires[0][i], wires[1][i], wires[2][i]);

            let mut gate = selectors[Q_L][i].mul(&l);
            gate.add_assign(&selectors[Q_R][i].mul(&r));
            gate.add_assign(&selectors[Q_M][i].mul(&l).mul(&r));
            gate.add_assign(&selectors[Q_O][i].mul(&o));
            gate.add_assign(&selectors[Q_K][i]);
            for (q, p) in qcp.iter().zip(custom.iter()) {
                gate.add_assign(&q[i].mul(&p[i]));
            }

            // Z(wx) sits at the next point of the coset
            let mut perm_term = z[(i + 1) % n];
            let mut id_term = z[i];
            for (j, w) in wires.iter().enumerate() {
                let w_plus_gamma = w[i].add(&gamma);
                perm_term.mul_assign(&w_plus_gamma.add(&beta.mul(&perms[j][i])));
                id_term.mul_assign(&w_plus_gamma.add(&beta.mul(&k[j]).mul(&points[i])));
            }

            let boundary = l1[i].mul(&z[i].sub(&one));

            gate.add(&alpha.mul(&perm_term.sub(&id_term)))
                .add(&alpha_sq.mul(&boundary))
        })
        .collect();
    Ok(values)
}
