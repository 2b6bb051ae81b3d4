use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{CsIndex, N_WIRES_PER_GATE},
    indexer::encode_perm_to_group,
};
use crate::poly_commit::pcs::ToBytes;
use ark_ff::batch_inversion;
use sha2::{Digest, Sha512};
use tessera_algebra::{prelude::*, traits::Domain};

/// The data structure for challenges in Plonk.
#[derive(Debug, Default, Clone)]
pub(crate) struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> PlonkChallenges<F> {
    /// Create a challenges with capacity 4.
    pub(crate) fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(4),
        }
    }

    /// Insert gamma and beta.
    pub(crate) fn insert_gamma_beta(&mut self, gamma: F, beta: F) -> Result<()> {
        if self.challenges.is_empty() {
            self.challenges.push(gamma);
            self.challenges.push(beta);
            Ok(())
        } else {
            Err(PlonkError::InvariantViolation(
                "gamma and beta inserted out of order",
            ))
        }
    }

    /// Insert alpha.
    pub(crate) fn insert_alpha(&mut self, alpha: F) -> Result<()> {
        if self.challenges.len() == 2 {
            self.challenges.push(alpha);
            Ok(())
        } else {
            Err(PlonkError::InvariantViolation(
                "alpha inserted out of order",
            ))
        }
    }

    /// Insert zeta.
    pub(crate) fn insert_zeta(&mut self, zeta: F) -> Result<()> {
        if self.challenges.len() == 3 {
            self.challenges.push(zeta);
            Ok(())
        } else {
            Err(PlonkError::InvariantViolation("zeta inserted out of order"))
        }
    }

    /// Return gamma and beta.
    pub(crate) fn get_gamma_beta(&self) -> Result<(&F, &F)> {
        if self.challenges.len() > 1 {
            Ok((&self.challenges[0], &self.challenges[1]))
        } else {
            Err(PlonkError::InvariantViolation("gamma and beta not derived"))
        }
    }

    /// Return alpha.
    pub(crate) fn get_alpha(&self) -> Result<&F> {
        self.challenges
            .get(2)
            .ok_or(PlonkError::InvariantViolation("alpha not derived"))
    }

    /// Return zeta.
    pub(crate) fn get_zeta(&self) -> Result<&F> {
        self.challenges
            .get(3)
            .ok_or(PlonkError::InvariantViolation("zeta not derived"))
    }
}

/// Invert every element of `elems` in place with a single field inversion.
/// Fails with `DivisionByZero` if any element is zero, leaving `elems` as is.
pub(crate) fn batch_inverse<F: Domain>(elems: &mut [F]) -> Result<()> {
    if elems.iter().any(|e| e.is_zero()) {
        return Err(PlonkError::DivisionByZero);
    }
    let mut fields: Vec<F::Field> = elems.iter().map(|e| e.get_field()).collect();
    batch_inversion(&mut fields);
    for (e, f) in elems.iter_mut().zip(fields) {
        *e = F::from_field(f);
    }
    Ok(())
}

/// Return `1, root, root^2, ..., root^{n-1}`.
pub(crate) fn domain_elements<F: Scalar>(root: &F, n: usize) -> Vec<F> {
    let mut elems = Vec::with_capacity(n);
    let mut current = F::one();
    for _ in 0..n {
        elems.push(current);
        current.mul_assign(root);
    }
    elems
}

/// Hash a custom gate commitment into the field.
pub(crate) fn commitment_hash<C: ToBytes, F: Scalar>(cm: &C) -> F {
    let mut hasher = Sha512::new();
    hasher.update(b"custom gate commitment");
    hasher.update(cm.to_bytes());
    F::from_hash(hasher)
}

/// Build the values of z on the domain, by
/// z(\omega^{i+1}) = z(\omega^i)\prod_j(w_j(\omega^i) + \beta * k_j * \omega^i + \gamma)
/// / \prod_j(w_j(\omega^i) + \beta * perm_j(\omega^i) + \gamma)
/// and setting z(1) = 1 for the base case.
pub(crate) fn z_evals<F: Domain>(
    wires: [&[F]; N_WIRES_PER_GATE],
    permutation: &[usize],
    group: &[F],
    k: &[F],
    gamma: &F,
    beta: &F,
) -> Result<Vec<F>> {
    let n = group.len();
    let perm = encode_perm_to_group(group, permutation, k);

    let mut numerators = Vec::with_capacity(n);
    let mut denominators = Vec::with_capacity(n);
    for i in 0..n - 1 {
        let mut numerator = F::one();
        let mut denominator = F::one();
        for (j, w) in wires.iter().enumerate() {
            let w_plus_gamma = w[i].add(gamma);
            numerator.mul_assign(&w_plus_gamma.add(&beta.mul(&k[j].mul(&group[i]))));
            denominator.mul_assign(&w_plus_gamma.add(&beta.mul(&perm[j * n + i])));
        }
        numerators.push(numerator);
        denominators.push(denominator);
    }
    batch_inverse(&mut denominators)?;

    let mut z = Vec::with_capacity(n);
    let mut prev = F::one();
    z.push(prev);
    for (numerator, denominator_inv) in numerators.iter().zip(denominators.iter()) {
        prev.mul_assign(&numerator.mul(denominator_inv));
        z.push(prev);
    }
    Ok(z)
}

/// Return Z_H(\zeta) = \zeta^n - 1 and L_1(\zeta) = (\zeta^n - 1) / (n * (\zeta - 1)).
pub(crate) fn first_lagrange_eval<F: Scalar>(zeta: &F, n: usize) -> Result<(F, F)> {
    let z_h_eval = zeta.pow(&[n as u64]).sub(&F::one());
    let denominator = F::from(n as u64).mul(&zeta.sub(&F::one()));
    let denominator_inv = denominator.inv().map_err(|_| PlonkError::DivisionByZero)?;
    Ok((z_h_eval, z_h_eval.mul(&denominator_inv)))
}

/// Compute \sum_i v_i * L_{j_i}(\zeta) for the pairs `(j_i, v_i)` of `values`,
/// where L_j(X) = \omega^j (X^n - 1) / (n (X - \omega^j)) is the j-th Lagrange base.
pub(crate) fn eval_lagrange_sum<F: Domain>(
    root: &F,
    n: usize,
    values: &[(CsIndex, F)],
    zeta: &F,
    z_h_eval: &F,
) -> Result<F> {
    if values.is_empty() {
        return Ok(F::zero());
    }
    let roots: Vec<F> = values
        .iter()
        .map(|(row, _)| root.pow(&[*row as u64]))
        .collect();
    let mut denominators: Vec<F> = roots.iter().map(|r| zeta.sub(r)).collect();
    batch_inverse(&mut denominators)?;

    let mut sum = F::zero();
    for (((_, value), r), d_inv) in values.iter().zip(roots.iter()).zip(denominators.iter()) {
        sum.add_assign(&value.mul(r).mul(d_inv));
    }
    let n_inv = F::from(n as u64)
        .inv()
        .map_err(|_| PlonkError::DivisionByZero)?;
    Ok(sum.mul(z_h_eval).mul(&n_inv))
}

/// Return the rows and values completing Qk: the public inputs on their rows,
/// and the hashed custom gate commitments on their commitment rows.
pub(crate) fn qk_completion<F: Scalar>(
    public_rows: &[CsIndex],
    public_inputs: &[F],
    commitment_rows: &[CsIndex],
    commitment_hashes: &[F],
) -> Vec<(CsIndex, F)> {
    public_rows
        .iter()
        .copied()
        .zip(public_inputs.iter().copied())
        .chain(
            commitment_rows
                .iter()
                .copied()
                .zip(commitment_hashes.iter().copied()),
        )
        .collect()
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        constraint_system::{ConstraintSystem, SparseCS},
        helpers::{
            batch_inverse, domain_elements, eval_lagrange_sum, first_lagrange_eval, z_evals,
        },
        indexer::permutation_shifts,
    };
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use tessera_algebra::{bls12_381::BLSScalar, prelude::*};

    type F = BLSScalar;

    #[test]
    fn test_batch_inverse() {
        let mut prng = test_rng();
        let elems: Vec<F> = (0..9).map(|_| F::random(&mut prng)).collect();
        let mut inverses = elems.clone();
        batch_inverse(&mut inverses).unwrap();
        for (e, inv) in elems.iter().zip(inverses.iter()) {
            assert_eq!(e.mul(inv), F::one());
        }

        let mut with_zero = vec![F::from(2u32), F::zero(), F::from(5u32)];
        assert_eq!(
            batch_inverse(&mut with_zero),
            Err(PlonkError::DivisionByZero)
        );
        assert_eq!(with_zero, vec![F::from(2u32), F::zero(), F::from(5u32)]);

        let mut empty: Vec<F> = vec![];
        batch_inverse(&mut empty).unwrap();
    }

    #[test]
    fn test_z_evals() {
        let mut cs = SparseCS::<F>::new();
        let a = cs.new_secret_input();
        let b = cs.new_secret_input();
        let c = cs.add(a, b);
        let d = cs.mul(c, a);
        let _ = cs.add(d, c);
        cs.pad();
        let witness = crate::plonk::constraint_system::Witness::new(
            vec![],
            vec![F::from(3u32), F::from(4u32)],
        );
        let hints = crate::plonk::constraint_system::HintRegistry::default();
        let solution = cs.solve(&witness, &hints).unwrap();

        let n = cs.size();
        let domain = FpPolynomial::<F>::evaluation_domain(n).unwrap();
        let root = FpPolynomial::<F>::domain_generator(&domain);
        let group = domain_elements(&root, n);
        let k = permutation_shifts::<F>();
        let perm = cs.compute_permutation();
        let mut prng = test_rng();
        let gamma = F::random(&mut prng);
        let beta = F::random(&mut prng);

        let z = z_evals(
            [
                solution.l.as_slice(),
                solution.r.as_slice(),
                solution.o.as_slice(),
            ],
            &perm,
            &group,
            &k,
            &gamma,
            &beta,
        )
        .unwrap();
        assert_eq!(z.len(), n);
        assert_eq!(z[0], F::one());

        // the grand product wraps around to one for a consistent wiring
        let last = n - 1;
        let sigma = crate::plonk::indexer::encode_perm_to_group(&group, &perm, &k);
        let mut numerator = F::one();
        let mut denominator = F::one();
        for (j, w) in [&solution.l, &solution.r, &solution.o].iter().enumerate() {
            numerator.mul_assign(&w[last].add(&gamma).add(&beta.mul(&k[j].mul(&group[last]))));
            denominator.mul_assign(&w[last].add(&gamma).add(&beta.mul(&sigma[j * n + last])));
        }
        assert_eq!(z[last].mul(&numerator), denominator);
    }

    #[test]
    fn test_lagrange_evals() {
        let n = 8;
        let domain = FpPolynomial::<F>::evaluation_domain(n).unwrap();
        let root = FpPolynomial::<F>::domain_generator(&domain);
        let mut prng = test_rng();
        let zeta = F::random(&mut prng);
        let (z_h_eval, l1) = first_lagrange_eval(&zeta, n).unwrap();
        assert_eq!(z_h_eval, zeta.pow(&[8]).sub(&F::one()));

        let mut values = vec![F::zero(); n];
        values[0] = F::one();
        let l1_poly = FpPolynomial::ifft_with_domain(&domain, &values).unwrap();
        assert_eq!(l1_poly.eval(&zeta), l1);

        let mut values = vec![F::zero(); n];
        values[2] = F::from(5u32);
        values[6] = F::from(7u32);
        let poly = FpPolynomial::ifft_with_domain(&domain, &values).unwrap();
        let sum = eval_lagrange_sum(
            &root,
            n,
            &[(2, F::from(5u32)), (6, F::from(7u32))],
            &zeta,
            &z_h_eval,
        )
        .unwrap();
        assert_eq!(poly.eval(&zeta), sum);
        assert_eq!(
            eval_lagrange_sum(&root, n, &[], &zeta, &z_h_eval).unwrap(),
            F::zero()
        );
    }
}
