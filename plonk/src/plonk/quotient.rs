use crate::errors::{PlonkError, Result};
use crate::plonk::{
    helpers::batch_inverse,
    numerator::{Basis, Layout, Numerator},
};
use crate::poly_commit::field_polynomial::FpPolynomial;
use ark_std::{end_timer, start_timer};
use tessera_algebra::{prelude::*, traits::Domain};

/// The number of chunks the quotient polynomial is split into.
pub const N_QUOTIENT_CHUNKS: usize = 3;

/// Divide the identity by `X^n - 1` and split the quotient H into
/// `h1 + X^{n+2} h2 + X^{2(n+2)} h3`, each chunk with n + 2 coefficients.
///
/// `shifts` are the coset shifts `g * root_m^k` the numerator was evaluated on.
pub fn divide_by_vanishing<F: Domain>(
    numerator: &Numerator<F>,
    shifts: &[F],
    coset_generator: &F,
) -> Result<[FpPolynomial<F>; N_QUOTIENT_CHUNKS]> {
    if numerator.basis != Basis::LagrangeCoset || numerator.layout != Layout::Regular {
        return Err(PlonkError::InvariantViolation(
            "the numerator must be evaluated on cosets in regular order",
        ));
    }
    let n = numerator.coset_size;
    let rho = shifts.len();
    if numerator.evals.len() != rho * n {
        return Err(PlonkError::InvariantViolation(
            "the numerator does not match the cosets",
        ));
    }

    let divide_timer = start_timer!(|| "Divide by the vanishing polynomial");
    // X^n - 1 is the constant shift_k^n - 1 on the k-th coset
    let mut z_h_inv: Vec<F> = shifts
        .iter()
        .map(|s| s.pow(&[n as u64]).sub(&F::one()))
        .collect();
    batch_inverse(&mut z_h_inv)?;

    // point i of coset k is g * root_m^(k + rho * i)
    let mut values = vec![F::zero(); rho * n];
    for (k, (block, inv)) in numerator.evals.chunks(n).zip(z_h_inv.iter()).enumerate() {
        for (i, v) in block.iter().enumerate() {
            values[k + rho * i] = v.mul(inv);
        }
    }

    let domain_m = FpPolynomial::<F>::evaluation_domain(rho * n)?;
    let g_inv = coset_generator.inv()?;
    let h = FpPolynomial::coset_ifft_with_domain(&domain_m, &values, &g_inv)?;
    end_timer!(divide_timer);

    let chunk_len = n + 2;
    let coefs = h.get_coefs_ref();
    if coefs.len() > N_QUOTIENT_CHUNKS * chunk_len {
        return Err(PlonkError::InvariantViolation(
            "the identity does not vanish on the domain",
        ));
    }
    let chunk = |i: usize| {
        let start = (i * chunk_len).min(coefs.len());
        let end = ((i + 1) * chunk_len).min(coefs.len());
        FpPolynomial::from_coefs(coefs[start..end].to_vec())
    };
    Ok([chunk(0), chunk(1), chunk(2)])
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        numerator::{coset_shifts, Basis, Layout, Numerator},
        quotient::divide_by_vanishing,
    };
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use tessera_algebra::{bls12_381::BLSScalar, prelude::*};

    type F = BLSScalar;

    fn numerator_of(poly: &FpPolynomial<F>, n: usize, shifts: &[F]) -> Numerator<F> {
        let domain = FpPolynomial::<F>::evaluation_domain(n).unwrap();
        let root = FpPolynomial::<F>::domain_generator(&domain);
        let mut evals = vec![];
        for shift in shifts.iter() {
            let mut x = *shift;
            for _ in 0..n {
                evals.push(poly.eval(&x));
                x.mul_assign(&root);
            }
        }
        Numerator {
            evals,
            basis: Basis::LagrangeCoset,
            layout: Layout::Regular,
            coset_size: n,
        }
    }

    fn setup(n: usize, rho: usize) -> (F, Vec<F>) {
        let g = F::multiplicative_generator();
        let domain_m = FpPolynomial::<F>::evaluation_domain(rho * n).unwrap();
        let root_m = FpPolynomial::<F>::domain_generator(&domain_m);
        (g, coset_shifts(&g, &root_m, rho))
    }

    #[test]
    fn test_divide_and_split() {
        let mut prng = test_rng();
        for (n, rho) in [(2, 8), (4, 8), (8, 4), (16, 4)] {
            let (g, shifts) = setup(n, rho);
            let h = FpPolynomial::<F>::random(&mut prng, 3 * n + 5);
            // h * (X^n - 1)
            let mut shifted = vec![F::zero(); n];
            shifted.extend_from_slice(&h.coefs);
            let numerator_poly = FpPolynomial::from_coefs(shifted).sub(&h);
            let numerator = numerator_of(&numerator_poly, n, &shifts);
            let chunks = divide_by_vanishing(&numerator, &shifts, &g).unwrap();

            let x = F::random(&mut prng);
            let x_chunk = x.pow(&[(n + 2) as u64]);
            let folded = chunks[0]
                .eval(&x)
                .add(&x_chunk.mul(&chunks[1].eval(&x)))
                .add(&x_chunk.square().mul(&chunks[2].eval(&x)));
            assert_eq!(folded, h.eval(&x));
            for c in chunks.iter() {
                assert!(c.coefs.len() <= n + 2);
            }
        }
    }

    #[test]
    fn test_non_vanishing_identity() {
        let (g, shifts) = setup(4, 8);
        let constant = FpPolynomial::from_coefs(vec![F::from(3u32)]);
        let numerator = numerator_of(&constant, 4, &shifts);
        assert_eq!(
            divide_by_vanishing(&numerator, &shifts, &g),
            Err(PlonkError::InvariantViolation(
                "the identity does not vanish on the domain"
            ))
        );
    }

    #[test]
    fn test_wrong_basis_or_layout() {
        let (g, shifts) = setup(4, 8);
        let mut numerator = numerator_of(&FpPolynomial::zero(), 4, &shifts);
        numerator.basis = Basis::Lagrange;
        assert!(matches!(
            divide_by_vanishing(&numerator, &shifts, &g),
            Err(PlonkError::InvariantViolation(_))
        ));

        let mut numerator = numerator_of(&FpPolynomial::zero(), 4, &shifts);
        numerator.layout = Layout::BitReversed;
        assert!(matches!(
            divide_by_vanishing(&numerator, &shifts, &g),
            Err(PlonkError::InvariantViolation(_))
        ));
    }
}
