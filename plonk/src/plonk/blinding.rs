//! Random polynomials hiding the witness polynomials of a proof.
//!
//! A polynomial `p` of degree less than `n` is blinded as
//! `p + (X^n - 1) * b`, which keeps its values on the order-n subgroup.
//! The wire polynomials are opened once (at \zeta), so a degree-1 blinding
//! suffices; the grand product is opened twice (at \zeta and \zeta\omega)
//! and gets a degree-2 blinding.
use crate::plonk::constraint_system::N_WIRES_PER_GATE;
use crate::poly_commit::field_polynomial::FpPolynomial;
use tessera_algebra::prelude::*;

/// The degree of the blinding polynomials of L, R and O.
pub const WIRE_BLINDING_DEGREE: usize = 1;

/// The degree of the blinding polynomial of Z.
pub const Z_BLINDING_DEGREE: usize = 2;

/// The blinding polynomials of one proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlindingPolynomials<F> {
    /// The blinding polynomials of L, R and O.
    pub wires: [FpPolynomial<F>; N_WIRES_PER_GATE],
    /// The blinding polynomial of Z.
    pub z: FpPolynomial<F>,
}

impl<F: Scalar> BlindingPolynomials<F> {
    /// Draw fresh blinding polynomials.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R) -> Self {
        let wires = [
            Self::draw(prng, WIRE_BLINDING_DEGREE),
            Self::draw(prng, WIRE_BLINDING_DEGREE),
            Self::draw(prng, WIRE_BLINDING_DEGREE),
        ];
        let z = Self::draw(prng, Z_BLINDING_DEGREE);
        Self { wires, z }
    }

    // `FpPolynomial::random` trims, which would drop a zero leading coefficient.
    fn draw<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        FpPolynomial {
            coefs: (0..=degree).map(|_| F::random(prng)).collect(),
        }
    }

    /// Return the blinding polynomial of the `i`-th wire.
    pub fn wire(&self, i: usize) -> &FpPolynomial<F> {
        &self.wires[i]
    }
}

/// Return `poly + (X^n - 1) * blind`.
pub fn blind<F: Scalar>(
    poly: &FpPolynomial<F>,
    blinding: &FpPolynomial<F>,
    n: usize,
) -> FpPolynomial<F> {
    let mut blinded = poly.clone();
    blinded.add_vanishing_multiple(blinding, n);
    blinded
}

/// Return the value at `x` of the blinded polynomial from the value `eval` of
/// the unblinded one, given `z_h_eval = x^n - 1`.
pub fn blinded_eval<F: Scalar>(eval: &F, blinding: &FpPolynomial<F>, x: &F, z_h_eval: &F) -> F {
    eval.add(&z_h_eval.mul(&blinding.eval(x)))
}
