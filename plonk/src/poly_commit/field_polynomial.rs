use crate::errors::{PlonkError, Result};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use tessera_algebra::{prelude::*, traits::Domain};

/// Field polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients (or evaluations) of the polynomial
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use tessera_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use tessera_algebra::bls12_381::BLSScalar;
    /// use tessera_algebra::{Zero, One};
    /// let poly = FpPolynomial::<BLSScalar>::zero();
    /// let zero = BLSScalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&zero), zero);
    /// assert_eq!(poly.eval(&BLSScalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Return the constant one polynomial
    pub fn one() -> Self {
        Self::from_coefs(vec![F::one()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficient are trimmed.
    /// # Example
    /// ```
    /// use tessera_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use tessera_algebra::bls12_381::BLSScalar;
    /// use tessera_algebra::{Zero, One, ops::*};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let two = one.add(&one);
    /// let five = two.add(&two).add(&one);
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&two), five);
    /// let poly2 = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero]);
    /// assert_eq!(poly, poly2);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Build a polynomial from its zeroes/roots.
    pub fn from_zeroes(zeroes: &[F]) -> Self {
        let mut r = Self::one();
        for root in zeroes.iter() {
            let mut p = r.clone();
            r.coefs.insert(0, F::zero()); // multiply by X
            p.mul_scalar_assign(root);
            r.sub_assign(&p);
        }
        r.trim_coefs();
        r
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        let coefs = (0..degree + 1).map(|_| F::random(prng)).collect();
        Self::from_coefs(coefs)
    }

    /// Remove high degree zero-coefficients
    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
    }

    /// Return degree of the polynomial
    pub fn degree(&self) -> usize {
        if self.coefs.is_empty() {
            0
        } else {
            self.coefs.len() - 1
        }
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefs.iter().all(|c| c.is_zero())
    }

    /// Evaluate a polynomial on a point with Horner's rule.
    pub fn eval(&self, point: &F) -> F {
        let mut result = F::zero();
        for coef in self.coefs.iter().rev() {
            result.mul_assign(point);
            result.add_assign(coef);
        }
        result
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtracts another polynomial from self.
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            self.coefs
                .extend(other.coefs[n..].iter().map(|other_coef| other_coef.neg()));
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Negate the coefficients.
    pub fn neg(&self) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(&F::one().neg());
        new
    }

    /// Add `coef` to the coefficient of order `order`.
    pub fn add_coef_assign(&mut self, coef: &F, order: usize) {
        if self.coefs.len() <= order {
            self.coefs.resize(order + 1, F::zero());
        }
        self.coefs[order].add_assign(coef);
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar)
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Multiply the polynomial variable by a scalar.
    /// mul_var(\sum a_i X^i, b) = \sum a_i b^i X^i
    /// # Example:
    /// ```
    /// use tessera_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use tessera_algebra::bls12_381::BLSScalar;
    /// use tessera_algebra::{Zero, One, ops::*};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let two = one.add(&one);
    /// let four = two.add(&two);
    /// let poly = FpPolynomial::from_coefs(vec![zero, one, one]);
    /// let expected = FpPolynomial::from_coefs(vec![zero, two, four]);
    /// assert_eq!(poly.mul_var(&two), expected);
    /// ```
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        let mut r = F::one();
        for coef in new.coefs.iter_mut() {
            coef.mul_assign(&r);
            r.mul_assign(scalar);
        }
        new.trim_coefs();
        new
    }

    /// Add `(X^n - 1) * blind` to self, which leaves the values on the
    /// order-n subgroup unchanged.
    pub fn add_vanishing_multiple(&mut self, blind: &Self, n: usize) {
        let len = self.coefs.len().max(blind.coefs.len() + n);
        self.coefs.resize(len, F::zero());
        for (i, b) in blind.coefs.iter().enumerate() {
            self.coefs[i].sub_assign(b);
            self.coefs[i + n].add_assign(b);
        }
        self.trim_coefs();
    }

    /// Divide polynomial to produce the quotient and remainder polynomials.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(PlonkError::DivisionByZero);
        }
        let k = self.coefs.len();
        let l = divisor.degree() + 1;
        if l > k {
            return Ok((Self::zero(), self.clone()));
        }
        let divisor_coefs = &divisor.coefs[..l];
        let bl_inv = divisor_coefs[l - 1].inv()?;
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let qi = bl_inv.mul(&rem[i + l - 1]);
            for (j, d) in divisor_coefs.iter().enumerate() {
                rem[i + j].sub_assign(&qi.mul(d));
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        if rem.is_empty() {
            rem.push(F::zero());
        }
        Ok((Self::from_coefs(quo), Self::from_coefs(rem)))
    }
}

impl<F: Domain> FpPolynomial<F> {
    /// Return the radix-2 evaluation domain of exactly `num_points` points.
    pub fn evaluation_domain(num_points: usize) -> Result<Radix2EvaluationDomain<F::Field>> {
        match Radix2EvaluationDomain::<F::Field>::new(num_points) {
            Some(domain) if domain.size() == num_points => Ok(domain),
            _ => Err(PlonkError::DomainNotFound(num_points)),
        }
    }

    /// Return the generator of the domain.
    pub fn domain_generator(domain: &Radix2EvaluationDomain<F::Field>) -> F {
        F::from_field(domain.group_gen)
    }

    /// Compute the FFT of the polynomial over `domain`.
    pub fn fft_with_domain(&self, domain: &Radix2EvaluationDomain<F::Field>) -> Result<Vec<F>> {
        if self.coefs.len() > domain.size() {
            return Err(PlonkError::DegreeError);
        }
        let coefs: Vec<F::Field> = self.coefs.iter().map(|c| c.get_field()).collect();
        Ok(domain.fft(&coefs).into_iter().map(F::from_field).collect())
    }

    /// Compute the FFT of the polynomial on the set k * domain.
    pub fn coset_fft_with_domain(
        &self,
        domain: &Radix2EvaluationDomain<F::Field>,
        k: &F,
    ) -> Result<Vec<F>> {
        self.mul_var(k).fft_with_domain(domain)
    }

    /// Interpolate the polynomial from its values over `domain`.
    pub fn ifft_with_domain(
        domain: &Radix2EvaluationDomain<F::Field>,
        values: &[F],
    ) -> Result<Self> {
        if values.len() > domain.size() {
            return Err(PlonkError::DegreeError);
        }
        let values: Vec<F::Field> = values.iter().map(|v| v.get_field()).collect();
        Ok(Self::from_coefs(
            domain.ifft(&values).into_iter().map(F::from_field).collect(),
        ))
    }

    /// Interpolate the polynomial from its values over k * domain, given `k_inv`.
    pub fn coset_ifft_with_domain(
        domain: &Radix2EvaluationDomain<F::Field>,
        values: &[F],
        k_inv: &F,
    ) -> Result<Self> {
        Ok(Self::ifft_with_domain(domain, values)?.mul_var(k_inv))
    }
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use ark_poly::EvaluationDomain;
    use rand_chacha::ChaChaRng;
    use tessera_algebra::{bls12_381::BLSScalar, prelude::*, traits::Domain};

    type F = BLSScalar;

    #[test]
    fn from_zeroes() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let zeroes: Vec<F> = (0..10).map(|_| F::random(&mut prng)).collect();
        let poly = FpPolynomial::from_zeroes(&zeroes[..]);
        assert_eq!(poly.degree(), 10);
        for root in zeroes.iter() {
            assert_eq!(F::zero(), poly.eval(root));
        }
    }

    #[test]
    fn test_add_sub_and_coefs() {
        let one = F::one();
        let two = one.add(&one);
        let three = two.add(&one);
        let mut poly1 = FpPolynomial::from_coefs(vec![three, three, two, one]);
        let poly2 = FpPolynomial::from_coefs(vec![three, two, one, one]);
        poly1.sub_assign(&poly2);
        assert_eq!(poly1, FpPolynomial::from_coefs(vec![F::zero(), one, one]));
        assert_eq!(poly1.add(&poly2).sub(&poly2), poly1);
        assert_eq!(poly1.add(&poly1.neg()), FpPolynomial::zero());

        poly1.add_coef_assign(&one, 5);
        assert_eq!(poly1.degree(), 5);
        poly1.add_coef_assign(&one.neg(), 5);
        assert_eq!(poly1.degree(), 2);
    }

    #[test]
    fn test_div_rem() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let a = FpPolynomial::<F>::random(&mut prng, 12);
        let b = FpPolynomial::<F>::random(&mut prng, 4);
        let (q, r) = a.div_rem(&b).unwrap();
        assert!(r.degree() < 4);
        let mut recomposed = FpPolynomial::zero();
        for (i, c) in q.coefs.iter().enumerate() {
            let mut shifted = vec![F::zero(); i];
            shifted.extend(b.mul_scalar(c).coefs);
            recomposed.add_assign(&FpPolynomial::from_coefs(shifted));
        }
        recomposed.add_assign(&r);
        assert_eq!(recomposed, a);

        assert_eq!(
            a.div_rem(&FpPolynomial::zero()),
            Err(PlonkError::DivisionByZero)
        );
    }

    #[test]
    fn test_vanishing_multiple() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let n = 8;
        let domain = FpPolynomial::<F>::evaluation_domain(n).unwrap();
        let p = FpPolynomial::<F>::random(&mut prng, n - 1);
        let blind = FpPolynomial::<F>::random(&mut prng, 2);
        let mut hidden = p.clone();
        hidden.add_vanishing_multiple(&blind, n);
        assert_eq!(hidden.degree(), n + 2);
        for x in domain.elements() {
            let x = F::from_field(x);
            assert_eq!(hidden.eval(&x), p.eval(&x));
        }
        let x = F::random(&mut prng);
        let zh = x.pow(&[n as u64]).sub(&F::one());
        assert_eq!(hidden.eval(&x), p.eval(&x).add(&zh.mul(&blind.eval(&x))));
    }

    #[test]
    fn test_fft_with_domain() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        for log_n in 0..6 {
            let n = 1usize << log_n;
            let domain = FpPolynomial::<F>::evaluation_domain(n).unwrap();
            let root = FpPolynomial::<F>::domain_generator(&domain);
            let polynomial = FpPolynomial::<F>::random(&mut prng, n - 1);
            let fft = polynomial.fft_with_domain(&domain).unwrap();
            let mut omega = F::one();
            for v in fft.iter() {
                assert_eq!(*v, polynomial.eval(&omega));
                omega.mul_assign(&root);
            }
            let ifft = FpPolynomial::ifft_with_domain(&domain, &fft).unwrap();
            assert_eq!(ifft, polynomial);
        }
    }

    #[test]
    fn test_coset_fft_with_domain() {
        let mut prng = ChaChaRng::from_seed([3u8; 32]);
        let n = 16;
        let domain = FpPolynomial::<F>::evaluation_domain(n).unwrap();
        let root = FpPolynomial::<F>::domain_generator(&domain);
        let k = F::multiplicative_generator();
        let polynomial = FpPolynomial::<F>::random(&mut prng, n - 1);
        let evals = polynomial.coset_fft_with_domain(&domain, &k).unwrap();
        let mut point = k;
        for v in evals.iter() {
            assert_eq!(*v, polynomial.eval(&point));
            point.mul_assign(&root);
        }
        let k_inv = k.inv().unwrap();
        let back = FpPolynomial::coset_ifft_with_domain(&domain, &evals, &k_inv).unwrap();
        assert_eq!(back, polynomial);
    }

    #[test]
    fn test_fft_rejects_oversized_input() {
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let domain = FpPolynomial::<F>::evaluation_domain(4).unwrap();
        let polynomial = FpPolynomial::<F>::random(&mut prng, 6);
        assert_eq!(
            polynomial.fft_with_domain(&domain),
            Err(PlonkError::DegreeError)
        );
        assert!(FpPolynomial::<F>::evaluation_domain(6).is_err());
    }
}
