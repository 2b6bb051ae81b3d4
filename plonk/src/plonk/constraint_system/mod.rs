use crate::errors::Result;
use tessera_algebra::prelude::*;

/// Module for the hint registry.
pub mod hints;

/// Module for the sparse constraint system builder.
pub mod sparse;

/// Module for the witness solver.
pub mod solver;

pub use hints::{HintId, HintRegistry};
pub use sparse::{CustomGate, SparseCS};

/// Variable index
pub type VarIndex = usize;
/// Constraint index
pub type CsIndex = usize;

/// The wires number of a gate: L, R and O.
pub const N_WIRES_PER_GATE: usize = 3;

/// The number of fixed selectors.
pub const N_SELECTORS: usize = 5;

/// Index of the left selector.
pub const Q_L: usize = 0;
/// Index of the right selector.
pub const Q_R: usize = 1;
/// Index of the multiplication selector.
pub const Q_M: usize = 2;
/// Index of the output selector.
pub const Q_O: usize = 3;
/// Index of the constant selector.
pub const Q_K: usize = 4;

/// The maximal number of custom gates (commitment gates) of a circuit.
pub const MAX_CUSTOM_GATES: usize = 16;

/// The values of the input variables, public inputs first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness<F> {
    /// The public inputs, in the order they were declared.
    pub public: Vec<F>,
    /// The secret inputs, in the order they were declared.
    pub secret: Vec<F>,
}

impl<F: Scalar> Witness<F> {
    /// Create a witness.
    pub fn new(public: Vec<F>, secret: Vec<F>) -> Self {
        Self { public, secret }
    }
}

/// The values of the L, R and O wires on every row, produced by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<F> {
    /// Left wire values.
    pub l: Vec<F>,
    /// Right wire values.
    pub r: Vec<F>,
    /// Output wire values.
    pub o: Vec<F>,
    /// The value of every variable.
    pub values: Vec<F>,
}

impl<F> Solution<F> {
    /// Return the values of the `i`-th wire.
    pub fn wire(&self, i: usize) -> &[F] {
        match i {
            0 => &self.l,
            1 => &self.r,
            _ => &self.o,
        }
    }
}

/// Trait for PLONK constraint systems.
pub trait ConstraintSystem: Sized + Sync {
    /// The field of the circuit.
    type Field: Scalar;

    /// Return the number of constraints in the system.
    fn size(&self) -> usize;

    /// Return number of variables in the constrain system
    fn num_vars(&self) -> usize;

    /// Return the wiring of the constrain system
    fn wiring(&self) -> &[Vec<VarIndex>];

    /// Return the size of the evaluation domain for computing the quotient polynomial.
    /// It is a multiple of `size` larger than the degree of the quotient polynomial,
    /// which is at most 3 * `size` + 5.
    fn quot_eval_dom_size(&self) -> usize {
        if self.size() > 5 {
            self.size() * 4
        } else {
            self.size() * 8
        }
    }

    /// Return true if the number of constraints is a power of two (at least two).
    fn is_padded(&self) -> bool {
        self.size() >= 2 && self.size().is_power_of_two()
    }

    /// Compute the permutation implied by the copy constraints.
    /// The wire slot of wire `w` on row `j` is `w * size + j`.
    fn compute_permutation(&self) -> Vec<usize> {
        let mut v = Vec::with_capacity(N_WIRES_PER_GATE * self.size());
        for wire_slice in self.wiring().iter() {
            v.extend_from_slice(wire_slice);
        }
        let mut perm: Vec<usize> = (0..v.len()).collect();
        let mut first = vec![usize::MAX; self.num_vars()];
        let mut last = vec![usize::MAX; self.num_vars()];
        // one cycle per variable, visiting its slots in order
        for (i, var) in v.iter().enumerate() {
            if last[*var] == usize::MAX {
                first[*var] = i;
            } else {
                perm[last[*var]] = i;
            }
            last[*var] = i;
        }
        for (f, l) in first.iter().zip(last.iter()) {
            if *l != usize::MAX {
                perm[*l] = *f;
            }
        }
        perm
    }

    /// Borrow the (index)-th fixed selector vector.
    fn selector(&self, index: usize) -> Result<&[Self::Field]>;

    /// Borrow the selector vector of the (index)-th custom gate.
    fn custom_selector(&self, index: usize) -> Result<&[Self::Field]>;

    /// Return the custom gates.
    fn custom_gates(&self) -> &[CustomGate];

    /// Return the rows holding the public inputs, in declaration order.
    fn public_rows(&self) -> &[CsIndex];

    /// Return the number of public inputs.
    fn num_public_inputs(&self) -> usize {
        self.public_rows().len()
    }

    /// Compute the value of every wire from the input values.
    fn solve(
        &self,
        witness: &Witness<Self::Field>,
        hints: &HintRegistry<'_, Self::Field>,
    ) -> Result<Solution<Self::Field>>;
}
