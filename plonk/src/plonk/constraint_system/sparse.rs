//! A sparse gate constraint system: one gate per row
//! `ql*L + qr*R + qm*L*R + qo*O + qk + sum_i qcp_i*Pi_i = 0`,
//! where `Pi_i` is the committed polynomial of the i-th custom gate.
use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{
    hints::{custom_gate_hint_id, HintId, HintRegistry, INVERSE_HINT},
    ConstraintSystem, CsIndex, Solution, VarIndex, Witness, MAX_CUSTOM_GATES, N_SELECTORS,
    N_WIRES_PER_GATE, Q_K, Q_L, Q_M, Q_O, Q_R,
};
use std::collections::BTreeMap;
use tessera_algebra::prelude::*;

/// A call to a hint inside the circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// The hint function.
    pub id: HintId,
    /// The input variables.
    pub inputs: Vec<VarIndex>,
    /// The output variables, computed by the hint.
    pub outputs: Vec<VarIndex>,
}

/// The layout of a custom gate committing to a list of variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The committed variables.
    pub committed_vars: Vec<VarIndex>,
    /// The row of each committed variable, where `L - Pi = 0`.
    pub committed_rows: Vec<CsIndex>,
    /// The variable holding the hash of the commitment.
    pub commitment_var: VarIndex,
    /// The row binding `commitment_var` to the hashed commitment.
    pub commitment_row: CsIndex,
    /// The row where `Pi` takes a random value.
    pub slack_row: CsIndex,
}

/// Sparse PLONK constraint system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SparseCS<F> {
    /// the fixed selectors of the circuit, indexed by `Q_L`, ..., `Q_K`.
    pub selectors: Vec<Vec<F>>,
    /// the selector of each custom gate.
    pub custom_selectors: Vec<Vec<F>>,
    /// the wiring of the circuit.
    pub wiring: [Vec<VarIndex>; N_WIRES_PER_GATE],
    /// the number of variables.
    pub num_vars: usize,
    /// the size of circuit.
    pub size: usize,
    /// the public input variables.
    pub public_vars: Vec<VarIndex>,
    /// the row of each public input.
    pub public_rows: Vec<CsIndex>,
    /// the secret input variables.
    pub secret_vars: Vec<VarIndex>,
    /// the custom gates.
    pub custom_gates: Vec<CustomGate>,
    /// the hint calls.
    pub hints: Vec<Hint>,
    /// the hint call computing each hint output variable.
    pub hint_of_var: BTreeMap<VarIndex, usize>,
}

impl<F: Scalar> ConstraintSystem for SparseCS<F> {
    type Field = F;

    fn size(&self) -> usize {
        self.size
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn wiring(&self) -> &[Vec<VarIndex>] {
        &self.wiring[..]
    }

    fn selector(&self, index: usize) -> Result<&[F]> {
        self.selectors
            .get(index)
            .map(|s| s.as_slice())
            .ok_or(PlonkError::FuncParamsError)
    }

    fn custom_selector(&self, index: usize) -> Result<&[F]> {
        self.custom_selectors
            .get(index)
            .map(|s| s.as_slice())
            .ok_or(PlonkError::FuncParamsError)
    }

    fn custom_gates(&self) -> &[CustomGate] {
        &self.custom_gates
    }

    fn public_rows(&self) -> &[CsIndex] {
        &self.public_rows
    }

    fn solve(&self, witness: &Witness<F>, hints: &HintRegistry<'_, F>) -> Result<Solution<F>> {
        SparseCS::solve(self, witness, hints)
    }
}

impl<F: Scalar> Default for SparseCS<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Scalar> SparseCS<F> {
    /// Create an empty constraint system.
    pub fn new() -> SparseCS<F> {
        SparseCS {
            selectors: vec![vec![]; N_SELECTORS],
            custom_selectors: vec![],
            wiring: [vec![], vec![], vec![]],
            num_vars: 0,
            size: 0,
            public_vars: vec![],
            public_rows: vec![],
            secret_vars: vec![],
            custom_gates: vec![],
            hints: vec![],
            hint_of_var: BTreeMap::new(),
        }
    }

    fn new_var(&mut self) -> VarIndex {
        self.num_vars += 1;
        self.num_vars - 1
    }

    fn check_var(&self, var: VarIndex) {
        assert!(var < self.num_vars, "variable index out of bound");
    }

    /// Push a row with the given wiring and fixed selectors; custom selectors are zero.
    fn push_row(&mut self, wires: [VarIndex; N_WIRES_PER_GATE], q: [F; N_SELECTORS]) -> CsIndex {
        for w in wires.iter() {
            self.check_var(*w);
        }
        for (wiring, w) in self.wiring.iter_mut().zip(wires.iter()) {
            wiring.push(*w);
        }
        for (selector, q) in self.selectors.iter_mut().zip(q.iter()) {
            selector.push(*q);
        }
        for selector in self.custom_selectors.iter_mut() {
            selector.push(F::zero());
        }
        self.size += 1;
        self.size - 1
    }

    /// Declare a public input. Its row is `-L + PI = 0`, where the
    /// prover and verifier place the value in the public input polynomial.
    pub fn new_public_input(&mut self) -> VarIndex {
        let var = self.new_var();
        let zero = F::zero();
        let row = self.push_row([var, var, var], [F::one().neg(), zero, zero, zero, zero]);
        self.public_vars.push(var);
        self.public_rows.push(row);
        var
    }

    /// Declare a secret input.
    pub fn new_secret_input(&mut self) -> VarIndex {
        let var = self.new_var();
        self.secret_vars.push(var);
        var
    }

    /// Add the gate `ql*l + qr*r + qm*l*r + qo*o + qk = 0`.
    #[allow(clippy::too_many_arguments)]
    pub fn assert_gate(
        &mut self,
        l: VarIndex,
        r: VarIndex,
        o: VarIndex,
        ql: F,
        qr: F,
        qm: F,
        qo: F,
        qk: F,
    ) -> CsIndex {
        self.push_row([l, r, o], [ql, qr, qm, qo, qk])
    }

    /// Create an output variable equal to `ql * left + qr * right`.
    pub fn linear_combination(
        &mut self,
        left: VarIndex,
        right: VarIndex,
        ql: F,
        qr: F,
    ) -> VarIndex {
        let out = self.new_var();
        let zero = F::zero();
        self.assert_gate(left, right, out, ql, qr, zero, F::one().neg(), zero);
        out
    }

    /// Create an output variable and insert an addition gate.
    pub fn add(&mut self, left: VarIndex, right: VarIndex) -> VarIndex {
        self.linear_combination(left, right, F::one(), F::one())
    }

    /// Create an output variable and insert a subtraction gate.
    pub fn sub(&mut self, left: VarIndex, right: VarIndex) -> VarIndex {
        self.linear_combination(left, right, F::one(), F::one().neg())
    }

    /// Create an output variable equal to `var + constant`.
    pub fn add_constant(&mut self, var: VarIndex, constant: F) -> VarIndex {
        let out = self.new_var();
        let (zero, one) = (F::zero(), F::one());
        self.assert_gate(var, var, out, one, zero, zero, one.neg(), constant);
        out
    }

    /// Create an output variable and insert a multiplication gate.
    pub fn mul(&mut self, left: VarIndex, right: VarIndex) -> VarIndex {
        let out = self.new_var();
        let zero = F::zero();
        self.assert_gate(left, right, out, zero, zero, F::one(), F::one().neg(), zero);
        out
    }

    /// Create an output variable equal to `var * var`.
    pub fn square(&mut self, var: VarIndex) -> VarIndex {
        self.mul(var, var)
    }

    /// Add a constraint that `left` and `right` have the same value.
    pub fn assert_equal(&mut self, left: VarIndex, right: VarIndex) {
        let (zero, one) = (F::zero(), F::one());
        self.assert_gate(left, right, left, one, one.neg(), zero, zero, zero);
    }

    /// Add a constraint that `var` equals `constant`.
    pub fn assert_constant(&mut self, var: VarIndex, constant: F) {
        let zero = F::zero();
        self.assert_gate(var, var, var, F::one(), zero, zero, zero, constant.neg());
    }

    /// Create a variable holding the inverse of `var`, computed by a hint and
    /// constrained by `var * inv = 1`.
    pub fn inverse(&mut self, var: VarIndex) -> VarIndex {
        self.check_var(var);
        let inv = self.new_hint(INVERSE_HINT, vec![var], 1)[0];
        let zero = F::zero();
        self.assert_gate(var, inv, var, zero, zero, F::one(), zero, F::one().neg());
        inv
    }

    /// Create `num_outputs` variables computed by the hint `id` from `inputs`.
    pub fn new_hint(
        &mut self,
        id: HintId,
        inputs: Vec<VarIndex>,
        num_outputs: usize,
    ) -> Vec<VarIndex> {
        let outputs: Vec<VarIndex> = (0..num_outputs).map(|_| self.new_var()).collect();
        for output in outputs.iter() {
            self.hint_of_var.insert(*output, self.hints.len());
        }
        self.hints.push(Hint {
            id,
            inputs,
            outputs: outputs.clone(),
        });
        outputs
    }

    /// Commit to `vars` with a new custom gate and return the variable
    /// holding the hash of the commitment.
    pub fn commit(&mut self, vars: &[VarIndex]) -> Result<VarIndex> {
        let index = self.custom_gates.len();
        if index >= MAX_CUSTOM_GATES {
            return Err(PlonkError::NotSupported("too many custom gates"));
        }
        for var in vars.iter() {
            self.check_var(*var);
        }
        self.custom_selectors.push(vec![F::zero(); self.size]);

        let zero = F::zero();
        let mut committed_rows = Vec::with_capacity(vars.len());
        for var in vars.iter() {
            let row = self.push_row([*var, *var, *var], [F::one(), zero, zero, zero, zero]);
            self.custom_selectors[index][row] = F::one().neg();
            committed_rows.push(row);
        }

        let commitment_var = self.new_hint(custom_gate_hint_id(index), vars.to_vec(), 1)[0];
        let commitment_row = self.push_row(
            [commitment_var, commitment_var, commitment_var],
            [F::one().neg(), zero, zero, zero, zero],
        );
        let slack_row = self.push_row(
            [commitment_var, commitment_var, commitment_var],
            [zero, zero, zero, zero, zero],
        );

        self.custom_gates.push(CustomGate {
            committed_vars: vars.to_vec(),
            committed_rows,
            commitment_var,
            commitment_row,
            slack_row,
        });
        Ok(commitment_var)
    }

    /// Pad the number of constraints to a power of two, and at least two,
    /// with rows whose selectors are all zero.
    pub fn pad(&mut self) {
        self.pad_to(2)
    }

    /// Pad the number of constraints to the smallest power of two that is
    /// at least `min_size` and the current size.
    pub fn pad_to(&mut self, min_size: usize) {
        if self.num_vars == 0 {
            self.new_var();
        }
        let n = self.size.max(min_size).max(2).next_power_of_two();
        let zero = F::zero();
        while self.size < n {
            self.push_row([0, 0, 0], [zero; N_SELECTORS]);
        }
    }

    /// Return the rows whose constant selector is completed by the prover:
    /// the public input rows and the commitment rows.
    pub fn qk_completed_rows(&self) -> Vec<CsIndex> {
        let mut rows = self.public_rows.clone();
        rows.extend(self.custom_gates.iter().map(|g| g.commitment_row));
        rows
    }

    /// Evaluate the fixed-selector part of the gate of `row` on the given wire values.
    pub fn eval_gate(&self, row: CsIndex, l: &F, r: &F, o: &F) -> F {
        let mut res = self.selectors[Q_L][row].mul(l);
        res.add_assign(&self.selectors[Q_R][row].mul(r));
        res.add_assign(&self.selectors[Q_M][row].mul(l).mul(r));
        res.add_assign(&self.selectors[Q_O][row].mul(o));
        res.add_assign(&self.selectors[Q_K][row]);
        res
    }

    /// Return true if every selector of `row` is zero.
    pub fn is_trivial_row(&self, row: CsIndex) -> bool {
        self.selectors.iter().all(|s| s[row].is_zero())
            && self.custom_selectors.iter().all(|s| s[row].is_zero())
    }

    /// Check that `witness` satisfies the circuit.
    pub fn verify_witness(&self, witness: &Witness<F>, hints: &HintRegistry<'_, F>) -> Result<()> {
        self.solve(witness, hints).map(|_| ())
    }
}
