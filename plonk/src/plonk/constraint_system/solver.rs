use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{
    hints::HintRegistry, sparse::SparseCS, CsIndex, Solution, VarIndex, Witness,
    N_WIRES_PER_GATE, Q_K, Q_L, Q_M, Q_O, Q_R,
};
use tessera_algebra::prelude::*;

impl<F: Scalar> SparseCS<F> {
    /// Compute the value of every variable from the input values.
    ///
    /// Rows are visited in order. Hint outputs are computed when a row first
    /// needs them, and a row with exactly one unknown variable is solved for
    /// it. Rows whose constant selector is completed by the prover and the
    /// committed rows of custom gates are not checked here.
    pub fn solve(&self, witness: &Witness<F>, hints: &HintRegistry<'_, F>) -> Result<Solution<F>> {
        if witness.public.len() != self.public_vars.len()
            || witness.secret.len() != self.secret_vars.len()
        {
            return Err(PlonkError::InvalidWitness);
        }

        let mut values: Vec<Option<F>> = vec![None; self.num_vars];
        for (var, value) in self
            .public_vars
            .iter()
            .zip(witness.public.iter())
            .chain(self.secret_vars.iter().zip(witness.secret.iter()))
        {
            values[*var] = Some(*value);
        }

        let mut unchecked = vec![false; self.size];
        for row in self.qk_completed_rows() {
            unchecked[row] = true;
        }
        for gate in self.custom_gates.iter() {
            for row in gate.committed_rows.iter() {
                unchecked[*row] = true;
            }
        }

        for row in 0..self.size {
            if self.is_trivial_row(row) {
                continue;
            }
            let wires: Vec<VarIndex> = (0..N_WIRES_PER_GATE).map(|w| self.wiring[w][row]).collect();
            for var in wires.iter() {
                if values[*var].is_none() {
                    if let Some(hint) = self.hint_of_var.get(var) {
                        self.run_hint(*hint, &mut values, hints, row)?;
                    }
                }
            }

            let mut unknowns: Vec<VarIndex> = wires
                .iter()
                .filter(|var| values[**var].is_none())
                .copied()
                .collect();
            unknowns.sort_unstable();
            unknowns.dedup();

            if unchecked[row] {
                if !unknowns.is_empty() {
                    return Err(self.unsatisfied(row));
                }
                continue;
            }

            match unknowns.len() {
                0 => {
                    let [l, r, o] = self.row_values(row, &values)?;
                    if !self.eval_gate(row, &l, &r, &o).is_zero() {
                        return Err(self.unsatisfied(row));
                    }
                }
                1 => {
                    let value = self.solve_row(row, unknowns[0], &values)?;
                    values[unknowns[0]] = Some(value);
                }
                _ => return Err(self.unsatisfied(row)),
            }
        }

        let values: Vec<F> = values
            .into_iter()
            .map(|v| v.unwrap_or_else(F::zero))
            .collect();
        let wire = |w: usize| -> Vec<F> { self.wiring[w].iter().map(|var| values[*var]).collect() };
        Ok(Solution {
            l: wire(0),
            r: wire(1),
            o: wire(2),
            values,
        })
    }

    fn unsatisfied(&self, row: CsIndex) -> PlonkError {
        #[cfg(feature = "debug")]
        {
            println!("cs constraint not satisfied at row {}.", row);
        }
        PlonkError::UnsatisfiedConstraint(row)
    }

    fn run_hint(
        &self,
        index: usize,
        values: &mut [Option<F>],
        hints: &HintRegistry<'_, F>,
        row: CsIndex,
    ) -> Result<()> {
        let hint = &self.hints[index];
        let inputs = hint
            .inputs
            .iter()
            .map(|var| values[*var])
            .collect::<Option<Vec<F>>>()
            .ok_or(PlonkError::UnsatisfiedConstraint(row))?;
        let outputs = hints.run(hint.id, &inputs, hint.outputs.len())?;
        for (var, value) in hint.outputs.iter().zip(outputs) {
            values[*var] = Some(value);
        }
        Ok(())
    }

    fn row_values(&self, row: CsIndex, values: &[Option<F>]) -> Result<[F; N_WIRES_PER_GATE]> {
        let get =
            |w: usize| values[self.wiring[w][row]].ok_or(PlonkError::UnsatisfiedConstraint(row));
        Ok([get(0)?, get(1)?, get(2)?])
    }

    /// Solve the gate of `row` for the single unknown variable `unknown`.
    /// Each wire is written as `c + d * unknown`.
    fn solve_row(&self, row: CsIndex, unknown: VarIndex, values: &[Option<F>]) -> Result<F> {
        let split = |w: usize| -> (F, F) {
            let var = self.wiring[w][row];
            if var == unknown {
                (F::zero(), F::one())
            } else {
                (values[var].unwrap_or_else(F::zero), F::zero())
            }
        };
        let (l0, l1) = split(0);
        let (r0, r1) = split(1);
        let (o0, o1) = split(2);

        let ql = self.selectors[Q_L][row];
        let qr = self.selectors[Q_R][row];
        let qm = self.selectors[Q_M][row];
        let qo = self.selectors[Q_O][row];
        let qk = self.selectors[Q_K][row];

        if !qm.mul(&l1).mul(&r1).is_zero() {
            return Err(self.unsatisfied(row));
        }

        let mut constant = ql.mul(&l0);
        constant.add_assign(&qr.mul(&r0));
        constant.add_assign(&qm.mul(&l0).mul(&r0));
        constant.add_assign(&qo.mul(&o0));
        constant.add_assign(&qk);

        let mut linear = ql.mul(&l1);
        linear.add_assign(&qr.mul(&r1));
        linear.add_assign(&qm.mul(&l0.mul(&r1).add(&l1.mul(&r0))));
        linear.add_assign(&qo.mul(&o1));

        let linear_inv = linear.inv().map_err(|_| self.unsatisfied(row))?;
        Ok(constant.neg().mul(&linear_inv))
    }
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::constraint_system::{
        hints::{custom_gate_hint_id, HintRegistry},
        SparseCS, Witness, Q_O,
    };
    use std::sync::Arc;
    use tessera_algebra::{bls12_381::BLSScalar, prelude::*};

    type F = BLSScalar;

    fn equality_cs() -> SparseCS<F> {
        let mut cs = SparseCS::new();
        let x = cs.new_public_input();
        let y = cs.new_public_input();
        cs.assert_equal(x, y);
        cs.pad();
        cs
    }

    #[test]
    fn test_equality_circuit() {
        let cs = equality_cs();
        assert_eq!(cs.size, 4);
        let hints = HintRegistry::default();

        let five = F::from(5u32);
        let solution = cs
            .solve(&Witness::new(vec![five, five], vec![]), &hints)
            .unwrap();
        assert_eq!(solution.l[2], five);
        assert_eq!(solution.r[2], five);

        let six = F::from(6u32);
        assert_eq!(
            cs.solve(&Witness::new(vec![five, six], vec![]), &hints),
            Err(PlonkError::UnsatisfiedConstraint(2))
        );
    }

    #[test]
    fn test_invalid_witness() {
        let cs = equality_cs();
        let hints = HintRegistry::default();
        assert_eq!(
            cs.solve(&Witness::new(vec![F::one()], vec![]), &hints),
            Err(PlonkError::InvalidWitness)
        );
        let extra = Witness::new(vec![F::one(), F::one()], vec![F::one()]);
        assert_eq!(cs.solve(&extra, &hints), Err(PlonkError::InvalidWitness));
    }

    #[test]
    fn test_squaring_chain() {
        let mut cs = SparseCS::<F>::new();
        let y = cs.new_public_input();
        let x = cs.new_secret_input();
        let mut acc = x;
        for _ in 0..3 {
            acc = cs.square(acc);
        }
        cs.assert_equal(acc, y);
        cs.pad();

        let hints = HintRegistry::default();
        let two = F::from(2u32);
        let y_value = F::from(256u32);
        let solution = cs
            .solve(&Witness::new(vec![y_value], vec![two]), &hints)
            .unwrap();
        assert_eq!(solution.values[acc], y_value);
        assert!(cs
            .verify_witness(&Witness::new(vec![F::from(255u32)], vec![two]), &hints)
            .is_err());
    }

    #[test]
    fn test_linear_solving() {
        let mut cs = SparseCS::<F>::new();
        let a = cs.new_secret_input();
        let b = cs.new_secret_input();
        let c = cs.linear_combination(a, b, F::from(3u32), F::from(4u32));
        let d = cs.add_constant(c, F::from(10u32));
        let e = cs.sub(d, a);
        cs.assert_constant(e, F::from(34u32));
        cs.pad();

        let hints = HintRegistry::default();
        let witness = Witness::new(vec![], vec![F::from(2u32), F::from(5u32)]);
        let solution = cs.solve(&witness, &hints).unwrap();
        assert_eq!(solution.values[c], F::from(26u32));
        assert_eq!(solution.values[d], F::from(36u32));
        assert_eq!(solution.values[e], F::from(34u32));
    }

    #[test]
    fn test_inverse_hint() {
        let mut cs = SparseCS::<F>::new();
        let a = cs.new_secret_input();
        let inv = cs.inverse(a);
        cs.pad();
        let hints = HintRegistry::default();

        let solution = cs
            .solve(&Witness::new(vec![], vec![F::from(9u32)]), &hints)
            .unwrap();
        assert_eq!(solution.values[inv].mul(&F::from(9u32)), F::one());

        assert_eq!(
            cs.solve(&Witness::new(vec![], vec![F::zero()]), &hints),
            Err(PlonkError::UnsatisfiedConstraint(0))
        );
    }

    #[test]
    fn test_custom_gate_hint_override() {
        let mut cs = SparseCS::<F>::new();
        let a = cs.new_secret_input();
        let c = cs.commit(&[a]).unwrap();
        let out = cs.add(a, c);
        cs.pad();

        let mut hints = HintRegistry::default();
        let witness = Witness::new(vec![], vec![F::from(3u32)]);
        let solution = cs.solve(&witness, &hints).unwrap();
        assert_eq!(solution.values[c], F::zero());
        assert_eq!(solution.values[out], F::from(3u32));

        hints.register(
            custom_gate_hint_id(0),
            Arc::new(|inputs: &[F]| -> crate::errors::Result<Vec<F>> {
                Ok(vec![inputs[0].add(&F::one())])
            }),
        );
        let solution = cs.solve(&witness, &hints).unwrap();
        assert_eq!(solution.values[c], F::from(4u32));
        assert_eq!(solution.values[out], F::from(7u32));
    }

    #[test]
    fn test_unsolvable_row() {
        let mut cs = SparseCS::<F>::new();
        let x = cs.new_secret_input();
        let y = cs.mul(x, x);
        let _ = cs.add(y, x);
        cs.pad();
        // the output of the first gate no longer appears in it
        cs.selectors[Q_O][0] = F::zero();
        let hints = HintRegistry::default();
        assert_eq!(
            cs.solve(&Witness::new(vec![], vec![F::from(3u32)]), &hints),
            Err(PlonkError::UnsatisfiedConstraint(0))
        );
    }
}
