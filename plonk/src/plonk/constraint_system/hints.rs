use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::MAX_CUSTOM_GATES;
use std::{collections::BTreeMap, sync::Arc};
use tessera_algebra::prelude::*;

/// Identifier of a hint function.
pub type HintId = usize;

/// A hint: computes the values of its output variables from its inputs.
pub type HintFn<'a, F> = Arc<dyn Fn(&[F]) -> Result<Vec<F>> + Send + Sync + 'a>;

/// The hint returning the inverse of its input, or zero for zero.
pub const INVERSE_HINT: HintId = 1;

/// The hint id of the first custom gate. Custom gate `i` uses
/// `CUSTOM_GATE_HINT_BASE + i`.
pub const CUSTOM_GATE_HINT_BASE: HintId = 1 << 8;

/// Return the hint id computing the commitment of the `index`-th custom gate.
pub fn custom_gate_hint_id(index: usize) -> HintId {
    CUSTOM_GATE_HINT_BASE + index
}

/// Maps hint ids to hint functions.
#[derive(Clone)]
pub struct HintRegistry<'a, F> {
    hints: BTreeMap<HintId, HintFn<'a, F>>,
}

impl<'a, F: Scalar> Default for HintRegistry<'a, F> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<'a, F: Scalar> HintRegistry<'a, F> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            hints: BTreeMap::new(),
        }
    }

    /// A registry with the inverse hint and a placeholder for every custom gate.
    /// The placeholder sets the commitment variable to zero; the prover
    /// replaces it with the function committing to the gate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            INVERSE_HINT,
            Arc::new(|inputs: &[F]| -> Result<Vec<F>> {
                let x = inputs.first().ok_or(PlonkError::FuncParamsError)?;
                Ok(vec![x.inv().unwrap_or_else(|_| F::zero())])
            }),
        );
        for i in 0..MAX_CUSTOM_GATES {
            registry.register(
                custom_gate_hint_id(i),
                Arc::new(|_: &[F]| -> Result<Vec<F>> { Ok(vec![F::zero()]) }),
            );
        }
        registry
    }

    /// Register `hint` under `id`, replacing any previous function.
    pub fn register(&mut self, id: HintId, hint: HintFn<'a, F>) {
        self.hints.insert(id, hint);
    }

    /// Run the hint `id` and check it produced `num_outputs` values.
    pub fn run(&self, id: HintId, inputs: &[F], num_outputs: usize) -> Result<Vec<F>> {
        let hint = self
            .hints
            .get(&id)
            .ok_or(PlonkError::NotSupported("unknown hint"))?;
        let outputs = hint(inputs)?;
        if outputs.len() != num_outputs {
            return Err(PlonkError::InvariantViolation(
                "hint returned a wrong number of outputs",
            ));
        }
        Ok(outputs)
    }
}
