//! The dependency graph of the prover steps.
//!
//! Every step runs on its own thread and blocks until its predecessors have
//! completed. A failing step records its error and cancels the graph; the
//! remaining steps then stop at their next wait point.
use crate::errors::{PlonkError, Result};
use parking_lot::{Condvar, Mutex};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Weak,
};

/// The steps of the prover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Compute the wire values from the witness.
    SolveConstraints,
    /// Draw the blinding polynomials.
    InitBlindingPolynomials,
    /// Complete Qk with the public inputs and the custom gate commitments.
    CompleteQk,
    /// Commit to the blinded L, R and O.
    CommitToLro,
    /// Derive \gamma and \beta.
    DeriveGammaAndBeta,
    /// Build and commit the grand product Z.
    BuildRatioCopyConstraint,
    /// Derive \alpha, compute and commit the quotient, derive \zeta.
    EvaluateConstraints,
    /// Open Z at \zeta\omega.
    OpenZ,
    /// Fold the quotient chunks at \zeta.
    FoldH,
    /// Build and commit the linearization polynomial.
    ComputeLinearizedPolynomial,
    /// Open every polynomial evaluated at \zeta.
    BatchOpening,
}

impl Step {
    /// All steps.
    pub const ALL: [Step; 11] = [
        Step::SolveConstraints,
        Step::InitBlindingPolynomials,
        Step::CompleteQk,
        Step::CommitToLro,
        Step::DeriveGammaAndBeta,
        Step::BuildRatioCopyConstraint,
        Step::EvaluateConstraints,
        Step::OpenZ,
        Step::FoldH,
        Step::ComputeLinearizedPolynomial,
        Step::BatchOpening,
    ];

    /// The steps whose output this step reads.
    pub fn predecessors(self) -> &'static [Step] {
        use Step::*;
        match self {
            SolveConstraints | InitBlindingPolynomials => &[],
            CompleteQk => &[SolveConstraints],
            CommitToLro => &[SolveConstraints, InitBlindingPolynomials],
            DeriveGammaAndBeta => &[CommitToLro],
            BuildRatioCopyConstraint => &[DeriveGammaAndBeta],
            EvaluateConstraints => &[
                InitBlindingPolynomials,
                CompleteQk,
                BuildRatioCopyConstraint,
            ],
            OpenZ => &[
                InitBlindingPolynomials,
                BuildRatioCopyConstraint,
                EvaluateConstraints,
            ],
            FoldH | ComputeLinearizedPolynomial => &[EvaluateConstraints],
            BatchOpening => &[
                InitBlindingPolynomials,
                CommitToLro,
                OpenZ,
                FoldH,
                ComputeLinearizedPolynomial,
            ],
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// A short name for traces.
    pub fn name(self) -> &'static str {
        use Step::*;
        match self {
            SolveConstraints => "solve constraints",
            InitBlindingPolynomials => "init blinding polynomials",
            CompleteQk => "complete qk",
            CommitToLro => "commit to LRO",
            DeriveGammaAndBeta => "derive gamma and beta",
            BuildRatioCopyConstraint => "build ratio copy constraint",
            EvaluateConstraints => "evaluate constraints",
            OpenZ => "open Z",
            FoldH => "fold H",
            ComputeLinearizedPolynomial => "compute linearized polynomial",
            BatchOpening => "batch opening",
        }
    }
}

#[derive(Default)]
struct TokenInner {
    cancelled: AtomicBool,
    graphs: Mutex<Vec<Weak<StepGraph>>>,
}

/// A handle cancelling the proofs it is attached to.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every proof using this token, now and later.
    pub fn cancel(&self) {
        let graphs = {
            let mut graphs = self.inner.graphs.lock();
            self.inner.cancelled.store(true, Ordering::SeqCst);
            std::mem::take(&mut *graphs)
        };
        for graph in graphs.iter().filter_map(Weak::upgrade) {
            graph.fail(PlonkError::ContextCancelled);
        }
    }

    /// Return true once `cancel` was called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    fn attach(&self, graph: &Arc<StepGraph>) {
        let mut graphs = self.inner.graphs.lock();
        if self.inner.cancelled.load(Ordering::SeqCst) {
            drop(graphs);
            graph.fail(PlonkError::ContextCancelled);
        } else {
            graphs.retain(|g| g.strong_count() > 0);
            graphs.push(Arc::downgrade(graph));
        }
    }
}

#[derive(Default)]
struct GraphState {
    completed: u16,
    error: Option<PlonkError>,
}

/// Completion flags of the steps of one proof, plus its first error.
#[derive(Default)]
pub struct StepGraph {
    state: Mutex<GraphState>,
    cond: Condvar,
}

impl StepGraph {
    /// Create a graph observing `token`.
    pub fn new(token: &CancelToken) -> Arc<Self> {
        let graph = Arc::new(Self::default());
        token.attach(&graph);
        graph
    }

    /// Block until every step of `steps` completed.
    /// Return `ContextCancelled` once the graph is cancelled.
    pub fn wait_for(&self, steps: &[Step]) -> Result<()> {
        let mask = steps.iter().fold(0u16, |acc, s| acc | s.bit());
        let mut state = self.state.lock();
        loop {
            if state.error.is_some() {
                return Err(PlonkError::ContextCancelled);
            }
            if state.completed & mask == mask {
                return Ok(());
            }
            self.cond.wait(&mut state);
        }
    }

    /// Signal that `step` completed. A step completes at most once.
    pub fn complete(&self, step: Step) -> Result<()> {
        let mut state = self.state.lock();
        if state.completed & step.bit() != 0 {
            return Err(PlonkError::InvariantViolation("step completed twice"));
        }
        state.completed |= step.bit();
        self.cond.notify_all();
        Ok(())
    }

    /// Record `err` unless an error was already recorded, and cancel the graph.
    pub fn fail(&self, err: PlonkError) {
        let mut state = self.state.lock();
        if state.error.is_none() {
            state.error = Some(err);
        }
        self.cond.notify_all();
    }

    /// Return true if `step` completed.
    pub fn is_completed(&self, step: Step) -> bool {
        self.state.lock().completed & step.bit() != 0
    }

    /// Return the first recorded error.
    pub fn error(&self) -> Option<PlonkError> {
        self.state.lock().error.clone()
    }

    /// Wait for the predecessors of `step`, run `f` and publish its outcome.
    /// A panic in `f` fails the graph, so the other steps do not wait forever.
    pub fn run<F: FnOnce() -> Result<()>>(&self, step: Step, f: F) {
        let outcome = self
            .wait_for(step.predecessors())
            .and_then(|_| {
                panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
                    Err(PlonkError::InvariantViolation("a prover step panicked"))
                })
            })
            .and_then(|_| self.complete(step));
        if let Err(err) = outcome {
            self.fail(err);
        }
    }
}
