//! Effective Load Carrying Capacity search.
//!
//! The ELCC of a candidate is the constant load it can carry on top of the
//! calibrated fleet while holding LOLH at the fleet's own baseline. The solver
//! bisects that load offset between zero and the candidate's nameplate,
//! raising it while LOLH is below the target and lowering it while above.

use elcc_core::{
    DiagnosticIssue, Diagnostics, ElccError, ElccResult, Megawatts, Severity,
    SimulatedCapacityMatrix, RELIABILITY_TARGET_LOLH,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bisection::Bisection;
use crate::cancel::CancelToken;
use crate::evaluate::{CandidateSet, ReliabilityEvaluator};
use crate::rng::RandomStream;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElccSearchConfig {
    pub max_iterations: usize,
    /// Fixed tolerance on |LOLH - target|; `None` scales it as 2.4 / trials
    pub tolerance: Option<f64>,
}

impl Default for ElccSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: None,
        }
    }
}

impl ElccSearchConfig {
    pub fn tolerance_for(&self, trials: usize) -> f64 {
        self.tolerance
            .unwrap_or(RELIABILITY_TARGET_LOLH / trials.max(1) as f64)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ElccOutcome {
    pub elcc: Megawatts,
    /// LOLH at the returned offset; `None` if no step ran
    pub lolh: Option<f64>,
    pub target_lolh: f64,
    pub tolerance: f64,
    pub iterations: usize,
    pub converged: bool,
    pub interrupted: bool,
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

/// Bisects the load offset that restores the baseline LOLH.
pub struct ElccSolver<'a> {
    evaluator: &'a ReliabilityEvaluator<'a>,
    config: ElccSearchConfig,
}

impl<'a> ElccSolver<'a> {
    pub fn new(evaluator: &'a ReliabilityEvaluator<'a>, config: ElccSearchConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn solve(
        &self,
        matrix: &SimulatedCapacityMatrix,
        candidates: &CandidateSet,
        target_lolh: f64,
        rng: &mut RandomStream,
        cancel: &CancelToken,
    ) -> ElccResult<ElccOutcome> {
        if !target_lolh.is_finite() || target_lolh < 0.0 {
            return Err(ElccError::Input(format!(
                "target LOLH must be a non-negative number, got {target_lolh}"
            )));
        }
        let nameplate = candidates.total_capacity();
        let tolerance = self.config.tolerance_for(matrix.trials());
        let mut search = Bisection::new(0.0, nameplate.value());
        let mut diagnostics = Diagnostics::new();

        let mut elcc = Megawatts::ZERO;
        let mut lolh = None;
        let mut iterations = 0;
        let mut converged = false;
        let mut interrupted = false;

        while iterations < self.config.max_iterations {
            if cancel.is_cancelled() {
                interrupted = true;
                break;
            }
            iterations += 1;
            let offset = Megawatts(search.current());
            let achieved = self.evaluator.lolh(matrix, candidates, offset, rng)?;
            debug!(
                "ELCC step {}: offset {:.3} MW -> LOLH {:.4}",
                iterations,
                offset.value(),
                achieved
            );
            elcc = offset;
            lolh = Some(achieved);
            if (achieved - target_lolh).abs() <= tolerance {
                converged = true;
                break;
            }
            if achieved < target_lolh {
                search.raise();
            } else {
                search.lower();
            }
        }

        if !converged && !interrupted {
            warn!(
                "Threshold not met in {} binary trials, ELCC {:.3} MW is approximate",
                iterations,
                elcc.value()
            );
            diagnostics.add(
                DiagnosticIssue::new(
                    Severity::Warning,
                    "elcc",
                    format!(
                        "threshold not met: LOLH {:.4} vs target {:.4} (tolerance {:.4})",
                        lolh.unwrap_or(f64::NAN),
                        target_lolh,
                        tolerance
                    ),
                )
                .with_iteration(iterations),
            );
        }
        info!("ELCC: {:.3} MW of {:.3} MW nameplate", elcc.value(), nameplate.value());

        Ok(ElccOutcome {
            elcc,
            lolh,
            target_lolh,
            tolerance,
            iterations,
            converged,
            interrupted,
            diagnostics,
        })
    }
}
