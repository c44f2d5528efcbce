//! Calibration of the conventional fleet to the reliability target.
//!
//! Phase one retires the oldest vintage (every unit sharing it at once) and
//! re-estimates LOLH with a cheap single-trial simulation, until LOLH rises
//! above the target or the next removal would leave fewer than `min_units`
//! units; such a removal is not applied. The last removal usually overshoots,
//! so phase two bisects a supplement added to the first
//! surviving unit, between nothing and the capacity last removed, until LOLH
//! is within `tolerance` of the target.
//!
//! Running out of iterations is not an error: the supplement closest to the
//! target is kept and a warning lands in the outcome's [`Diagnostics`].

use elcc_core::{
    ConventionalFleet, DiagnosticIssue, Diagnostics, ElccError, ElccResult, Megawatts, Severity,
    RELIABILITY_TARGET_LOLH,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bisection::Bisection;
use crate::cancel::CancelToken;
use crate::evaluate::{CandidateSet, ReliabilityEvaluator};
use crate::rng::RandomStream;
use crate::simulate::{FleetSimulator, VariableFleet};

/// Search parameters for [`FleetCalibrator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub target_lolh: f64,
    /// Accepted |LOLH - target| in the supplement search
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Trials per removal step
    pub coarse_trials: usize,
    /// Trials per supplement step
    pub fine_trials: usize,
    /// Start retiring at this vintage instead of the oldest one
    pub floor_year: Option<i32>,
    /// Removal stops once the fleet is smaller than this
    pub min_units: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            target_lolh: RELIABILITY_TARGET_LOLH,
            tolerance: 0.01,
            max_iterations: 20,
            coarse_trials: 1,
            fine_trials: 100,
            floor_year: None,
            min_units: 2,
        }
    }
}

/// Calibrated fleet and how it was reached.
#[derive(Debug, Clone)]
pub struct CalibrationOutcome {
    pub fleet: ConventionalFleet,
    /// Last vintage cutoff applied by the removal phase
    pub retirement_cutoff_year: Option<i32>,
    /// Oldest retirable vintage still in the fleet, not the cutoff
    pub oldest_operating_year: Option<i32>,
    pub remaining_units: usize,
    /// Gross capacity retired, before the supplement is added back
    pub capacity_removed: Megawatts,
    pub supplement: Megawatts,
    /// LOLH of the returned fleet as last estimated
    pub lolh: f64,
    pub removal_steps: usize,
    pub iterations: usize,
    pub converged: bool,
    pub interrupted: bool,
    pub diagnostics: Diagnostics,
}

impl CalibrationOutcome {
    pub fn net_capacity_removed(&self) -> Megawatts {
        self.capacity_removed - self.supplement
    }

    pub fn summary(&self) -> CalibrationSummary {
        CalibrationSummary {
            retirement_cutoff_year: self.retirement_cutoff_year,
            oldest_operating_year: self.oldest_operating_year,
            remaining_units: self.remaining_units,
            remaining_capacity: self.fleet.total_capacity(),
            capacity_removed: self.capacity_removed,
            supplement: self.supplement,
            net_capacity_removed: self.net_capacity_removed(),
            lolh: self.lolh,
            removal_steps: self.removal_steps,
            iterations: self.iterations,
            converged: self.converged,
            interrupted: self.interrupted,
        }
    }
}

/// Serializable view of a [`CalibrationOutcome`] for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationSummary {
    pub retirement_cutoff_year: Option<i32>,
    pub oldest_operating_year: Option<i32>,
    pub remaining_units: usize,
    pub remaining_capacity: Megawatts,
    pub capacity_removed: Megawatts,
    pub supplement: Megawatts,
    pub net_capacity_removed: Megawatts,
    pub lolh: f64,
    pub removal_steps: usize,
    pub iterations: usize,
    pub converged: bool,
    pub interrupted: bool,
}

/// Trims and tops up a conventional fleet until its LOLH hits the target.
pub struct FleetCalibrator<'a> {
    simulator: &'a FleetSimulator<'a>,
    evaluator: &'a ReliabilityEvaluator<'a>,
    vg: &'a VariableFleet,
    config: CalibrationConfig,
}

impl<'a> FleetCalibrator<'a> {
    pub fn new(
        simulator: &'a FleetSimulator<'a>,
        evaluator: &'a ReliabilityEvaluator<'a>,
        vg: &'a VariableFleet,
        config: CalibrationConfig,
    ) -> Self {
        Self {
            simulator,
            evaluator,
            vg,
            config,
        }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// LOLH of `fleet` plus the VG fleet on its own, with no candidate.
    pub fn fleet_lolh(
        &self,
        fleet: &ConventionalFleet,
        trials: usize,
        rng: &mut RandomStream,
    ) -> ElccResult<f64> {
        let matrix = self.simulator.simulate(fleet, self.vg, trials, rng)?;
        self.evaluator
            .lolh(&matrix, &CandidateSet::none(), Megawatts::ZERO, rng)
    }

    pub fn calibrate(
        &self,
        fleet: ConventionalFleet,
        rng: &mut RandomStream,
        cancel: &CancelToken,
    ) -> ElccResult<CalibrationOutcome> {
        let cfg = &self.config;
        if fleet.is_empty() {
            return Err(ElccError::Input(
                "cannot calibrate an empty conventional fleet".into(),
            ));
        }
        if cfg.coarse_trials == 0 || cfg.fine_trials == 0 {
            return Err(ElccError::Config(
                "calibration trial counts must be at least 1".into(),
            ));
        }

        let mut diagnostics = Diagnostics::new();
        let mut fleet = fleet;
        let mut lolh = 0.0;
        let mut interrupted = false;
        let mut cutoff_year = None;
        let mut removal_steps = 0;
        let mut capacity_removed = Megawatts::ZERO;
        let mut last_removed = Megawatts::ZERO;

        while lolh <= cfg.target_lolh && fleet.len() >= cfg.min_units {
            if cancel.is_cancelled() {
                interrupted = true;
                break;
            }
            let Some(cutoff) = fleet.retirement_cutoff(cfg.floor_year) else {
                diagnostics.add_warning(
                    "fleet",
                    "no retirable units left before LOLH exceeded the target",
                );
                break;
            };
            let retirement = fleet.retire_through(cutoff);
            if retirement.fleet.len() < cfg.min_units.max(1) {
                diagnostics.add_warning_with_entity(
                    "fleet",
                    &format!(
                        "removal skipped: it would leave {} unit(s), minimum is {}",
                        retirement.fleet.len(),
                        cfg.min_units.max(1)
                    ),
                    &format!("vintage {cutoff}"),
                );
                break;
            }
            fleet = retirement.fleet;
            removal_steps += 1;
            cutoff_year = Some(cutoff);
            last_removed = retirement.removed_capacity;
            capacity_removed += retirement.removed_capacity;
            lolh = self.fleet_lolh(&fleet, cfg.coarse_trials, rng)?;
            debug!(
                "Retired vintage <= {}: {} units, {:.1} MW removed, LOLH {:.3}",
                cutoff, retirement.removed_units, last_removed.value(), lolh
            );
        }
        if !interrupted && lolh <= cfg.target_lolh && fleet.len() < cfg.min_units {
            diagnostics.add_warning(
                "fleet",
                &format!(
                    "fleet reached {} unit(s) before LOLH exceeded the target",
                    fleet.len()
                ),
            );
        }

        let mut supplement = Megawatts::ZERO;
        let mut iterations = 0;
        let mut converged = false;

        // Supplement only when the last removal pushed LOLH past the target.
        let overshot = lolh > cfg.target_lolh;
        if !interrupted && overshot && last_removed.value() > 0.0 {
            let mut search = Bisection::new(0.0, last_removed.value());
            let mut best: Option<(f64, f64)> = None;
            while iterations < cfg.max_iterations {
                if cancel.is_cancelled() {
                    interrupted = true;
                    break;
                }
                iterations += 1;
                let candidate = search.current();
                let trial_lolh = self.fleet_lolh(
                    &fleet.with_supplement(Megawatts(candidate)),
                    cfg.fine_trials,
                    rng,
                )?;
                let error = (trial_lolh - cfg.target_lolh).abs();
                debug!(
                    "Supplement {:.3} MW -> LOLH {:.4} (iteration {})",
                    candidate, trial_lolh, iterations
                );
                if best.map_or(true, |(_, b)| error < (b - cfg.target_lolh).abs()) {
                    best = Some((candidate, trial_lolh));
                }
                if error <= cfg.tolerance {
                    converged = true;
                    break;
                }
                if trial_lolh > cfg.target_lolh {
                    search.raise();
                } else {
                    search.lower();
                }
            }
            if let Some((s, l)) = best {
                supplement = Megawatts(s);
                lolh = l;
            }
        } else if !interrupted {
            lolh = self.fleet_lolh(&fleet, cfg.fine_trials, rng)?;
            converged = (lolh - cfg.target_lolh).abs() <= cfg.tolerance;
        }

        if !converged && !interrupted {
            warn!(
                "Calibration did not reach LOLH {} within {} (got {:.4})",
                cfg.target_lolh, cfg.tolerance, lolh
            );
            diagnostics.add(
                DiagnosticIssue::new(
                    Severity::Warning,
                    "calibration",
                    format!(
                        "threshold not met: LOLH {:.4} vs target {}, keeping closest supplement {:.3} MW",
                        lolh, cfg.target_lolh, supplement.value()
                    ),
                )
                .with_iteration(iterations),
            );
        }

        let fleet = fleet.with_supplement(supplement);
        let oldest_operating_year = fleet.retirement_cutoff(None);
        info!(
            "Calibrated fleet: {} units, retired through {:?}, oldest remaining vintage {:?}, {:.1} MW net removed, LOLH {:.4}",
            fleet.len(),
            cutoff_year,
            oldest_operating_year,
            (capacity_removed - supplement).value(),
            lolh
        );

        Ok(CalibrationOutcome {
            remaining_units: fleet.len(),
            fleet,
            retirement_cutoff_year: cutoff_year,
            oldest_operating_year,
            capacity_removed,
            supplement,
            lolh,
            removal_steps,
            iterations,
            converged,
            interrupted,
            diagnostics,
        })
    }
}
