//! End-to-end ELCC study: providers in, [`ElccReport`] out.
//!
//! 1. Load capacity factors, hourly load and the operating fleet.
//! 2. Optionally derate conventional capacity.
//! 3. Place existing VG sites and the candidate on grid cells.
//! 4. Calibrate and simulate the fleet, or load a persisted capacity matrix.
//! 5. Evaluate the baseline LOLH and search the ELCC against it.
//!
//! The same [`RandomStream`] feeds every phase; it is never reseeded between
//! calibration and the ELCC search.

use std::path::PathBuf;

use elcc_core::{
    validate_outage_rate, CandidateGenerator, CapacityFactorProvider, Diagnostics, ElccError,
    ElccResult, FleetFilter, FleetProvider, LoadProvider, MatrixStore, Megawatts,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calibrate::{CalibrationConfig, CalibrationSummary, FleetCalibrator};
use crate::cancel::CancelToken;
use crate::elcc::{ElccOutcome, ElccSearchConfig, ElccSolver};
use crate::evaluate::{CandidateSet, ReliabilityEvaluator};
use crate::mapper::{map_candidate, map_sites};
use crate::rng::RandomStream;
use crate::simulate::{FleetSimulator, VariableFleet, DEFAULT_MAX_BATCH_TRIALS};

/// Where the calibrated fleet's capacity matrix comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SystemSource {
    /// Calibrate and simulate, keep nothing
    #[default]
    Simulate,
    /// Calibrate and simulate, then persist the matrix under this directory
    Save(PathBuf),
    /// Skip calibration and reuse a persisted matrix
    Load(PathBuf),
}

/// Inputs of one study.
#[derive(Debug, Clone)]
pub struct StudyRequest {
    pub year: i32,
    pub trials: usize,
    pub filter: FleetFilter,
    pub conventional_efor: f64,
    pub vg_efor: f64,
    pub derate_conventional: bool,
    pub floor_year: Option<i32>,
    pub candidate: CandidateGenerator,
    pub system: SystemSource,
}

impl StudyRequest {
    pub fn validate(&self) -> ElccResult<()> {
        if self.trials == 0 {
            return Err(ElccError::Input("trial count must be at least 1".into()));
        }
        validate_outage_rate(self.conventional_efor, "conventional")?;
        validate_outage_rate(self.vg_efor, "variable generation")?;
        self.candidate.validate()
    }
}

/// Tunables that rarely change between studies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Capacity multiplier applied when derating is requested
    pub derate_factor: f64,
    pub max_batch_trials: usize,
    pub calibration: CalibrationConfig,
    pub elcc: ElccSearchConfig,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            derate_factor: 0.95,
            max_batch_trials: DEFAULT_MAX_BATCH_TRIALS,
            calibration: CalibrationConfig::default(),
            elcc: ElccSearchConfig::default(),
        }
    }
}

/// Data sources a study pulls from.
pub struct Providers<'a> {
    pub capacity_factors: &'a dyn CapacityFactorProvider,
    pub load: &'a dyn LoadProvider,
    pub fleet: &'a dyn FleetProvider,
    pub matrices: &'a dyn MatrixStore,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElccReport {
    pub year: i32,
    pub filter: FleetFilter,
    pub candidate: CandidateGenerator,
    pub trials: usize,
    pub seed: Option<u64>,
    pub elcc: Megawatts,
    pub baseline_lolh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationSummary>,
    pub search: ElccOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_path: Option<PathBuf>,
    pub interrupted: bool,
    pub diagnostics: Diagnostics,
}

pub fn run_study(
    request: &StudyRequest,
    config: &StudyConfig,
    providers: &Providers<'_>,
    rng: &mut RandomStream,
    cancel: &CancelToken,
) -> ElccResult<ElccReport> {
    request.validate()?;
    let mut diagnostics = Diagnostics::new();

    let grids = providers.capacity_factors.capacity_factors()?;
    let load = providers.load.hourly_load(request.year)?;
    let snapshot = providers.fleet.fleet(&request.filter)?;
    if snapshot.conventional.is_empty() {
        return Err(ElccError::Input(format!(
            "no operating conventional units for {}",
            request.filter
        )));
    }
    info!(
        "Fleet for {}: {} conventional ({:.1} MW), {} solar, {} wind",
        request.filter,
        snapshot.conventional.len(),
        snapshot.conventional.total_capacity().value(),
        snapshot.solar.len(),
        snapshot.wind.len()
    );

    let conventional = if request.derate_conventional {
        snapshot.conventional.derated(config.derate_factor)
    } else {
        snapshot.conventional
    };
    let vg = VariableFleet::new(
        map_sites(&snapshot.solar, &grids, request.vg_efor)?,
        map_sites(&snapshot.wind, &grids, request.vg_efor)?,
    );
    let candidates = map_candidate(&request.candidate, &grids)?;

    let simulator = FleetSimulator::new(&grids, request.conventional_efor)?
        .with_max_batch_trials(config.max_batch_trials);
    let evaluator = ReliabilityEvaluator::new(&grids, &load)?;

    let mut calibration = None;
    let mut system_path = None;
    let mut interrupted = false;
    let matrix = match &request.system {
        SystemSource::Load(path) => {
            let matrix = providers.matrices.load(path)?;
            if matrix.trials() != request.trials {
                warn!(
                    "Loaded system has {} trials, {} requested; using the file",
                    matrix.trials(),
                    request.trials
                );
                diagnostics.add_warning_with_entity(
                    "input",
                    &format!(
                        "persisted matrix has {} trials, {} requested",
                        matrix.trials(),
                        request.trials
                    ),
                    &path.display().to_string(),
                );
            }
            system_path = Some(path.clone());
            matrix
        }
        SystemSource::Simulate | SystemSource::Save(_) => {
            let mut calibration_config = config.calibration.clone();
            calibration_config.floor_year = request.floor_year.or(calibration_config.floor_year);
            let calibrator =
                FleetCalibrator::new(&simulator, &evaluator, &vg, calibration_config);
            let outcome = calibrator.calibrate(conventional, rng, cancel)?;
            interrupted |= outcome.interrupted;
            let matrix = simulator.simulate(&outcome.fleet, &vg, request.trials, rng)?;
            if let SystemSource::Save(dir) = &request.system {
                let path = providers.matrices.save(dir, &matrix)?;
                info!("Saved system to {}", path.display());
                system_path = Some(path);
            }
            calibration = Some(outcome.summary());
            diagnostics.merge(outcome.diagnostics);
            matrix
        }
    };

    let baseline_lolh = evaluator.lolh(
        &matrix,
        &CandidateSet::none(),
        Megawatts::ZERO,
        rng,
    )?;
    info!("Baseline LOLH: {:.4}", baseline_lolh);

    let search = ElccSolver::new(&evaluator, config.elcc.clone()).solve(
        &matrix,
        &candidates,
        baseline_lolh,
        rng,
        cancel,
    )?;
    interrupted |= search.interrupted;
    diagnostics.merge(search.diagnostics.clone());

    Ok(ElccReport {
        year: request.year,
        filter: request.filter.clone(),
        candidate: request.candidate.clone(),
        trials: matrix.trials(),
        seed: rng.seed(),
        elcc: search.elcc,
        baseline_lolh,
        calibration,
        search,
        system_path,
        interrupted,
        diagnostics,
    })
}
