//! # elcc-algo: Monte Carlo capacity adequacy engine
//!
//! Estimates the Effective Load Carrying Capacity (ELCC) of a candidate
//! generator against a calibrated conventional fleet.
//!
//! ## Pipeline
//!
//! | Stage | Entry point | Output |
//! |-------|-------------|--------|
//! | Grid mapping | [`map_sites`], [`map_candidate`] | grid cells per resource |
//! | Outage simulation | [`FleetSimulator::simulate`] | `[hour][trial]` available MW |
//! | Risk evaluation | [`ReliabilityEvaluator::lolh`] | expected loss-of-load hours |
//! | Calibration | [`FleetCalibrator::calibrate`] | fleet at LOLH 2.4 |
//! | ELCC search | [`ElccSolver::solve`] | MW of constant load carried |
//!
//! [`run_study`] wires the stages together behind the provider traits of
//! `elcc-core`.
//!
//! ## Randomness
//!
//! All draws come from an explicit [`RandomStream`]. Each simulator or
//! evaluator call takes one seed from it and derives an independent generator
//! per hour, so results are reproducible for a seeded stream whatever the
//! rayon thread count.
//!
//! ## Example
//!
//! ```
//! use elcc_algo::{CandidateSet, ReliabilityEvaluator, RandomStream};
//! use elcc_core::{CapacityFactorGrid, CapacityFactorGrids, LoadSeries, Megawatts, SimulatedCapacityMatrix};
//!
//! let grid = |cf| CapacityFactorGrid::uniform(vec![0.0], vec![0.0], 4, cf).unwrap();
//! let grids = CapacityFactorGrids::new(grid(0.0), grid(0.0)).unwrap();
//! let load = LoadSeries::new(vec![100.0, 120.0, 90.0, 110.0]).unwrap();
//! let evaluator = ReliabilityEvaluator::new(&grids, &load).unwrap();
//!
//! let matrix = SimulatedCapacityMatrix::from_vec(4, 1, vec![80.0; 4]).unwrap();
//! let lolh = evaluator
//!     .lolh(&matrix, &CandidateSet::none(), Megawatts::ZERO, &mut RandomStream::seeded(7))
//!     .unwrap();
//! assert_eq!(lolh, 4.0);
//! ```

mod bisection;
pub mod calibrate;
pub mod cancel;
pub mod elcc;
pub mod evaluate;
pub mod mapper;
pub mod rng;
pub mod simulate;
pub mod study;

pub use calibrate::{CalibrationConfig, CalibrationOutcome, CalibrationSummary, FleetCalibrator};
pub use cancel::CancelToken;
pub use elcc::{ElccOutcome, ElccSearchConfig, ElccSolver};
pub use evaluate::{CandidateSet, FirmCandidate, ReliabilityEvaluator};
pub use mapper::{axis_index, map_candidate, map_site, map_sites};
pub use rng::RandomStream;
pub use simulate::{FleetSimulator, VariableFleet, DEFAULT_MAX_BATCH_TRIALS};
pub use study::{run_study, ElccReport, Providers, StudyConfig, StudyRequest, SystemSource};
