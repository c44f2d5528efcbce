//! # elcc-core: data model for capacity adequacy studies
//!
//! Shared types for estimating the Effective Load Carrying Capacity (ELCC) of
//! a generator added to an existing fleet.
//!
//! ## Core Data Structures
//!
//! - [`ConventionalFleet`] / [`ConventionalUnit`]: dispatchable units with a
//!   vintage year, trimmed by calibration
//! - [`RenewableFleet`] / [`RenewableUnit`]: solar and wind units placed on a
//!   capacity-factor grid cell
//! - [`CapacityFactorGrid`]: `[lat][lon][hour]` capacity factors
//! - [`LoadSeries`]: hourly demand
//! - [`SimulatedCapacityMatrix`]: Monte Carlo available capacity, `[hour][trial]`
//!
//! ## Modules
//!
//! - [`diagnostics`]: non-fatal issues (search budgets exhausted, fleet floors)
//! - [`error`]: [`ElccError`] and [`ElccResult`]
//! - [`providers`]: traits for fleet, load, capacity-factor and matrix sources
//! - [`units`]: the [`Megawatts`] newtype
//!
//! The algorithms live in `elcc-algo`; file-backed providers live in `elcc-io`.

pub mod diagnostics;
pub mod error;
pub mod fleet;
pub mod grid;
pub mod load;
pub mod matrix;
pub mod providers;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{ElccError, ElccResult};
pub use fleet::{
    validate_outage_rate, CandidateGenerator, ConventionalFleet, ConventionalUnit,
    RenewableFleet, RenewableSite, RenewableUnit, ResourceKind, Retirement, HYDRO_TECHNOLOGY,
};
pub use grid::CapacityFactorGrid;
pub use load::LoadSeries;
pub use matrix::SimulatedCapacityMatrix;
pub use providers::{
    CapacityFactorGrids, CapacityFactorProvider, FleetFilter, FleetProvider, FleetSnapshot,
    LoadProvider, MatrixStore,
};
pub use units::Megawatts;

/// Hours in a study year once leap days are removed.
pub const HOURS_PER_YEAR: usize = 8760;

/// Expected loss-of-load hours per year the baseline fleet is calibrated to.
pub const RELIABILITY_TARGET_LOLH: f64 = 2.4;
