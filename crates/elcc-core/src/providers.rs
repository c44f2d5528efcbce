//! Seams between the engine and the data sources that feed it.
//!
//! The engine never opens files itself. Fleet tables, demand series,
//! capacity-factor archives and persisted capacity matrices arrive through
//! these traits; `elcc-io` provides file-backed implementations and tests use
//! in-memory ones.

use crate::error::{ElccError, ElccResult};
use crate::fleet::{ConventionalFleet, RenewableSite};
use crate::grid::CapacityFactorGrid;
use crate::load::LoadSeries;
use crate::matrix::SimulatedCapacityMatrix;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which part of the grid a fleet is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum FleetFilter {
    NercRegion(String),
    BalancingAuthority(String),
}

impl FleetFilter {
    /// Resolve a filter from optional region and authority codes.
    ///
    /// A NERC region wins over a balancing authority. Empty strings and `"0"`
    /// count as unset, matching how fleet jobs have historically been
    /// parameterised.
    pub fn from_parts(nerc_region: Option<&str>, balancing_authority: Option<&str>) -> ElccResult<Self> {
        let set = |code: Option<&str>| {
            code.map(str::trim)
                .filter(|c| !c.is_empty() && *c != "0")
                .map(str::to_string)
        };
        if let Some(region) = set(nerc_region) {
            return Ok(FleetFilter::NercRegion(region));
        }
        if let Some(ba) = set(balancing_authority) {
            return Ok(FleetFilter::BalancingAuthority(ba));
        }
        Err(ElccError::Input(
            "fleet selection needs a NERC region or a balancing authority".into(),
        ))
    }

    pub fn code(&self) -> &str {
        match self {
            FleetFilter::NercRegion(code) | FleetFilter::BalancingAuthority(code) => code,
        }
    }
}

impl std::fmt::Display for FleetFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetFilter::NercRegion(code) => write!(f, "NERC region {code}"),
            FleetFilter::BalancingAuthority(code) => write!(f, "balancing authority {code}"),
        }
    }
}

/// Operating fleet of one region before grid mapping.
#[derive(Debug, Clone, Default)]
pub struct FleetSnapshot {
    pub conventional: ConventionalFleet,
    pub solar: Vec<RenewableSite>,
    pub wind: Vec<RenewableSite>,
}

/// Solar and wind capacity factors on a shared grid.
#[derive(Debug, Clone)]
pub struct CapacityFactorGrids {
    pub solar: CapacityFactorGrid,
    pub wind: CapacityFactorGrid,
}

impl CapacityFactorGrids {
    /// Pair two grids, requiring identical axes and hour counts.
    pub fn new(solar: CapacityFactorGrid, wind: CapacityFactorGrid) -> ElccResult<Self> {
        if solar.shape() != wind.shape() {
            return Err(ElccError::shape(
                "wind capacity factor grid",
                format!("{:?} (same as solar)", solar.shape()),
                format!("{:?}", wind.shape()),
            ));
        }
        if solar.lats() != wind.lats() || solar.lons() != wind.lons() {
            return Err(ElccError::Input(
                "solar and wind capacity factor grids must share latitude and longitude axes".into(),
            ));
        }
        Ok(Self { solar, wind })
    }

    pub fn hours(&self) -> usize {
        self.solar.hours()
    }

    pub fn lats(&self) -> &[f64] {
        self.solar.lats()
    }

    pub fn lons(&self) -> &[f64] {
        self.solar.lons()
    }
}

/// Source of gridded solar and wind capacity factors.
pub trait CapacityFactorProvider {
    fn capacity_factors(&self) -> ElccResult<CapacityFactorGrids>;
}

/// Source of hourly demand for a study year.
pub trait LoadProvider {
    fn hourly_load(&self, year: i32) -> ElccResult<LoadSeries>;
}

/// Source of the operating fleet of a region.
pub trait FleetProvider {
    fn fleet(&self, filter: &FleetFilter) -> ElccResult<FleetSnapshot>;
}

/// Persistence for simulated capacity matrices, so repeated ELCC runs against
/// one calibrated fleet can skip the simulation.
pub trait MatrixStore {
    /// Write `matrix` under `dir`, returning the path chosen.
    fn save(&self, dir: &Path, matrix: &SimulatedCapacityMatrix) -> ElccResult<PathBuf>;

    fn load(&self, path: &Path) -> ElccResult<SimulatedCapacityMatrix>;
}
