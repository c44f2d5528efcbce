//! Generator fleets: the conventional units the calibrator trims and the
//! variable-generation sites that ride along in every simulation.

use crate::error::{ElccError, ElccResult};
use crate::units::Megawatts;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Technology label whose units are never selected for retirement.
pub const HYDRO_TECHNOLOGY: &str = "Conventional Hydroelectric";

/// Broad resource class of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Conventional,
    Solar,
    Wind,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Conventional => "conventional",
            ResourceKind::Solar => "solar",
            ResourceKind::Wind => "wind",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ElccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conventional" => Ok(ResourceKind::Conventional),
            "solar" => Ok(ResourceKind::Solar),
            "wind" => Ok(ResourceKind::Wind),
            other => Err(ElccError::Input(format!(
                "unknown generator type '{other}' (expected conventional, solar or wind)"
            ))),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject outage probabilities outside [0, 1].
pub fn validate_outage_rate(rate: f64, what: &str) -> ElccResult<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(ElccError::Input(format!(
            "{what} forced outage rate must lie in [0, 1], got {rate}"
        )));
    }
    Ok(())
}

/// A dispatchable unit of the existing fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionalUnit {
    pub capacity: Megawatts,
    /// Year the unit entered operation
    pub vintage_year: i32,
    pub technology: String,
    /// Never removed by the calibrator, whatever its vintage
    #[serde(default)]
    pub exempt_from_retirement: bool,
}

impl ConventionalUnit {
    pub fn new(capacity: Megawatts, vintage_year: i32) -> Self {
        Self {
            capacity,
            vintage_year,
            technology: String::new(),
            exempt_from_retirement: false,
        }
    }

    /// Attach a technology label; hydro units become exempt from retirement.
    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = technology.into();
        if self.technology == HYDRO_TECHNOLOGY {
            self.exempt_from_retirement = true;
        }
        self
    }

    pub fn exempt(mut self) -> Self {
        self.exempt_from_retirement = true;
        self
    }
}

/// Result of retiring every unit at or below a vintage cutoff.
#[derive(Debug, Clone)]
pub struct Retirement {
    pub fleet: ConventionalFleet,
    pub cutoff_year: i32,
    pub removed_capacity: Megawatts,
    pub removed_units: usize,
}

/// Ordered collection of conventional units.
///
/// The fleet is a value: retirement, derating and supplementation all return
/// a new fleet and leave `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConventionalFleet {
    units: Vec<ConventionalUnit>,
}

impl ConventionalFleet {
    pub fn new(units: Vec<ConventionalUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[ConventionalUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn total_capacity(&self) -> Megawatts {
        self.units.iter().map(|u| u.capacity).sum()
    }

    /// Scale every unit's capacity by `factor` (0.95 for a 5% derate).
    pub fn derated(&self, factor: f64) -> Self {
        Self {
            units: self
                .units
                .iter()
                .map(|u| ConventionalUnit {
                    capacity: u.capacity * factor,
                    ..u.clone()
                })
                .collect(),
        }
    }

    /// Oldest vintage among units that may be retired, raised to `floor_year`
    /// when the caller asks to start retiring from a later year.
    pub fn retirement_cutoff(&self, floor_year: Option<i32>) -> Option<i32> {
        let oldest = self
            .units
            .iter()
            .filter(|u| !u.exempt_from_retirement)
            .map(|u| u.vintage_year)
            .min()?;
        Some(floor_year.map_or(oldest, |floor| floor.max(oldest)))
    }

    /// Remove every non-exempt unit whose vintage is at or below `cutoff_year`.
    pub fn retire_through(&self, cutoff_year: i32) -> Retirement {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .units
            .iter()
            .cloned()
            .partition(|u| !u.exempt_from_retirement && u.vintage_year <= cutoff_year);
        Retirement {
            removed_capacity: removed.iter().map(|u| u.capacity).sum(),
            removed_units: removed.len(),
            cutoff_year,
            fleet: Self { units: kept },
        }
    }

    /// Add `supplement` to the first unit's capacity.
    pub fn with_supplement(&self, supplement: Megawatts) -> Self {
        let mut units = self.units.clone();
        if let Some(first) = units.first_mut() {
            first.capacity += supplement;
        }
        Self { units }
    }
}

/// An existing solar or wind site before it is placed on a capacity-factor grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewableSite {
    pub capacity: Megawatts,
    /// `None` when the source coordinate was missing or non-numeric
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RenewableSite {
    pub fn new(capacity: Megawatts, latitude: f64, longitude: f64) -> Self {
        Self {
            capacity,
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// A variable generator placed on a capacity-factor grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenewableUnit {
    pub capacity: Megawatts,
    pub grid_row: usize,
    pub grid_col: usize,
    pub forced_outage_rate: f64,
}

impl RenewableUnit {
    pub fn new(capacity: Megawatts, grid_row: usize, grid_col: usize, forced_outage_rate: f64) -> Self {
        Self {
            capacity,
            grid_row,
            grid_col,
            forced_outage_rate,
        }
    }
}

/// Solar or wind units of one technology, immutable once mapped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenewableFleet {
    units: Vec<RenewableUnit>,
}

impl RenewableFleet {
    pub fn new(units: Vec<RenewableUnit>) -> Self {
        Self { units }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[RenewableUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn total_capacity(&self) -> Megawatts {
        self.units.iter().map(|u| u.capacity).sum()
    }
}

/// The generator whose ELCC is being measured, as described by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGenerator {
    pub kind: ResourceKind,
    pub capacity: Megawatts,
    pub latitude: f64,
    pub longitude: f64,
    pub forced_outage_rate: f64,
}

impl CandidateGenerator {
    pub fn validate(&self) -> ElccResult<()> {
        if !self.capacity.is_finite() || self.capacity.value() < 0.0 {
            return Err(ElccError::Input(format!(
                "candidate capacity must be a non-negative number, got {}",
                self.capacity.value()
            )));
        }
        validate_outage_rate(self.forced_outage_rate, "candidate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> ConventionalFleet {
        ConventionalFleet::new(vec![
            ConventionalUnit::new(Megawatts(100.0), 1970),
            ConventionalUnit::new(Megawatts(50.0), 1965),
            ConventionalUnit::new(Megawatts(80.0), 1965),
            ConventionalUnit::new(Megawatts(300.0), 1950).with_technology(HYDRO_TECHNOLOGY),
            ConventionalUnit::new(Megawatts(200.0), 1990),
        ])
    }

    #[test]
    fn test_hydro_is_exempt() {
        let f = fleet();
        assert!(f.units()[3].exempt_from_retirement);
        assert!(!f.units()[0].exempt_from_retirement);
    }

    #[test]
    fn test_cutoff_skips_exempt_units() {
        assert_eq!(fleet().retirement_cutoff(None), Some(1965));
        assert_eq!(fleet().retirement_cutoff(Some(1975)), Some(1975));
        assert_eq!(fleet().retirement_cutoff(Some(1900)), Some(1965));
    }

    #[test]
    fn test_retire_removes_ties_together() {
        let retirement = fleet().retire_through(1965);
        assert_eq!(retirement.removed_units, 2);
        assert_eq!(retirement.removed_capacity, Megawatts(130.0));
        assert_eq!(retirement.fleet.len(), 3);
        // Order of survivors is preserved
        assert_eq!(retirement.fleet.units()[0].vintage_year, 1970);
    }

    #[test]
    fn test_retire_never_touches_exempt() {
        let retirement = fleet().retire_through(2100);
        assert_eq!(retirement.fleet.len(), 1);
        assert!(retirement.fleet.units()[0].exempt_from_retirement);
    }

    #[test]
    fn test_cutoff_none_when_only_exempt_units() {
        let f = ConventionalFleet::new(vec![ConventionalUnit::new(Megawatts(10.0), 2000).exempt()]);
        assert_eq!(f.retirement_cutoff(None), None);
    }

    #[test]
    fn test_supplement_and_derate_are_pure() {
        let f = fleet();
        let boosted = f.with_supplement(Megawatts(25.0));
        assert_eq!(boosted.units()[0].capacity, Megawatts(125.0));
        assert_eq!(f.units()[0].capacity, Megawatts(100.0));

        let derated = f.derated(0.95);
        assert!((derated.total_capacity().value() - 730.0 * 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_resource_kind_parse() {
        assert_eq!("Solar".parse::<ResourceKind>().unwrap(), ResourceKind::Solar);
        assert!("nuclear".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_candidate_validation() {
        let mut candidate = CandidateGenerator {
            kind: ResourceKind::Wind,
            capacity: Megawatts(100.0),
            latitude: 41.0,
            longitude: -110.0,
            forced_outage_rate: 0.05,
        };
        assert!(candidate.validate().is_ok());
        candidate.forced_outage_rate = 1.5;
        assert!(matches!(candidate.validate(), Err(ElccError::Input(_))));
    }
}
