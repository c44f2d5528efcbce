use anyhow::{Context, Result};
use csv::ReaderBuilder;
use elcc_core::{
    ConventionalFleet, ConventionalUnit, ElccError, ElccResult, FleetFilter, FleetProvider,
    FleetSnapshot, Megawatts, RenewableSite,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Generator status for units in service.
pub const OPERATING_STATUS: &str = "OP";

/// Technologies that form the existing solar fleet.
pub const SOLAR_TECHNOLOGIES: &[&str] = &["Solar Photovoltaic"];

/// Technologies that form the existing wind fleet.
pub const WIND_TECHNOLOGIES: &[&str] = &["Onshore Wind Turbine", "Offshore Wind Turbine"];

/// One row of an EIA-860 plant table (schedule 2).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EiaPlantRecord {
    #[serde(alias = "Plant Code")]
    pub plant_code: String,
    #[serde(alias = "NERC Region", default)]
    pub nerc_region: String,
    #[serde(alias = "Balancing Authority Code", default)]
    pub balancing_authority: String,
    /// Kept as text; blank or non-numeric coordinates are common
    #[serde(alias = "Latitude", default)]
    pub latitude: String,
    #[serde(alias = "Longitude", default)]
    pub longitude: String,
}

impl EiaPlantRecord {
    pub fn matches(&self, filter: &FleetFilter) -> bool {
        match filter {
            FleetFilter::NercRegion(code) => self.nerc_region.trim() == code,
            FleetFilter::BalancingAuthority(code) => self.balancing_authority.trim() == code,
        }
    }

    pub fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        (parse_number(&self.latitude), parse_number(&self.longitude))
    }
}

/// One row of an EIA-860 generator table (schedule 3).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EiaGeneratorRecord {
    #[serde(alias = "Plant Code")]
    pub plant_code: String,
    #[serde(alias = "Technology")]
    pub technology: String,
    #[serde(alias = "Nameplate Capacity (MW)")]
    pub nameplate_mw: String,
    #[serde(alias = "Status")]
    pub status: String,
    #[serde(alias = "Operating Year", default)]
    pub operating_year: String,
}

impl EiaGeneratorRecord {
    pub fn is_operating(&self) -> bool {
        self.status.trim() == OPERATING_STATUS
    }

    pub fn is_solar(&self) -> bool {
        SOLAR_TECHNOLOGIES.contains(&self.technology.trim())
    }

    pub fn is_wind(&self) -> bool {
        WIND_TECHNOLOGIES.contains(&self.technology.trim())
    }

    fn capacity(&self) -> Result<Megawatts> {
        parse_number(&self.nameplate_mw)
            .map(Megawatts)
            .with_context(|| {
                format!(
                    "plant {}: nameplate capacity '{}' is not a number",
                    self.plant_code, self.nameplate_mw
                )
            })
    }

    fn vintage(&self) -> Result<i32> {
        self.operating_year.trim().parse().with_context(|| {
            format!(
                "plant {}: operating year '{}' is not a year",
                self.plant_code, self.operating_year
            )
        })
    }
}

/// Numbers in EIA exports may carry thousands separators or be blank.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn read_table<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("opening {what} table {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let record: T =
            result.with_context(|| format!("parsing {what} record {} of {}", idx + 1, path.display()))?;
        rows.push(record);
    }
    Ok(rows)
}

/// Plant and generator tables of an EIA-860 release.
#[derive(Debug, Clone, Default)]
pub struct EiaFleetTables {
    pub plants: Vec<EiaPlantRecord>,
    pub generators: Vec<EiaGeneratorRecord>,
}

impl EiaFleetTables {
    pub fn new(plants: Vec<EiaPlantRecord>, generators: Vec<EiaGeneratorRecord>) -> Self {
        Self { plants, generators }
    }

    pub fn from_csv(plants: &Path, generators: &Path) -> Result<Self> {
        Ok(Self {
            plants: read_table(plants, "plant")?,
            generators: read_table(generators, "generator")?,
        })
    }

    /// Operating fleet of the plants matched by `filter`.
    ///
    /// Solar and wind generators take their plant's coordinates; every other
    /// technology joins the conventional fleet, with hydro exempt from
    /// retirement.
    pub fn snapshot(&self, filter: &FleetFilter) -> Result<FleetSnapshot> {
        let plants: HashMap<&str, &EiaPlantRecord> = self
            .plants
            .iter()
            .filter(|p| p.matches(filter))
            .map(|p| (p.plant_code.trim(), p))
            .collect();
        if plants.is_empty() {
            return Err(ElccError::Input(format!("no plants found for {filter}")).into());
        }

        let mut conventional = Vec::new();
        let mut snapshot = FleetSnapshot::default();
        for gen in self.generators.iter().filter(|g| g.is_operating()) {
            let Some(plant) = plants.get(gen.plant_code.trim()) else {
                continue;
            };
            let capacity = gen.capacity()?;
            if gen.is_solar() || gen.is_wind() {
                let (latitude, longitude) = plant.coordinates();
                let site = RenewableSite {
                    capacity,
                    latitude,
                    longitude,
                };
                if gen.is_solar() {
                    snapshot.solar.push(site);
                } else {
                    snapshot.wind.push(site);
                }
            } else {
                conventional.push(
                    ConventionalUnit::new(capacity, gen.vintage()?)
                        .with_technology(gen.technology.trim()),
                );
            }
        }
        snapshot.conventional = ConventionalFleet::new(conventional);
        Ok(snapshot)
    }
}

/// [`FleetProvider`] backed by EIA-860 CSV exports, read on every request.
#[derive(Debug, Clone)]
pub struct EiaFleetFiles {
    pub plants: PathBuf,
    pub generators: PathBuf,
}

impl EiaFleetFiles {
    pub fn new(plants: impl Into<PathBuf>, generators: impl Into<PathBuf>) -> Self {
        Self {
            plants: plants.into(),
            generators: generators.into(),
        }
    }
}

impl FleetProvider for EiaFleetFiles {
    fn fleet(&self, filter: &FleetFilter) -> ElccResult<FleetSnapshot> {
        let tables = EiaFleetTables::from_csv(&self.plants, &self.generators)?;
        Ok(tables.snapshot(filter)?)
    }
}

impl FleetProvider for EiaFleetTables {
    fn fleet(&self, filter: &FleetFilter) -> ElccResult<FleetSnapshot> {
        Ok(self.snapshot(filter)?)
    }
}
