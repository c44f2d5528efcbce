//! Gridded solar and wind capacity factors stored as JSON.
//!
//! Each technology lives in its own file:
//!
//! ```json
//! { "lat": [30.0, 30.5], "lon": [-110.0, -109.5], "cf": [[[0.1, 0.2, ...], ...], ...] }
//! ```
//!
//! `cf` is indexed `[lat][lon][hour]` and must cover 8760 hours.

use anyhow::{Context, Result};
use elcc_core::{
    CapacityFactorGrid, CapacityFactorGrids, CapacityFactorProvider, ElccError, ElccResult,
    HOURS_PER_YEAR,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFile {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub cf: Vec<Vec<Vec<f64>>>,
}

impl GridFile {
    /// Flatten into a grid, checking every dimension against the axes.
    pub fn into_grid(self, hours: usize) -> ElccResult<CapacityFactorGrid> {
        if self.cf.len() != self.lat.len() {
            return Err(ElccError::shape(
                "capacity factor latitude dimension",
                self.lat.len(),
                self.cf.len(),
            ));
        }
        let mut values = Vec::with_capacity(self.lat.len() * self.lon.len() * hours);
        for (i, row) in self.cf.into_iter().enumerate() {
            if row.len() != self.lon.len() {
                return Err(ElccError::shape(
                    &format!("capacity factor longitude dimension at lat index {i}"),
                    self.lon.len(),
                    row.len(),
                ));
            }
            for (j, profile) in row.into_iter().enumerate() {
                if profile.len() != hours {
                    return Err(ElccError::shape(
                        &format!("capacity factor hours at cell ({i}, {j})"),
                        hours,
                        profile.len(),
                    ));
                }
                values.extend(profile);
            }
        }
        CapacityFactorGrid::new(self.lat, self.lon, hours, values)
    }
}

/// Read one technology's grid; the hour dimension must be a full year.
pub fn read_grid(path: &Path) -> Result<CapacityFactorGrid> {
    let file = File::open(path)
        .with_context(|| format!("opening capacity factor file {}", path.display()))?;
    let parsed: GridFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing capacity factor file {}", path.display()))?;
    parsed
        .into_grid(HOURS_PER_YEAR)
        .with_context(|| format!("loading {}", path.display()))
}

/// [`CapacityFactorProvider`] over a solar and a wind JSON file.
#[derive(Debug, Clone)]
pub struct CapacityFactorFiles {
    pub solar: PathBuf,
    pub wind: PathBuf,
}

impl CapacityFactorFiles {
    pub fn new(solar: impl Into<PathBuf>, wind: impl Into<PathBuf>) -> Self {
        Self {
            solar: solar.into(),
            wind: wind.into(),
        }
    }
}

impl CapacityFactorProvider for CapacityFactorFiles {
    fn capacity_factors(&self) -> ElccResult<CapacityFactorGrids> {
        let solar = read_grid(&self.solar)?;
        let wind = read_grid(&self.wind)?;
        CapacityFactorGrids::new(solar, wind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_grid_layout() {
        let file = GridFile {
            lat: vec![1.0, 2.0],
            lon: vec![10.0],
            cf: vec![vec![vec![0.1, 0.2]], vec![vec![0.3, 0.4]]],
        };
        let grid = file.into_grid(2).unwrap();
        assert_eq!(grid.profile(1, 0), &[0.3, 0.4]);
    }

    #[test]
    fn test_short_profile_is_shape_error() {
        let file = GridFile {
            lat: vec![1.0],
            lon: vec![10.0],
            cf: vec![vec![vec![0.1, 0.2, 0.3]]],
        };
        assert!(matches!(file.into_grid(4), Err(ElccError::Shape(_))));
    }

    #[test]
    fn test_ragged_longitudes_are_shape_error() {
        let file = GridFile {
            lat: vec![1.0, 2.0],
            lon: vec![10.0, 11.0],
            cf: vec![vec![vec![0.1], vec![0.2]], vec![vec![0.3]]],
        };
        assert!(matches!(file.into_grid(1), Err(ElccError::Shape(_))));
    }
}
