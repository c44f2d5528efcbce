//! Gridded hourly capacity factors for variable generation.

use crate::error::{ElccError, ElccResult};
use serde::{Deserialize, Serialize};

/// Hourly capacity factors indexed `[lat][lon][hour]`.
///
/// Values are stored in one contiguous row-major buffer so the hourly profile
/// of a single cell is a slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityFactorGrid {
    lats: Vec<f64>,
    lons: Vec<f64>,
    hours: usize,
    values: Vec<f64>,
}

impl CapacityFactorGrid {
    /// Build a grid, checking axis order, buffer length and value range.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>, hours: usize, values: Vec<f64>) -> ElccResult<Self> {
        if lats.is_empty() || lons.is_empty() {
            return Err(ElccError::Shape(
                "capacity factor grid needs at least one latitude and one longitude".into(),
            ));
        }
        check_ascending(&lats, "latitude")?;
        check_ascending(&lons, "longitude")?;
        let expected = lats.len() * lons.len() * hours;
        if values.len() != expected {
            return Err(ElccError::shape(
                "capacity factor values",
                format!("{} x {} x {} = {}", lats.len(), lons.len(), hours, expected),
                values.len(),
            ));
        }
        if let Some(bad) = values
            .iter()
            .position(|cf| !cf.is_finite() || *cf < 0.0 || *cf > 1.0)
        {
            return Err(ElccError::Input(format!(
                "capacity factor {} at flat index {} is outside [0, 1]",
                values[bad], bad
            )));
        }
        Ok(Self {
            lats,
            lons,
            hours,
            values,
        })
    }

    /// A grid with the same capacity factor everywhere.
    pub fn uniform(lats: Vec<f64>, lons: Vec<f64>, hours: usize, cf: f64) -> ElccResult<Self> {
        let len = lats.len() * lons.len() * hours;
        Self::new(lats, lons, hours, vec![cf; len])
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn hours(&self) -> usize {
        self.hours
    }

    /// (lat, lon, hour) dimensions.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.lats.len(), self.lons.len(), self.hours)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.lats.len() && col < self.lons.len()
    }

    /// Hourly profile of one cell.
    ///
    /// # Panics
    /// Panics if the cell lies outside the grid; callers check with
    /// [`Self::contains`] first.
    pub fn profile(&self, row: usize, col: usize) -> &[f64] {
        let start = (row * self.lons.len() + col) * self.hours;
        &self.values[start..start + self.hours]
    }

    pub fn value(&self, row: usize, col: usize, hour: usize) -> f64 {
        self.profile(row, col)[hour]
    }

    /// Verify the grid covers exactly `hours` hours.
    pub fn expect_hours(&self, hours: usize, what: &str) -> ElccResult<()> {
        if self.hours != hours {
            let (la, lo, _) = self.shape();
            return Err(ElccError::shape(
                what,
                format!("({la}, {lo}, {hours})"),
                format!("({la}, {lo}, {})", self.hours),
            ));
        }
        Ok(())
    }
}

fn check_ascending(axis: &[f64], name: &str) -> ElccResult<()> {
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(ElccError::Input(format!("{name} axis contains non-finite values")));
    }
    if axis.windows(2).any(|w| w[0] > w[1]) {
        return Err(ElccError::Input(format!("{name} axis must be sorted ascending")));
    }
    Ok(())
}
