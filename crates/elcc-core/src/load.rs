//! Hourly demand series.

use crate::error::{ElccError, ElccResult};
use serde::{Deserialize, Serialize};

/// Hourly system load in MW, one entry per hour of the study year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadSeries {
    values: Vec<f64>,
}

impl LoadSeries {
    /// Build a series from non-negative, finite hourly values.
    pub fn new(values: Vec<f64>) -> ElccResult<Self> {
        if values.is_empty() {
            return Err(ElccError::Shape("load series is empty".into()));
        }
        if let Some(hour) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(ElccError::Input(format!(
                "load at hour {hour} must be a non-negative number, got {}",
                values[hour]
            )));
        }
        Ok(Self { values })
    }

    /// Build a series that must contain exactly `hours` entries.
    pub fn with_hours(values: Vec<f64>, hours: usize) -> ElccResult<Self> {
        if values.len() != hours {
            return Err(ElccError::shape("load series length", hours, values.len()));
        }
        Self::new(values)
    }

    pub fn hours(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, hour: usize) -> f64 {
        self.values[hour]
    }

    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
