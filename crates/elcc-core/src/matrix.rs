//! Monte Carlo output: available system capacity per hour and trial.

use crate::error::{ElccError, ElccResult};

/// Available capacity in MW, stored hour-major as `[hour][trial]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedCapacityMatrix {
    hours: usize,
    trials: usize,
    data: Vec<f64>,
}

impl SimulatedCapacityMatrix {
    /// Wrap an hour-major buffer of `hours * trials` values.
    pub fn from_vec(hours: usize, trials: usize, data: Vec<f64>) -> ElccResult<Self> {
        if trials == 0 {
            return Err(ElccError::Shape("capacity matrix needs at least one trial".into()));
        }
        if data.len() != hours * trials {
            return Err(ElccError::shape(
                "capacity matrix buffer",
                format!("{hours} x {trials} = {}", hours * trials),
                data.len(),
            ));
        }
        Ok(Self { hours, trials, data })
    }

    /// Build from one row per hour; all rows must have the same trial count.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ElccResult<Self> {
        let hours = rows.len();
        let trials = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != trials) {
            return Err(ElccError::shape(
                &format!("capacity matrix row {bad}"),
                format!("{trials} trials"),
                rows[bad].len(),
            ));
        }
        Self::from_vec(hours, trials, rows.into_iter().flatten().collect())
    }

    pub fn hours(&self) -> usize {
        self.hours
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn row(&self, hour: usize) -> &[f64] {
        &self.data[hour * self.trials..(hour + 1) * self.trials]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.trials.max(1)).take(self.hours)
    }

    pub fn get(&self, hour: usize, trial: usize) -> f64 {
        self.data[hour * self.trials + trial]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mean available capacity across all cells.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}
