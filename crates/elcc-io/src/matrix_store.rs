//! CSV persistence of simulated capacity matrices.
//!
//! One row per hour, one column per trial:
//!
//! ```text
//! hour,trial_0,trial_1,...
//! 0,1520.5,1480.0,...
//! ```
//!
//! Saving never overwrites: the first free `system-{i}-saved.csv` in the
//! target directory is used.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use elcc_core::{ElccResult, MatrixStore, SimulatedCapacityMatrix};
use std::fs;
use std::path::{Path, PathBuf};

/// First `system-{i}-saved.csv` under `dir` that does not exist yet.
pub fn next_system_path(dir: &Path) -> PathBuf {
    (0..)
        .map(|i| dir.join(format!("system-{i}-saved.csv")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| dir.join("system-saved.csv"))
}

pub fn write_matrix(path: &Path, matrix: &SimulatedCapacityMatrix) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut header = vec!["hour".to_string()];
    header.extend((0..matrix.trials()).map(|t| format!("trial_{t}")));
    wtr.write_record(&header)?;
    for (hour, row) in matrix.rows().enumerate() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(hour.to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)
            .with_context(|| format!("writing hour {hour} to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

pub fn read_matrix(path: &Path) -> Result<SimulatedCapacityMatrix> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening capacity matrix {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("parsing matrix row {}", idx + 1))?;
        let mut fields = record.iter();
        let hour: usize = fields
            .next()
            .unwrap_or_default()
            .trim()
            .parse()
            .with_context(|| format!("matrix row {}: bad hour index", idx + 1))?;
        if hour != idx {
            bail!("matrix row {}: expected hour {idx}, found {hour}", idx + 1);
        }
        let row = fields
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("matrix hour {hour}: non-numeric capacity"))?;
        rows.push(row);
    }
    SimulatedCapacityMatrix::from_rows(rows)
        .with_context(|| format!("loading {}", path.display()))
}

/// [`MatrixStore`] writing one CSV file per saved system.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvMatrixStore;

impl MatrixStore for CsvMatrixStore {
    fn save(&self, dir: &Path, matrix: &SimulatedCapacityMatrix) -> ElccResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = next_system_path(dir);
        write_matrix(&path, matrix)?;
        Ok(path)
    }

    fn load(&self, path: &Path) -> ElccResult<SimulatedCapacityMatrix> {
        Ok(read_matrix(path)?)
    }
}
