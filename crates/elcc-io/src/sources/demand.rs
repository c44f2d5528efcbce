//! Hourly demand from balancing-authority CSV exports.
//!
//! The file has a `date_time` column and a demand column, either
//! `cleaned demand (MW)` or `demand_mw`. Rows of the study year are picked by
//! the timestamp prefix (`2019-01-01 00:00:00` and `20190101T00Z` styles both
//! work), February 29 is dropped, and exactly 8760 hours must remain.

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use elcc_core::{ElccResult, LoadProvider, LoadSeries, HOURS_PER_YEAR};
use std::path::{Path, PathBuf};

const TIME_COLUMN: &str = "date_time";
const DEMAND_COLUMNS: &[&str] = &["cleaned demand (MW)", "demand_mw"];

fn in_year(timestamp: &str, year: i32) -> bool {
    let prefix = year.to_string();
    match timestamp.strip_prefix(&prefix) {
        Some(rest) => rest.starts_with('-') || rest.starts_with(|c: char| c.is_ascii_digit()),
        None => false,
    }
}

fn is_leap_day(timestamp: &str, year: i32) -> bool {
    timestamp.contains("-02-29") || timestamp.starts_with(&format!("{year}0229"))
}

/// Read the demand series of `year` from a CSV file.
pub fn read_demand(path: &Path, year: i32) -> Result<LoadSeries> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening demand CSV {}", path.display()))?;
    let headers = rdr.headers().context("reading demand CSV header")?.clone();
    let time_idx = headers
        .iter()
        .position(|h| h == TIME_COLUMN)
        .ok_or_else(|| anyhow!("demand CSV has no '{TIME_COLUMN}' column"))?;
    let demand_idx = headers
        .iter()
        .position(|h| DEMAND_COLUMNS.contains(&h))
        .ok_or_else(|| anyhow!("demand CSV needs one of the columns {DEMAND_COLUMNS:?}"))?;

    let mut values = Vec::with_capacity(HOURS_PER_YEAR);
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("parsing demand row {}", idx + 1))?;
        let timestamp = record.get(time_idx).unwrap_or_default();
        if !in_year(timestamp, year) || is_leap_day(timestamp, year) {
            continue;
        }
        let raw = record.get(demand_idx).unwrap_or_default();
        let demand: f64 = raw
            .parse()
            .with_context(|| format!("demand row {} ({timestamp}): '{raw}' is not a number", idx + 1))?;
        values.push(demand);
    }

    LoadSeries::with_hours(values, HOURS_PER_YEAR)
        .with_context(|| format!("demand series for {year} in {}", path.display()))
}

/// [`LoadProvider`] over one demand CSV file.
#[derive(Debug, Clone)]
pub struct DemandCsv {
    pub path: PathBuf,
}

impl DemandCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LoadProvider for DemandCsv {
    fn hourly_load(&self, year: i32) -> ElccResult<LoadSeries> {
        Ok(read_demand(&self.path, year)?)
    }
}
