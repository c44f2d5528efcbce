//! Study configuration file.
//!
//! ```toml
//! [data]
//! plants = "eia860/plants.csv"
//! generators = "eia860/generators.csv"
//! demand = "demand/PACE.csv"
//! solar_cf = "cf/solar.json"
//! wind_cf = "cf/wind.json"
//!
//! [study]
//! derate_factor = 0.95
//!
//! [study.calibration]
//! fine_trials = 100
//! ```
//!
//! Every key is optional. Paths given on the command line win over `[data]`.

use anyhow::{Context, Result};
use elcc_algo::StudyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElccConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub study: StudyConfig,
}

/// Input file locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub plants: Option<PathBuf>,
    pub generators: Option<PathBuf>,
    pub demand: Option<PathBuf>,
    pub solar_cf: Option<PathBuf>,
    pub wind_cf: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ElccConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ElccConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &ElccConfig) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ElccConfig = toml::from_str(
            r#"
            [data]
            demand = "demand.csv"

            [study.calibration]
            fine_trials = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.data.demand, Some(PathBuf::from("demand.csv")));
        assert!(config.data.plants.is_none());
        assert_eq!(config.study.calibration.fine_trials, 20);
        assert_eq!(config.study.calibration.max_iterations, 20);
        assert_eq!(config.study.derate_factor, 0.95);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: ElccConfig = toml::from_str("").unwrap();
        assert_eq!(config, ElccConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elcc.toml");
        let mut config = ElccConfig::default();
        config.study.calibration.floor_year = Some(1970);
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }
}
