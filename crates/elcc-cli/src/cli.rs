use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use elcc_core::ResourceKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Capacity adequacy and ELCC studies", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calibrate a regional fleet and estimate the ELCC of a candidate generator
    Run(RunArgs),
    /// Write a study config with every default filled in
    InitConfig {
        /// Destination TOML file
        #[arg(value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Study year (demand rows of this year are used)
    #[arg(long)]
    pub year: i32,

    /// Monte Carlo trials for the calibrated system and the ELCC search
    #[arg(long, default_value_t = 100)]
    pub trials: usize,

    /// NERC region code; wins over --ba ("0" means unset)
    #[arg(long)]
    pub region: Option<String>,

    /// Balancing authority code ("0" means unset)
    #[arg(long)]
    pub ba: Option<String>,

    /// Forced outage rate of conventional units
    #[arg(long, default_value_t = 0.05)]
    pub efor: f64,

    /// Forced outage rate of existing solar and wind units
    #[arg(long, default_value_t = 0.05)]
    pub vg_efor: f64,

    /// Derate conventional capacity before calibration
    #[arg(long)]
    pub derate: bool,

    /// Retire every unit up to this vintage in the first removal step
    #[arg(long)]
    pub floor_year: Option<i32>,

    /// Candidate technology: conventional, solar or wind
    #[arg(long = "generator-type", default_value = "solar")]
    pub generator_type: ResourceKind,

    /// Candidate nameplate capacity in MW
    #[arg(long = "generator-capacity")]
    pub generator_capacity: f64,

    #[arg(long = "generator-lat", default_value_t = 0.0, allow_negative_numbers = true)]
    pub generator_lat: f64,

    #[arg(long = "generator-lon", default_value_t = 0.0, allow_negative_numbers = true)]
    pub generator_lon: f64,

    /// Forced outage rate of the candidate
    #[arg(long = "generator-efor", default_value_t = 0.05)]
    pub generator_efor: f64,

    /// "none", "save" (persist the simulated system), or a saved system CSV to reuse
    #[arg(long, default_value = "none")]
    pub system: String,

    /// Directory for saved systems
    #[arg(long, default_value = "systems", value_hint = ValueHint::DirPath)]
    pub systems_dir: PathBuf,

    /// Seed for reproducible runs (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads ("auto" = one per CPU)
    #[arg(long, default_value = "auto")]
    pub threads: String,

    /// Study config TOML (data paths and search tunables)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// EIA-860 plant table CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub plants: Option<PathBuf>,

    /// EIA-860 generator table CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub generators: Option<PathBuf>,

    /// Hourly demand CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub demand: Option<PathBuf>,

    /// Solar capacity factor grid JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub solar_cf: Option<PathBuf>,

    /// Wind capacity factor grid JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub wind_cf: Option<PathBuf>,

    /// Write the JSON report (and a run manifest next to it)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
