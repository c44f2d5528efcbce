use anyhow::{Context, Result};
use elcc_algo::{
    run_study, CalibrationSummary, CancelToken, ElccReport, Providers, RandomStream, StudyRequest,
    SystemSource,
};
use elcc_cli::cli::RunArgs;
use elcc_cli::config::{load_config, ElccConfig};
use elcc_cli::manifest::record_manifest;
use elcc_core::{CandidateGenerator, FleetFilter, Megawatts};
use elcc_io::{CapacityFactorFiles, CsvMatrixStore, DemandCsv, EiaFleetFiles};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::commands::util::configure_threads;

fn system_source(spec: &str, dir: &Path) -> SystemSource {
    match spec.trim() {
        "" | "none" => SystemSource::Simulate,
        "save" => SystemSource::Save(dir.to_path_buf()),
        path => SystemSource::Load(PathBuf::from(path)),
    }
}

fn require(flag: Option<&PathBuf>, config: Option<&PathBuf>, name: &str) -> Result<PathBuf> {
    flag.or(config)
        .cloned()
        .with_context(|| format!("missing --{} (or [data].{} in the config file)", name.replace('_', "-"), name))
}

pub fn handle(args: &RunArgs) -> Result<()> {
    let threads = configure_threads(&args.threads);
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ElccConfig::default(),
    };
    let data = &config.data;
    let plants = require(args.plants.as_ref(), data.plants.as_ref(), "plants")?;
    let generators = require(args.generators.as_ref(), data.generators.as_ref(), "generators")?;
    let demand = require(args.demand.as_ref(), data.demand.as_ref(), "demand")?;
    let solar_cf = require(args.solar_cf.as_ref(), data.solar_cf.as_ref(), "solar_cf")?;
    let wind_cf = require(args.wind_cf.as_ref(), data.wind_cf.as_ref(), "wind_cf")?;

    let request = StudyRequest {
        year: args.year,
        trials: args.trials,
        filter: FleetFilter::from_parts(args.region.as_deref(), args.ba.as_deref())?,
        conventional_efor: args.efor,
        vg_efor: args.vg_efor,
        derate_conventional: args.derate,
        floor_year: args.floor_year,
        candidate: CandidateGenerator {
            kind: args.generator_type,
            capacity: Megawatts(args.generator_capacity),
            latitude: args.generator_lat,
            longitude: args.generator_lon,
            forced_outage_rate: args.generator_efor,
        },
        system: system_source(&args.system, &args.systems_dir),
    };
    info!(
        "Running {} study for {} with a {:.1} MW {} candidate on {} threads",
        request.year, request.filter, args.generator_capacity, request.candidate.kind, threads
    );

    let capacity_factors = CapacityFactorFiles::new(solar_cf, wind_cf);
    let load = DemandCsv::new(demand);
    let fleet = EiaFleetFiles::new(plants, generators);
    let providers = Providers {
        capacity_factors: &capacity_factors,
        load: &load,
        fleet: &fleet,
        matrices: &CsvMatrixStore,
    };

    let mut rng = RandomStream::new(args.seed);
    let report = run_study(&request, &config.study, &providers, &mut rng, &CancelToken::new())?;
    print_report(&report);

    if let Some(out) = &args.out {
        write_report(out, &report)?;
        let manifest = record_manifest(out, "run", report.seed, &params(args))?;
        println!("Report written to {} (manifest {})", out.display(), manifest.display());
    }
    Ok(())
}

fn year_or_na(year: Option<i32>) -> String {
    year.map_or_else(|| "n/a".to_string(), |y| y.to_string())
}

fn calibration_line(cal: &CalibrationSummary) -> String {
    format!(
        "Calibration: retired through {}, oldest remaining vintage {}, {} units remaining, {:.1} MW net removed, LOLH {:.4}",
        year_or_na(cal.retirement_cutoff_year),
        year_or_na(cal.oldest_operating_year),
        cal.remaining_units,
        cal.net_capacity_removed.value(),
        cal.lolh
    )
}

fn print_report(report: &ElccReport) {
    if let Some(cal) = &report.calibration {
        println!("{}", calibration_line(cal));
    }
    if let Some(path) = &report.system_path {
        println!("System: {}", path.display());
    }
    println!("Baseline LOLH: {:.4}", report.baseline_lolh);
    println!(
        "ELCC: {:.3} MW ({} of {:.1} MW nameplate, {} search steps)",
        report.elcc.value(),
        report.candidate.kind,
        report.candidate.capacity.value(),
        report.search.iterations
    );
    if report.diagnostics.has_issues() {
        print!("{}", report.diagnostics);
    }
}

fn write_report(path: &Path, report: &ElccReport) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn params(args: &RunArgs) -> Vec<(&'static str, String)> {
    vec![
        ("year", args.year.to_string()),
        ("trials", args.trials.to_string()),
        ("region", args.region.clone().unwrap_or_default()),
        ("ba", args.ba.clone().unwrap_or_default()),
        ("efor", args.efor.to_string()),
        ("vg_efor", args.vg_efor.to_string()),
        ("derate", args.derate.to_string()),
        (
            "floor_year",
            args.floor_year.map(|y| y.to_string()).unwrap_or_default(),
        ),
        ("generator_type", args.generator_type.to_string()),
        ("generator_capacity", args.generator_capacity.to_string()),
        ("generator_lat", args.generator_lat.to_string()),
        ("generator_lon", args.generator_lon.to_string()),
        ("generator_efor", args.generator_efor.to_string()),
        ("system", args.system.clone()),
    ]
}
