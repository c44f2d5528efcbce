use std::fs;
use std::io::Write;
use std::path::Path;

use elcc_core::{
    CapacityFactorProvider, ElccError, FleetFilter, FleetProvider, LoadProvider, MatrixStore,
    Megawatts, SimulatedCapacityMatrix, HOURS_PER_YEAR,
};
use elcc_io::{CapacityFactorFiles, CsvMatrixStore, DemandCsv, EiaFleetFiles, GridFile};
use tempfile::tempdir;

fn write_demand(path: &Path, year: i32, leap: bool) {
    let days = [31, if leap { 29 } else { 28 }, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut file = fs::File::create(path).unwrap();
    writeln!(file, "date_time,cleaned demand (MW)").unwrap();
    // A trailing hour of the previous year must be ignored.
    writeln!(file, "{}-12-31 23:00:00,1.0", year - 1).unwrap();
    for (m, &n) in days.iter().enumerate() {
        for d in 1..=n {
            for h in 0..24 {
                let mw = if m == 1 && d == 29 { 99999.0 } else { 500.0 + h as f64 };
                writeln!(file, "{year}-{:02}-{:02} {h:02}:00:00,{mw}", m + 1, d).unwrap();
            }
        }
    }
}

fn write_grid(path: &Path, hours: usize, cf: f64) {
    let grid = GridFile {
        lat: vec![35.0, 40.0],
        lon: vec![-110.0, -100.0],
        cf: vec![vec![vec![cf; hours]; 2]; 2],
    };
    fs::write(path, serde_json::to_string(&grid).unwrap()).unwrap();
}

#[test]
fn test_demand_drops_leap_day_and_other_years() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("demand.csv");
    write_demand(&path, 2020, true);
    let load = DemandCsv::new(&path).hourly_load(2020).unwrap();
    assert_eq!(load.hours(), HOURS_PER_YEAR);
    assert_eq!(load.get(0), 500.0);
    assert_eq!(load.peak(), 523.0);
}

#[test]
fn test_demand_for_missing_year_is_shape_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("demand.csv");
    write_demand(&path, 2019, false);
    let err = DemandCsv::new(&path).hourly_load(2021).unwrap_err();
    assert!(matches!(err, ElccError::Shape(_)), "{err}");
    let message = err.to_string();
    assert!(message.contains("demand series for 2021"), "{message}");
    assert!(message.contains("expected 8760, found 0"), "{message}");
}

#[test]
fn test_demand_accepts_compact_timestamps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("demand.csv");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "date_time,demand_mw").unwrap();
    let days = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (m, &n) in days.iter().enumerate() {
        for d in 1..=n {
            for h in 0..24 {
                writeln!(file, "2019{:02}{d:02}T{h:02}Z,{}", m + 1, 100 + h % 7).unwrap();
            }
        }
    }
    drop(file);
    let load = DemandCsv::new(&path).hourly_load(2019).unwrap();
    assert_eq!(load.hours(), HOURS_PER_YEAR);
}

#[test]
fn test_capacity_factor_files() {
    let dir = tempdir().unwrap();
    let solar = dir.path().join("solar.json");
    let wind = dir.path().join("wind.json");
    write_grid(&solar, HOURS_PER_YEAR, 0.25);
    write_grid(&wind, HOURS_PER_YEAR, 0.4);
    let grids = CapacityFactorFiles::new(&solar, &wind).capacity_factors().unwrap();
    assert_eq!(grids.hours(), HOURS_PER_YEAR);
    assert_eq!(grids.lats(), &[35.0, 40.0]);
    assert_eq!(grids.wind.value(1, 1, 100), 0.4);
}

#[test]
fn test_capacity_factor_wrong_hours_is_shape_error() {
    let dir = tempdir().unwrap();
    let solar = dir.path().join("solar.json");
    let wind = dir.path().join("wind.json");
    write_grid(&solar, 8784, 0.25);
    write_grid(&wind, HOURS_PER_YEAR, 0.4);
    let err = CapacityFactorFiles::new(&solar, &wind)
        .capacity_factors()
        .unwrap_err();
    assert!(matches!(err, ElccError::Shape(_)), "{err}");
}

#[test]
fn test_eia_tables_with_original_headers() {
    let dir = tempdir().unwrap();
    let plants = dir.path().join("plants.csv");
    let generators = dir.path().join("generators.csv");
    fs::write(
        &plants,
        "Plant Code,NERC Region,Balancing Authority Code,Latitude,Longitude\n\
         10,WECC,PACE,40.1,-111.9\n\
         11,WECC,PACE,,\n\
         12,TRE,ERCO,31.0,-97.0\n",
    )
    .unwrap();
    fs::write(
        &generators,
        "Plant Code,Technology,Nameplate Capacity (MW),Status,Operating Year\n\
         10,Conventional Steam Coal,400,OP,1978\n\
         10,Natural Gas Fired Combustion Turbine,120,OP,2005\n\
         11,Solar Photovoltaic,75,OP,2019\n\
         11,Onshore Wind Turbine,200,OP,2010\n\
         11,Natural Gas Steam Turbine,90,RE,1960\n\
         12,Nuclear,1200,OP,1990\n",
    )
    .unwrap();

    let provider = EiaFleetFiles::new(&plants, &generators);
    let filter = FleetFilter::from_parts(Some("0"), Some("PACE")).unwrap();
    let snap = provider.fleet(&filter).unwrap();
    assert_eq!(snap.conventional.len(), 2);
    assert_eq!(snap.conventional.total_capacity(), Megawatts(520.0));
    assert_eq!(snap.solar.len(), 1);
    assert_eq!(snap.solar[0].latitude, None);
    assert_eq!(snap.wind[0].capacity, Megawatts(200.0));
}

#[test]
fn test_matrix_store_never_overwrites() {
    let dir = tempdir().unwrap();
    let systems = dir.path().join("systems");
    let matrix = SimulatedCapacityMatrix::from_rows(vec![
        vec![100.5, 98.25, 0.1],
        vec![87.0, 1e-3, 1234567.875],
    ])
    .unwrap();

    let store = CsvMatrixStore;
    let first = store.save(&systems, &matrix).unwrap();
    let second = store.save(&systems, &matrix).unwrap();
    assert_eq!(first.file_name().unwrap(), "system-0-saved.csv");
    assert_eq!(second.file_name().unwrap(), "system-1-saved.csv");

    let header = fs::read_to_string(&first).unwrap();
    assert!(header.starts_with("hour,trial_0,trial_1,trial_2"));
    assert_eq!(store.load(&second).unwrap(), matrix);
}

#[test]
fn test_matrix_with_shuffled_hours_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("system.csv");
    fs::write(&path, "hour,trial_0\n1,5.0\n0,6.0\n").unwrap();
    assert!(CsvMatrixStore.load(&path).is_err());
}
