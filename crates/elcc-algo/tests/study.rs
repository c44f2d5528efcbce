use std::cell::RefCell;
use std::path::{Path, PathBuf};

use elcc_algo::{
    run_study, CancelToken, Providers, RandomStream, StudyConfig, StudyRequest, SystemSource,
};
use elcc_core::{
    CandidateGenerator, CapacityFactorGrid, CapacityFactorGrids, CapacityFactorProvider,
    ConventionalFleet, ConventionalUnit, ElccError, ElccResult, FleetFilter, FleetProvider,
    FleetSnapshot, LoadProvider, LoadSeries, MatrixStore, Megawatts, RenewableSite, ResourceKind,
    SimulatedCapacityMatrix,
};

const HOURS: usize = 48;

struct Fixture {
    load: Vec<f64>,
    saved: RefCell<Option<SimulatedCapacityMatrix>>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            load: (0..HOURS).map(|h| 900.0 + 10.0 * (h % 24) as f64).collect(),
            saved: RefCell::new(None),
        }
    }

    fn providers(&self) -> Providers<'_> {
        Providers {
            capacity_factors: self,
            load: self,
            fleet: self,
            matrices: self,
        }
    }
}

impl CapacityFactorProvider for Fixture {
    fn capacity_factors(&self) -> ElccResult<CapacityFactorGrids> {
        let lats = vec![35.0, 40.0];
        let lons = vec![-105.0, -100.0];
        let solar = CapacityFactorGrid::uniform(lats.clone(), lons.clone(), HOURS, 0.4)?;
        let wind = CapacityFactorGrid::uniform(lats, lons, HOURS, 0.3)?;
        CapacityFactorGrids::new(solar, wind)
    }
}

impl LoadProvider for Fixture {
    fn hourly_load(&self, _year: i32) -> ElccResult<LoadSeries> {
        LoadSeries::new(self.load.clone())
    }
}

impl FleetProvider for Fixture {
    fn fleet(&self, filter: &FleetFilter) -> ElccResult<FleetSnapshot> {
        if filter.code() != "TEST" {
            return Err(ElccError::Input(format!("unknown region {filter}")));
        }
        let units = (0..30)
            .map(|i| ConventionalUnit::new(Megawatts(60.0), 1950 + i))
            .collect();
        Ok(FleetSnapshot {
            conventional: ConventionalFleet::new(units),
            solar: vec![RenewableSite::new(Megawatts(100.0), 36.0, -104.0)],
            wind: vec![],
        })
    }
}

impl MatrixStore for Fixture {
    fn save(&self, dir: &Path, matrix: &SimulatedCapacityMatrix) -> ElccResult<PathBuf> {
        *self.saved.borrow_mut() = Some(matrix.clone());
        Ok(dir.join("system-0-saved.csv"))
    }

    fn load(&self, _path: &Path) -> ElccResult<SimulatedCapacityMatrix> {
        self.saved
            .borrow()
            .clone()
            .ok_or_else(|| ElccError::Input("nothing saved".into()))
    }
}

fn request(kind: ResourceKind, capacity: f64) -> StudyRequest {
    StudyRequest {
        year: 2019,
        trials: 50,
        filter: FleetFilter::NercRegion("TEST".into()),
        conventional_efor: 0.05,
        vg_efor: 0.05,
        derate_conventional: false,
        floor_year: None,
        candidate: CandidateGenerator {
            kind,
            capacity: Megawatts(capacity),
            latitude: 38.0,
            longitude: -101.0,
            forced_outage_rate: 0.05,
        },
        system: SystemSource::Simulate,
    }
}

#[test]
fn test_study_reports_elcc_within_nameplate() {
    let fixture = Fixture::new();
    let report = run_study(
        &request(ResourceKind::Conventional, 100.0),
        &StudyConfig::default(),
        &fixture.providers(),
        &mut RandomStream::seeded(2024),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(report.elcc.value() >= 0.0 && report.elcc.value() <= 100.0);
    assert_eq!(report.trials, 50);
    assert_eq!(report.seed, Some(2024));
    let calibration = report.calibration.as_ref().unwrap();
    assert!(calibration.remaining_units >= 1 && calibration.remaining_units < 30);
    assert!(calibration.capacity_removed.value() > 0.0);
    assert!(!report.interrupted);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("elcc").is_some());
    assert!(json.get("baseline_lolh").is_some());
}

#[test]
fn test_zero_capacity_candidate_has_zero_elcc() {
    let fixture = Fixture::new();
    let report = run_study(
        &request(ResourceKind::Solar, 0.0),
        &StudyConfig::default(),
        &fixture.providers(),
        &mut RandomStream::seeded(1),
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(report.elcc, Megawatts::ZERO);
}

#[test]
fn test_seeded_study_is_reproducible() {
    let fixture = Fixture::new();
    let run = || {
        run_study(
            &request(ResourceKind::Wind, 150.0),
            &StudyConfig::default(),
            &fixture.providers(),
            &mut RandomStream::seeded(7),
            &CancelToken::new(),
        )
        .unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.elcc, b.elcc);
    assert_eq!(a.baseline_lolh.to_bits(), b.baseline_lolh.to_bits());
}

#[test]
fn test_saved_system_is_reused_without_calibration() {
    let fixture = Fixture::new();
    let mut save = request(ResourceKind::Solar, 80.0);
    save.system = SystemSource::Save(PathBuf::from("systems"));
    let saved = run_study(
        &save,
        &StudyConfig::default(),
        &fixture.providers(),
        &mut RandomStream::seeded(3),
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(saved.system_path, Some(PathBuf::from("systems/system-0-saved.csv")));
    assert!(saved.calibration.is_some());

    let mut load = request(ResourceKind::Solar, 80.0);
    load.trials = 10;
    load.system = SystemSource::Load(PathBuf::from("systems/system-0-saved.csv"));
    let loaded = run_study(
        &load,
        &StudyConfig::default(),
        &fixture.providers(),
        &mut RandomStream::seeded(4),
        &CancelToken::new(),
    )
    .unwrap();
    assert!(loaded.calibration.is_none());
    assert_eq!(loaded.trials, 50);
    assert_eq!(loaded.diagnostics.issues_by_category("input").count(), 1);
}

#[test]
fn test_unknown_region_aborts() {
    let fixture = Fixture::new();
    let mut bad = request(ResourceKind::Solar, 10.0);
    bad.filter = FleetFilter::BalancingAuthority("NOPE".into());
    assert!(run_study(
        &bad,
        &StudyConfig::default(),
        &fixture.providers(),
        &mut RandomStream::seeded(5),
        &CancelToken::new(),
    )
    .is_err());
}

#[test]
fn test_cancelled_study_flags_interruption() {
    let fixture = Fixture::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let report = run_study(
        &request(ResourceKind::Conventional, 50.0),
        &StudyConfig::default(),
        &fixture.providers(),
        &mut RandomStream::seeded(6),
        &cancel,
    )
    .unwrap();
    assert!(report.interrupted);
    assert_eq!(report.search.iterations, 0);
}
