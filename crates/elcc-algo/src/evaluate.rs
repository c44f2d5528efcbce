//! Loss-of-load-hours (LOLH) evaluation.
//!
//! For each hour the evaluator adds freshly drawn candidate output to every
//! trial of a simulated capacity matrix and counts the trials that fall
//! strictly below the hour's load plus a constant offset. The hourly shortfall
//! fraction is an expected-hour contribution; LOLH is their sum over the year.

use elcc_core::{
    CapacityFactorGrids, ElccError, ElccResult, LoadSeries, Megawatts, RenewableUnit,
    SimulatedCapacityMatrix,
};
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::rng::{hour_rng, RandomStream};

/// A conventional candidate: full capacity whenever it is not on outage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FirmCandidate {
    pub capacity: Megawatts,
    pub forced_outage_rate: f64,
}

/// Generators superimposed on the simulated fleet during evaluation.
///
/// An empty set evaluates the fleet on its own (the baseline).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateSet {
    pub solar: Option<RenewableUnit>,
    pub wind: Option<RenewableUnit>,
    pub conventional: Option<FirmCandidate>,
}

impl CandidateSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.solar.is_none() && self.wind.is_none() && self.conventional.is_none()
    }

    /// Aggregate nameplate, the upper bound of the ELCC search.
    pub fn total_capacity(&self) -> Megawatts {
        self.solar.map_or(Megawatts::ZERO, |u| u.capacity)
            + self.wind.map_or(Megawatts::ZERO, |u| u.capacity)
            + self.conventional.map_or(Megawatts::ZERO, |u| u.capacity)
    }
}

struct VariableDraw<'g> {
    capacity: f64,
    forced_outage_rate: f64,
    profile: &'g [f64],
}

/// Computes annual LOLH against one load series.
#[derive(Debug, Clone)]
pub struct ReliabilityEvaluator<'a> {
    grids: &'a CapacityFactorGrids,
    load: &'a LoadSeries,
}

impl<'a> ReliabilityEvaluator<'a> {
    /// Pair grids with a load series; both grids must cover the load's hours.
    pub fn new(grids: &'a CapacityFactorGrids, load: &'a LoadSeries) -> ElccResult<Self> {
        grids.solar.expect_hours(load.hours(), "solar capacity factor grid")?;
        grids.wind.expect_hours(load.hours(), "wind capacity factor grid")?;
        Ok(Self { grids, load })
    }

    pub fn hours(&self) -> usize {
        self.load.hours()
    }

    pub fn load(&self) -> &LoadSeries {
        self.load
    }

    /// Probability of shortfall in every hour, in hour order.
    ///
    /// The trial count is `matrix.trials()`. Takes one call seed from `rng`.
    pub fn hourly_risk(
        &self,
        matrix: &SimulatedCapacityMatrix,
        candidates: &CandidateSet,
        offset: Megawatts,
        rng: &mut RandomStream,
    ) -> ElccResult<Vec<f64>> {
        if matrix.hours() != self.hours() {
            return Err(ElccError::shape(
                "capacity matrix hours",
                self.hours(),
                matrix.hours(),
            ));
        }
        let solar = self.resolve(candidates.solar, "solar")?;
        let wind = self.resolve(candidates.wind, "wind")?;
        let firm = candidates.conventional;

        let trials = matrix.trials();
        let call_seed = rng.next_call_seed();
        let offset = offset.value();

        let risk = (0..self.hours())
            .into_par_iter()
            .map(|hour| {
                let mut stream = hour_rng(call_seed, hour);
                let threshold = self.load.get(hour) + offset;
                let mut short = 0usize;
                for &available in matrix.row(hour) {
                    let mut total = available;
                    for unit in solar.iter().chain(wind.iter()) {
                        let draw: f64 = stream.gen();
                        if unit.forced_outage_rate < draw {
                            total += unit.capacity * unit.profile[hour];
                        }
                    }
                    if let Some(unit) = firm {
                        if stream.gen::<f64>() > unit.forced_outage_rate {
                            total += unit.capacity.value();
                        }
                    }
                    if total < threshold {
                        short += 1;
                    }
                }
                short as f64 / trials as f64
            })
            .collect();
        Ok(risk)
    }

    /// Expected annual loss-of-load hours.
    pub fn lolh(
        &self,
        matrix: &SimulatedCapacityMatrix,
        candidates: &CandidateSet,
        offset: Megawatts,
        rng: &mut RandomStream,
    ) -> ElccResult<f64> {
        Ok(self
            .hourly_risk(matrix, candidates, offset, rng)?
            .iter()
            .sum())
    }

    fn resolve(&self, unit: Option<RenewableUnit>, what: &str) -> ElccResult<Option<VariableDraw<'a>>> {
        let Some(unit) = unit else {
            return Ok(None);
        };
        let grids: &'a CapacityFactorGrids = self.grids;
        let grid = if what == "solar" {
            &grids.solar
        } else {
            &grids.wind
        };
        if !grid.contains(unit.grid_row, unit.grid_col) {
            let (rows, cols, _) = grid.shape();
            return Err(ElccError::shape(
                &format!("{what} candidate grid cell"),
                format!("row < {rows}, col < {cols}"),
                format!("({}, {})", unit.grid_row, unit.grid_col),
            ));
        }
        Ok(Some(VariableDraw {
            capacity: unit.capacity.value(),
            forced_outage_rate: unit.forced_outage_rate,
            profile: grid.profile(unit.grid_row, unit.grid_col),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elcc_core::CapacityFactorGrid;

    fn grids(hours: usize, cf: f64) -> CapacityFactorGrids {
        let solar = CapacityFactorGrid::uniform(vec![0.0], vec![0.0], hours, cf).unwrap();
        let wind = CapacityFactorGrid::uniform(vec![0.0], vec![0.0], hours, cf).unwrap();
        CapacityFactorGrids::new(solar, wind).unwrap()
    }

    fn constant(hours: usize, trials: usize, mw: f64) -> SimulatedCapacityMatrix {
        SimulatedCapacityMatrix::from_vec(hours, trials, vec![mw; hours * trials]).unwrap()
    }

    #[test]
    fn test_toy_year() {
        let grids = grids(4, 0.0);
        let load = LoadSeries::new(vec![100.0, 120.0, 90.0, 110.0]).unwrap();
        let eval = ReliabilityEvaluator::new(&grids, &load).unwrap();
        let mut rng = RandomStream::seeded(0);

        let strong = eval.lolh(&constant(4, 3, 150.0), &CandidateSet::none(), Megawatts::ZERO, &mut rng).unwrap();
        assert_eq!(strong, 0.0);

        let weak = eval.lolh(&constant(4, 3, 80.0), &CandidateSet::none(), Megawatts::ZERO, &mut rng).unwrap();
        assert_eq!(weak, 4.0);
    }

    #[test]
    fn test_equal_capacity_is_not_short() {
        let grids = grids(1, 0.0);
        let load = LoadSeries::new(vec![100.0]).unwrap();
        let eval = ReliabilityEvaluator::new(&grids, &load).unwrap();
        let lolh = eval
            .lolh(&constant(1, 2, 100.0), &CandidateSet::none(), Megawatts::ZERO, &mut RandomStream::seeded(1))
            .unwrap();
        assert_eq!(lolh, 0.0);
    }

    #[test]
    fn test_hourly_risk_fractions() {
        let grids = grids(2, 0.0);
        let load = LoadSeries::new(vec![100.0, 100.0]).unwrap();
        let eval = ReliabilityEvaluator::new(&grids, &load).unwrap();
        let matrix = SimulatedCapacityMatrix::from_rows(vec![
            vec![90.0, 110.0, 120.0, 80.0],
            vec![150.0, 150.0, 150.0, 99.0],
        ])
        .unwrap();
        let risk = eval
            .hourly_risk(&matrix, &CandidateSet::none(), Megawatts::ZERO, &mut RandomStream::seeded(2))
            .unwrap();
        assert_eq!(risk, vec![0.5, 0.25]);
    }

    #[test]
    fn test_candidate_and_offset_shift_the_threshold() {
        let grids = grids(4, 0.5);
        let load = LoadSeries::new(vec![100.0; 4]).unwrap();
        let eval = ReliabilityEvaluator::new(&grids, &load).unwrap();
        let matrix = constant(4, 2, 90.0);
        let solar = CandidateSet {
            solar: Some(RenewableUnit::new(Megawatts(40.0), 0, 0, 0.0)),
            ..CandidateSet::none()
        };
        let mut rng = RandomStream::seeded(3);
        assert_eq!(eval.lolh(&matrix, &solar, Megawatts::ZERO, &mut rng).unwrap(), 0.0);
        assert_eq!(eval.lolh(&matrix, &solar, Megawatts(15.0), &mut rng).unwrap(), 4.0);

        let firm = CandidateSet {
            conventional: Some(FirmCandidate {
                capacity: Megawatts(10.0),
                forced_outage_rate: 0.0,
            }),
            ..CandidateSet::none()
        };
        assert_eq!(eval.lolh(&matrix, &firm, Megawatts::ZERO, &mut rng).unwrap(), 0.0);
    }

    #[test]
    fn test_matrix_hours_mismatch_is_shape_error() {
        let grids = grids(4, 0.0);
        let load = LoadSeries::new(vec![1.0; 4]).unwrap();
        let eval = ReliabilityEvaluator::new(&grids, &load).unwrap();
        let err = eval
            .lolh(&constant(3, 1, 5.0), &CandidateSet::none(), Megawatts::ZERO, &mut RandomStream::seeded(4))
            .unwrap_err();
        assert!(matches!(err, ElccError::Shape(_)));
    }

    #[test]
    fn test_grid_hours_mismatch_is_shape_error() {
        let grids = grids(5, 0.0);
        let load = LoadSeries::new(vec![1.0; 4]).unwrap();
        assert!(matches!(
            ReliabilityEvaluator::new(&grids, &load).unwrap_err(),
            ElccError::Shape(_)
        ));
    }

    #[test]
    fn test_candidate_outside_grid_is_shape_error() {
        let grids = grids(4, 0.0);
        let load = LoadSeries::new(vec![1.0; 4]).unwrap();
        let eval = ReliabilityEvaluator::new(&grids, &load).unwrap();
        let wind = CandidateSet {
            wind: Some(RenewableUnit::new(Megawatts(1.0), 3, 0, 0.0)),
            ..CandidateSet::none()
        };
        let err = eval
            .lolh(&constant(4, 1, 5.0), &wind, Megawatts::ZERO, &mut RandomStream::seeded(5))
            .unwrap_err();
        assert!(matches!(err, ElccError::Shape(_)));
    }

    #[test]
    fn test_total_capacity() {
        let set = CandidateSet {
            solar: Some(RenewableUnit::new(Megawatts(30.0), 0, 0, 0.0)),
            conventional: Some(FirmCandidate {
                capacity: Megawatts(20.0),
                forced_outage_rate: 0.1,
            }),
            ..CandidateSet::none()
        };
        assert_eq!(set.total_capacity(), Megawatts(50.0));
        assert!(CandidateSet::none().is_empty());
    }
}
