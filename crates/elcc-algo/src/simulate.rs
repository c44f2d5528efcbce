//! Monte Carlo outage simulation of the existing fleet.
//!
//! Every unit is an independent Bernoulli outage per (hour, trial). A
//! conventional unit delivers its full capacity when its draw exceeds the
//! fleet outage rate; a solar or wind unit delivers `capacity * cf[hour]` when
//! its outage rate is below its draw. The result is the total available
//! capacity for every (hour, trial) cell.
//!
//! Hours are simulated in parallel with rayon. Each hour consumes its own
//! random stream in trial order, and trials are processed in batches of at
//! most `max_batch_trials`, so neither the thread count nor the batch size
//! changes the output.
//!
//! Draws are consumed one cell at a time, so scratch memory is constant per
//! cell and the only large allocation is the `hours * trials` result itself.
//! The batch size does not bound memory; it bounds the work done per
//! parallel pass over the hours.

use elcc_core::{
    validate_outage_rate, CapacityFactorGrid, CapacityFactorGrids, ConventionalFleet, ElccError,
    ElccResult, RenewableFleet, SimulatedCapacityMatrix,
};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use crate::rng::{hour_rng, RandomStream};

/// Upper bound on the trials advanced per parallel pass over the hours.
/// Memory use does not depend on it.
pub const DEFAULT_MAX_BATCH_TRIALS: usize = 1000;

/// Existing solar and wind units, already placed on grid cells.
#[derive(Debug, Clone, Default)]
pub struct VariableFleet {
    pub solar: RenewableFleet,
    pub wind: RenewableFleet,
}

impl VariableFleet {
    pub fn new(solar: RenewableFleet, wind: RenewableFleet) -> Self {
        Self { solar, wind }
    }

    pub fn len(&self) -> usize {
        self.solar.len() + self.wind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A renewable unit with its capacity-factor profile resolved.
struct ProfiledUnit<'g> {
    capacity: f64,
    forced_outage_rate: f64,
    profile: &'g [f64],
}

fn profiled<'g>(
    fleet: &RenewableFleet,
    grid: &'g CapacityFactorGrid,
    what: &str,
) -> ElccResult<Vec<ProfiledUnit<'g>>> {
    fleet
        .units()
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            if !grid.contains(unit.grid_row, unit.grid_col) {
                let (rows, cols, _) = grid.shape();
                return Err(ElccError::shape(
                    &format!("{what} unit {i} grid cell"),
                    format!("row < {rows}, col < {cols}"),
                    format!("({}, {})", unit.grid_row, unit.grid_col),
                ));
            }
            Ok(ProfiledUnit {
                capacity: unit.capacity.value(),
                forced_outage_rate: unit.forced_outage_rate,
                profile: grid.profile(unit.grid_row, unit.grid_col),
            })
        })
        .collect()
}

/// Simulates available capacity of a conventional fleet plus a VG fleet.
#[derive(Debug, Clone)]
pub struct FleetSimulator<'a> {
    grids: &'a CapacityFactorGrids,
    conventional_efor: f64,
    max_batch_trials: usize,
}

impl<'a> FleetSimulator<'a> {
    pub fn new(grids: &'a CapacityFactorGrids, conventional_efor: f64) -> ElccResult<Self> {
        validate_outage_rate(conventional_efor, "conventional")?;
        Ok(Self {
            grids,
            conventional_efor,
            max_batch_trials: DEFAULT_MAX_BATCH_TRIALS,
        })
    }

    pub fn with_max_batch_trials(mut self, max_batch_trials: usize) -> Self {
        self.max_batch_trials = max_batch_trials.max(1);
        self
    }

    pub fn hours(&self) -> usize {
        self.grids.hours()
    }

    pub fn conventional_efor(&self) -> f64 {
        self.conventional_efor
    }

    /// Draw a `[hour][trial]` matrix of available capacity.
    ///
    /// Takes one call seed from `rng`; the fleets are only read.
    pub fn simulate(
        &self,
        fleet: &ConventionalFleet,
        vg: &VariableFleet,
        trials: usize,
        rng: &mut RandomStream,
    ) -> ElccResult<SimulatedCapacityMatrix> {
        if trials == 0 {
            return Err(ElccError::Input("trial count must be at least 1".into()));
        }
        let solar = profiled(&vg.solar, &self.grids.solar, "solar")?;
        let wind = profiled(&vg.wind, &self.grids.wind, "wind")?;
        let conventional: Vec<f64> = fleet.units().iter().map(|u| u.capacity.value()).collect();

        let hours = self.hours();
        let call_seed = rng.next_call_seed();
        let mut streams: Vec<StdRng> = (0..hours).map(|hour| hour_rng(call_seed, hour)).collect();
        let mut data = vec![0.0; hours * trials];

        let mut start = 0;
        while start < trials {
            let end = (start + self.max_batch_trials).min(trials);
            data.par_chunks_mut(trials)
                .zip(streams.par_iter_mut())
                .enumerate()
                .for_each(|(hour, (row, stream))| {
                    for cell in &mut row[start..end] {
                        *cell = self.draw_cell(hour, &conventional, &solar, &wind, stream);
                    }
                });
            start = end;
        }

        SimulatedCapacityMatrix::from_vec(hours, trials, data)
    }

    fn draw_cell(
        &self,
        hour: usize,
        conventional: &[f64],
        solar: &[ProfiledUnit<'_>],
        wind: &[ProfiledUnit<'_>],
        stream: &mut StdRng,
    ) -> f64 {
        let mut total = 0.0;
        for &capacity in conventional {
            if stream.gen::<f64>() > self.conventional_efor {
                total += capacity;
            }
        }
        for unit in solar.iter().chain(wind) {
            let draw: f64 = stream.gen();
            if unit.forced_outage_rate < draw {
                total += unit.capacity * unit.profile[hour];
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elcc_core::{ConventionalUnit, Megawatts, RenewableUnit};

    fn grids(hours: usize, solar_cf: f64) -> CapacityFactorGrids {
        let solar = CapacityFactorGrid::uniform(vec![0.0, 1.0], vec![0.0, 1.0], hours, solar_cf).unwrap();
        let wind = CapacityFactorGrid::uniform(vec![0.0, 1.0], vec![0.0, 1.0], hours, 0.0).unwrap();
        CapacityFactorGrids::new(solar, wind).unwrap()
    }

    fn fleet(capacities: &[f64]) -> ConventionalFleet {
        ConventionalFleet::new(
            capacities
                .iter()
                .map(|&c| ConventionalUnit::new(Megawatts(c), 1990))
                .collect(),
        )
    }

    #[test]
    fn test_perfect_fleet_is_deterministic() {
        let grids = grids(4, 0.5);
        let sim = FleetSimulator::new(&grids, 0.0).unwrap();
        let vg = VariableFleet::new(
            RenewableFleet::new(vec![RenewableUnit::new(Megawatts(20.0), 1, 0, 0.0)]),
            RenewableFleet::empty(),
        );
        let matrix = sim
            .simulate(&fleet(&[100.0, 50.0]), &vg, 3, &mut RandomStream::seeded(1))
            .unwrap();
        assert_eq!((matrix.hours(), matrix.trials()), (4, 3));
        assert!(matrix.as_slice().iter().all(|&v| v == 160.0));
    }

    #[test]
    fn test_certain_outage_removes_capacity() {
        let grids = grids(2, 1.0);
        let sim = FleetSimulator::new(&grids, 1.0).unwrap();
        let vg = VariableFleet::new(
            RenewableFleet::new(vec![RenewableUnit::new(Megawatts(20.0), 0, 0, 1.0)]),
            RenewableFleet::empty(),
        );
        let matrix = sim
            .simulate(&fleet(&[100.0]), &vg, 5, &mut RandomStream::seeded(2))
            .unwrap();
        assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_availability_tracks_outage_rate() {
        let grids = grids(200, 0.0);
        let sim = FleetSimulator::new(&grids, 0.25).unwrap();
        let matrix = sim
            .simulate(&fleet(&[1.0]), &VariableFleet::default(), 50, &mut RandomStream::seeded(3))
            .unwrap();
        let availability = matrix.mean();
        assert!((availability - 0.75).abs() < 0.02, "availability {availability}");
    }

    #[test]
    fn test_unit_outside_grid_is_shape_error() {
        let grids = grids(2, 0.5);
        let sim = FleetSimulator::new(&grids, 0.0).unwrap();
        let vg = VariableFleet::new(
            RenewableFleet::empty(),
            RenewableFleet::new(vec![RenewableUnit::new(Megawatts(5.0), 0, 7, 0.0)]),
        );
        let err = sim
            .simulate(&fleet(&[1.0]), &vg, 1, &mut RandomStream::seeded(4))
            .unwrap_err();
        assert!(matches!(err, ElccError::Shape(_)));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let grids = grids(2, 0.5);
        let sim = FleetSimulator::new(&grids, 0.0).unwrap();
        assert!(sim
            .simulate(&fleet(&[1.0]), &VariableFleet::default(), 0, &mut RandomStream::seeded(5))
            .is_err());
    }

    #[test]
    fn test_rejects_bad_outage_rate() {
        let grids = grids(2, 0.5);
        assert!(FleetSimulator::new(&grids, -0.1).is_err());
    }
}
