//! Placement of solar and wind resources on capacity-factor grid cells.
//!
//! A coordinate maps to the first axis entry that is greater than or equal to
//! it. Coordinates past the end of the axis clamp to the last cell, and missing
//! or non-numeric coordinates fall back to cell 0.

use elcc_core::{
    validate_outage_rate, CandidateGenerator, CapacityFactorGrids, ElccResult, RenewableFleet,
    RenewableSite, RenewableUnit, ResourceKind,
};

use crate::evaluate::{CandidateSet, FirmCandidate};

/// Index of the first `axis` value `>= coordinate`, clamped to the last index.
///
/// `axis` must be sorted ascending and non-empty.
pub fn axis_index(axis: &[f64], coordinate: Option<f64>) -> usize {
    match coordinate {
        Some(c) if !c.is_nan() => axis
            .partition_point(|v| *v < c)
            .min(axis.len().saturating_sub(1)),
        _ => 0,
    }
}

/// (row, col) cell of a site on the shared solar/wind grid.
pub fn map_site(site: &RenewableSite, grids: &CapacityFactorGrids) -> (usize, usize) {
    (
        axis_index(grids.lats(), site.latitude),
        axis_index(grids.lons(), site.longitude),
    )
}

/// Map every site of one technology onto the grid with a fleet-wide outage rate.
pub fn map_sites(
    sites: &[RenewableSite],
    grids: &CapacityFactorGrids,
    forced_outage_rate: f64,
) -> ElccResult<RenewableFleet> {
    validate_outage_rate(forced_outage_rate, "variable generation")?;
    let units = sites
        .iter()
        .map(|site| {
            let (row, col) = map_site(site, grids);
            RenewableUnit::new(site.capacity, row, col, forced_outage_rate)
        })
        .collect();
    Ok(RenewableFleet::new(units))
}

/// Turn the candidate description into the generator superimposed by the evaluator.
pub fn map_candidate(
    candidate: &CandidateGenerator,
    grids: &CapacityFactorGrids,
) -> ElccResult<CandidateSet> {
    candidate.validate()?;
    let mut set = CandidateSet::none();
    match candidate.kind {
        ResourceKind::Conventional => {
            set.conventional = Some(FirmCandidate {
                capacity: candidate.capacity,
                forced_outage_rate: candidate.forced_outage_rate,
            });
        }
        kind => {
            let site = RenewableSite::new(candidate.capacity, candidate.latitude, candidate.longitude);
            let (row, col) = map_site(&site, grids);
            let unit = RenewableUnit::new(candidate.capacity, row, col, candidate.forced_outage_rate);
            if kind == ResourceKind::Solar {
                set.solar = Some(unit);
            } else {
                set.wind = Some(unit);
            }
        }
    }
    Ok(set)
}
