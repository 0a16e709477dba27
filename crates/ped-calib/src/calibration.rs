//! Goodness-of-fit over all observed pedestrians.
//!
//! Pedestrians whose group had no arrivals contribute nothing to the sums;
//! they are counted in `excluded_degenerate` instead.  A pedestrian without a
//! matching group aborts the whole calibration.

use std::collections::BTreeMap;

use ped_core::SimParams;
use ped_demand::Group;

use crate::{CalibResult, GroupIndex, Pedestrian};

// ── CalibrationSummary ────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CalibrationSummary {
    /// Pedestrians examined.
    pub pedestrians: usize,
    /// Pedestrians that contributed to the sums.
    pub used: usize,
    /// Pedestrians matched to a group with no arrivals.
    pub excluded_degenerate: usize,
    /// Σ (observed − simulated mean)², seconds².
    pub sum_squared_error: f64,
    /// Σ ln P(observed travel time).
    pub log_likelihood: f64,
}

impl CalibrationSummary {
    /// Root mean squared error over used pedestrians; NaN if none.
    pub fn rmse(&self) -> f64 {
        if self.used == 0 {
            f64::NAN
        } else {
            (self.sum_squared_error / self.used as f64).sqrt()
        }
    }
}

/// Compare every pedestrian with its simulated group.
///
/// Group statistics must already be computed.
pub fn calibrate(
    pedestrians: &[Pedestrian],
    groups:      &[Group],
    params:      &SimParams,
) -> CalibResult<CalibrationSummary> {
    let index = GroupIndex::build(groups);
    let mut summary = CalibrationSummary { pedestrians: pedestrians.len(), ..Default::default() };

    for ped in pedestrians {
        let group = ped.corresponding_group(groups, &index, params)?;
        if group.stats().is_none_or(|s| s.is_degenerate()) {
            summary.excluded_degenerate += 1;
            continue;
        }
        let err = ped.travel_time_observed() - group.mean_tt_simulated();
        summary.sum_squared_error += err * err;
        summary.log_likelihood += group
            .travel_time_probability(ped.travel_time_observed(), params.delta_t)
            .ln();
        summary.used += 1;
    }

    if summary.excluded_degenerate > 0 {
        log::warn!(
            "{} of {} pedestrians matched groups without arrivals",
            summary.excluded_degenerate, summary.pedestrians
        );
    }
    Ok(summary)
}

// ── Observed aggregates ───────────────────────────────────────────────────────

/// Observed travel times of one route within one calibration period.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObservedAggregate {
    pub count:   usize,
    pub mean_tt: f64,
}

/// Group observations by `(route, calibration period)`.
pub fn aggregate_observed(
    pedestrians: &[Pedestrian],
    params:      &SimParams,
) -> BTreeMap<(String, i32), ObservedAggregate> {
    let mut sums: BTreeMap<(String, i32), (usize, f64)> = BTreeMap::new();
    for ped in pedestrians {
        let entry = sums
            .entry((ped.route_name().to_owned(), ped.calib_interval(params)))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += ped.travel_time_observed();
    }
    sums.into_iter()
        .map(|(key, (count, total))| (key, ObservedAggregate { count, mean_tt: total / count as f64 }))
        .collect()
}
