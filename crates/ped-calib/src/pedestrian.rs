//! Observed pedestrians.

use ped_core::SimParams;
use ped_demand::Group;

use crate::{CalibError, CalibResult, GroupIndex};

/// One observed trip: route, departure time and travel time, both in seconds.
///
/// Immutable; used for calibration only.
#[derive(Clone, Debug, PartialEq)]
pub struct Pedestrian {
    route_name:           String,
    route_alternates:     [String; 2],
    dep_time:             f64,
    travel_time_observed: f64,
}

impl Pedestrian {
    pub fn new(
        route_name:           impl Into<String>,
        dep_time:             f64,
        travel_time_observed: f64,
        route_alternates:     [String; 2],
    ) -> Self {
        Self {
            route_name: route_name.into(),
            route_alternates,
            dep_time,
            travel_time_observed,
        }
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// The two auxiliary routes recorded with the observation.
    pub fn route_alternates(&self) -> &[String; 2] {
        &self.route_alternates
    }

    pub fn dep_time(&self) -> f64 {
        self.dep_time
    }

    pub fn travel_time_observed(&self) -> f64 {
        self.travel_time_observed
    }

    /// Departure interval, `floor(dep_time / Δt)`.
    pub fn dep_interval(&self, params: &SimParams) -> i32 {
        params.interval_of(self.dep_time)
    }

    /// Calibration aggregation period of the departure.
    pub fn calib_interval(&self, params: &SimParams) -> i32 {
        params.calib_interval_of(self.dep_time)
    }

    // ── Group matching ────────────────────────────────────────────────────

    /// The simulated group this pedestrian belongs to.
    pub fn corresponding_group<'g>(
        &self,
        groups: &'g [Group],
        index:  &GroupIndex,
        params: &SimParams,
    ) -> CalibResult<&'g Group> {
        let id = index.find(&self.route_name, self.dep_interval(params), self.dep_time)?;
        groups.get(id.index()).ok_or(CalibError::GroupNotFound(id))
    }

    pub fn mean_travel_time_sim(
        &self,
        groups: &[Group],
        index:  &GroupIndex,
        params: &SimParams,
    ) -> CalibResult<f64> {
        Ok(self.corresponding_group(groups, index, params)?.mean_tt_simulated())
    }

    pub fn std_dev_travel_time_sim(
        &self,
        groups: &[Group],
        index:  &GroupIndex,
        params: &SimParams,
    ) -> CalibResult<f64> {
        Ok(self.corresponding_group(groups, index, params)?.std_dev_tt_simulated())
    }

    /// Probability of the observed travel time under the simulated
    /// distribution of the matching group.
    pub fn travel_time_obs_probability(
        &self,
        groups: &[Group],
        index:  &GroupIndex,
        params: &SimParams,
    ) -> CalibResult<f64> {
        let group = self.corresponding_group(groups, index, params)?;
        Ok(group.travel_time_probability(self.travel_time_observed, params.delta_t))
    }

    /// `(observed − simulated mean)²`.  NaN when the group had no arrivals.
    pub fn squared_error(
        &self,
        groups: &[Group],
        index:  &GroupIndex,
        params: &SimParams,
    ) -> CalibResult<f64> {
        let sim = self.mean_travel_time_sim(groups, index, params)?;
        Ok((self.travel_time_observed - sim).powi(2))
    }

    /// One line of the disaggregate table:
    /// `route, depTime, ttObserved, ttSimulatedMean`.
    pub fn disaggregate_record(
        &self,
        groups: &[Group],
        index:  &GroupIndex,
        params: &SimParams,
    ) -> CalibResult<String> {
        let sim = self.mean_travel_time_sim(groups, index, params)?;
        Ok(format!(
            "{}, {:?}, {:?}, {:?}",
            self.route_name, self.dep_time, self.travel_time_observed, sim
        ))
    }
}
