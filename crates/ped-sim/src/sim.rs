//! The `Scenario` struct and its step loop.

use ped_calib::{CalibrationSummary, GroupIndex, Pedestrian, calibrate};
use ped_core::{BlockageRegistry, SimParams};
use ped_demand::Group;
use ped_network::{BlockageCost, IdentityCost, NoopHook, PedNetwork, PotentialEngine, PotentialField};

use crate::{FlowModel, ScenarioObserver, SimError, SimResult};

// ── ScenarioOutcome ───────────────────────────────────────────────────────────

/// Summary returned by [`Scenario::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioOutcome {
    pub name: String,
    /// Steps simulated.
    pub steps: u32,
    pub groups: usize,
    /// Groups in which nobody arrived.
    pub degenerate_groups: usize,
    /// Present when the scenario carries observed pedestrians.
    pub calibration: Option<CalibrationSummary>,
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// One self-contained simulation: network, blockages, demand and
/// observations, plus the potential field that is rebuilt every step.
///
/// Each step runs:
///
/// 1. **Potentials**: every route's node potentials for the step.
/// 2. **Observer**: [`ScenarioObserver::on_potentials_settled`].
/// 3. **Flow**: [`FlowModel::advance`] moves people and records arrivals.
///
/// After the last step, travel-time statistics are computed for every group
/// and, if pedestrians were supplied, the scenario is calibrated.
///
/// Scenarios share nothing, so independent scenarios may run concurrently.
/// Create via [`ScenarioBuilder`][crate::ScenarioBuilder].
pub struct Scenario<C: BlockageCost = IdentityCost> {
    pub name:        String,
    pub params:      SimParams,
    pub network:     PedNetwork,
    pub blockages:   BlockageRegistry,
    pub groups:      Vec<Group>,
    pub pedestrians: Vec<Pedestrian>,
    /// Potentials of the most recent step.
    pub field:       PotentialField,

    pub(crate) engine:    PotentialEngine<C>,
    pub(crate) started:   bool,
    pub(crate) completed: bool,
}

impl<C: BlockageCost> Scenario<C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every step of the horizon, then compute statistics and calibrate.
    ///
    /// A scenario runs once, even if that run failed part-way: the groups
    /// keep whatever arrivals were recorded before the failure.
    pub fn run<F: FlowModel, O: ScenarioObserver>(
        &mut self,
        flow:     &mut F,
        observer: &mut O,
    ) -> SimResult<ScenarioOutcome> {
        if self.started {
            return Err(SimError::Config(format!("scenario {} has already run", self.name)));
        }
        let steps = i32::try_from(self.params.total_intervals).map_err(|_| {
            SimError::Config(format!("total_intervals {} out of range", self.params.total_intervals))
        })?;

        log::info!(
            "scenario {}: {} steps, {} routes, {} groups",
            self.name,
            steps,
            self.network.route_count(),
            self.groups.len()
        );

        self.started = true;
        for step in 0..steps {
            observer.on_step_start(step);
            self.process_step(step, flow, observer)?;
            observer.on_step_end(step);
        }
        self.completed = true;

        let outcome = self.finish()?;
        observer.on_scenario_end(&outcome);
        log::info!(
            "scenario {} finished: {} of {} groups without arrivals",
            self.name, outcome.degenerate_groups, outcome.groups
        );
        Ok(outcome)
    }

    /// One line per group: `route, depTime, numPeople, meanTTSimulated`.
    pub fn aggregated_records(&self) -> Vec<String> {
        self.groups.iter().map(Group::aggregated_record).collect()
    }

    /// One line per observed pedestrian:
    /// `route, depTime, ttObserved, ttSimulatedMean`.
    pub fn disaggregate_records(&self) -> SimResult<Vec<String>> {
        let index = GroupIndex::build(&self.groups);
        self.pedestrians
            .iter()
            .map(|p| p.disaggregate_record(&self.groups, &index, &self.params).map_err(SimError::from))
            .collect()
    }

    /// Whether `run` has been called, successful or not.
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    // ── Step processing ───────────────────────────────────────────────────

    fn process_step<F: FlowModel, O: ScenarioObserver>(
        &mut self,
        step:     i32,
        flow:     &mut F,
        observer: &mut O,
    ) -> SimResult<()> {
        self.engine.compute_all_node_potentials(
            &self.network,
            &self.blockages,
            step,
            &mut self.field,
            &mut NoopHook,
        )?;
        observer.on_potentials_settled(step, &self.network, &self.field);
        flow.advance(step, &self.network, &self.field, &mut self.groups)
    }

    fn finish(&mut self) -> SimResult<ScenarioOutcome> {
        let delta_t = self.params.delta_t;
        let degenerate_groups = self
            .groups
            .iter_mut()
            .map(|g| g.compute_travel_time_stats(delta_t))
            .filter(|s| s.is_degenerate())
            .count();

        let calibration = if self.pedestrians.is_empty() {
            None
        } else {
            Some(calibrate(&self.pedestrians, &self.groups, &self.params)?)
        };

        Ok(ScenarioOutcome {
            name: self.name.clone(),
            steps: self.params.total_intervals,
            groups: self.groups.len(),
            degenerate_groups,
            calibration,
        })
    }
}
