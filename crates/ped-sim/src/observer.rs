//! Scenario observer trait for progress reporting and data collection.

use ped_network::{PedNetwork, PotentialField};

use crate::ScenarioOutcome;

/// Callbacks invoked by [`Scenario::run`][crate::Scenario::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: potential recorder
///
/// ```rust,ignore
/// struct DestinationWatch { route: RouteId, node: NodeId, seen: Vec<f64> }
///
/// impl ScenarioObserver for DestinationWatch {
///     fn on_potentials_settled(&mut self, _step: i32, _net: &PedNetwork, field: &PotentialField) {
///         self.seen.push(field.get(self.route, self.node));
///     }
/// }
/// ```
pub trait ScenarioObserver {
    /// Called at the start of each step, before potentials are computed.
    fn on_step_start(&mut self, _step: i32) {}

    /// Called once every route's potentials are final for `step`, before the
    /// flow model runs.
    fn on_potentials_settled(
        &mut self,
        _step:    i32,
        _network: &PedNetwork,
        _field:   &PotentialField,
    ) {}

    /// Called after the flow model advanced `step`.
    fn on_step_end(&mut self, _step: i32) {}

    /// Called once after statistics and calibration are done.
    fn on_scenario_end(&mut self, _outcome: &ScenarioOutcome) {}
}

/// A [`ScenarioObserver`] that does nothing.
pub struct NoopObserver;

impl ScenarioObserver for NoopObserver {}
