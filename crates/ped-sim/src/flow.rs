//! The flow-update seam.
//!
//! Cell densities, sending and receiving capacities, and the per-node route
//! split live outside this workspace.  A [`FlowModel`] receives the settled
//! potentials of each step and reports arrivals back into the groups with
//! [`Group::add_travel_time`].

use ped_demand::Group;
use ped_network::{PedNetwork, PotentialField};

use crate::SimResult;

/// Advances pedestrian flow by one time interval.
///
/// Called once per step, after potentials for that step are settled.  The
/// `Send` bound lets batches run scenarios on worker threads.
pub trait FlowModel: Send {
    fn advance(
        &mut self,
        step:    i32,
        network: &PedNetwork,
        field:   &PotentialField,
        groups:  &mut [Group],
    ) -> SimResult<()>;
}

/// A [`FlowModel`] that moves nobody.  Every group ends degenerate.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopFlow;

impl FlowModel for NoopFlow {
    fn advance(&mut self, _: i32, _: &PedNetwork, _: &PotentialField, _: &mut [Group]) -> SimResult<()> {
        Ok(())
    }
}
