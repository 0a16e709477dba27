//! `ped-sim` — scenario runner for the pedestrian route engine.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..params.total_intervals:
//!   ① Potentials — PotentialEngine recomputes every route's node potentials
//!                  under the blockages active at this step.
//!   ② Observe    — ScenarioObserver::on_potentials_settled.
//!   ③ Flow       — FlowModel::advance moves people and records arrivals
//!                  into the groups' travel-time histograms.
//! afterwards:
//!   ④ Statistics — mean / std dev / rel loss for every group.
//!   ⑤ Calibrate  — observed pedestrians against their groups (if any).
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | [`run_batch`] runs scenarios on Rayon's thread pool.    |
//! | `serde`    | serde derives on parameters, ids and blockages.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ped_sim::{NoopObserver, ScenarioBuilder};
//!
//! let mut scenario = ScenarioBuilder::new("base", params, network)
//!     .groups(demand)
//!     .build()?;
//! let outcome = scenario.run(&mut my_flow, &mut NoopObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod error;
pub mod flow;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use batch::run_batch;
pub use builder::ScenarioBuilder;
pub use error::{SimError, SimResult};
pub use flow::{FlowModel, NoopFlow};
pub use observer::{NoopObserver, ScenarioObserver};
pub use sim::{Scenario, ScenarioOutcome};
