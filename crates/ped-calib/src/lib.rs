//! `ped-calib` — calibration against observed pedestrians.
//!
//! Every observed [`Pedestrian`] belongs to exactly one simulated group: the
//! one on the same route whose departure interval contains the pedestrian's
//! departure time.  [`GroupIndex`] resolves that match and refuses to guess
//! when there is none or more than one.
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`pedestrian`]  | `Pedestrian` and its per-trip error terms               |
//! | [`index`]       | `GroupIndex` — `(route, dep interval)` → `GroupId`      |
//! | [`calibration`] | `calibrate`, `CalibrationSummary`, observed aggregates  |
//! | [`error`]       | `CalibError`, `CalibResult<T>`                          |

pub mod calibration;
pub mod error;
pub mod index;
pub mod pedestrian;

#[cfg(test)]
mod tests;

pub use calibration::{CalibrationSummary, ObservedAggregate, aggregate_observed, calibrate};
pub use error::{CalibError, CalibResult};
pub use index::GroupIndex;
pub use pedestrian::Pedestrian;
