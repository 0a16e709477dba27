//! Calibration error type.

use thiserror::Error;

use ped_core::GroupId;

#[derive(Debug, Error)]
pub enum CalibError {
    /// The observed trip has no simulated counterpart.  Demand and
    /// observations are inconsistent; the run must stop.
    #[error("no corresponding group found for pedestrian (depTime = {dep_time}, routeName = {route})")]
    NoCorrespondingGroup { route: String, dep_time: f64 },

    #[error("{count} groups match route {route} at interval {interval}")]
    AmbiguousGroup { route: String, interval: i32, count: usize },

    #[error("group {0} not found")]
    GroupNotFound(GroupId),
}

pub type CalibResult<T> = Result<T, CalibError>;
