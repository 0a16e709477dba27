use thiserror::Error;

use ped_calib::CalibError;
use ped_core::CoreError;
use ped_demand::DemandError;
use ped_network::NetworkError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Demand(#[from] DemandError),

    #[error(transparent)]
    Calib(#[from] CalibError),

    /// Raised by a [`FlowModel`](crate::FlowModel) implementation.
    #[error("flow model error at step {step}: {reason}")]
    Flow { step: i32, reason: String },
}

pub type SimResult<T> = Result<T, SimError>;
