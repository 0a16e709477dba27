use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("route {0:?} is not in the route catalog")]
    UnknownRoute(String),

    #[error("group on route {0:?} has no route options")]
    NoRouteOptions(String),

    /// Utilities must be finite with a positive sum for the split to be
    /// defined.
    #[error("route choice utilities for {route:?} are degenerate: {utilities:?}")]
    DegenerateUtilities { route: String, utilities: Vec<f64> },
}

pub type DemandResult<T> = Result<T, DemandError>;
