//! Network-subsystem error type.

use thiserror::Error;

use ped_core::{NodeId, RouteId};

/// Errors produced by `ped-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The potential computation ran out of selectable nodes while some were
    /// still unvisited.  Indicates corrupt potentials; the run must stop.
    #[error("invalid next node while computing potentials for route {route}")]
    InvalidNextNode { route: String },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    #[error("unknown route name {0:?}")]
    UnknownRoute(String),

    #[error("duplicate route name {0:?}")]
    DuplicateRoute(String),

    #[error("route {route} has an empty zone sequence")]
    EmptyZoneSequence { route: String },

    #[error("destination {node} of route {route} is not on the route")]
    DestinationNotOnRoute { route: String, node: NodeId },

    #[error("potential field is {routes}x{nodes}, network is {expected_routes}x{expected_nodes}")]
    FieldShape {
        routes:          usize,
        nodes:           usize,
        expected_routes: usize,
        expected_nodes:  usize,
    },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
