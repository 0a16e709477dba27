//! `ped-network` — pedestrian network, routes, and route potentials.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`network`]   | `PedNetwork` (CSR links + route catalog), `NetworkBuilder`   |
//! | [`route`]     | `Route` — zone sequence, node set, distance, critical speed  |
//! | [`potential`] | `PotentialField`, `PotentialEngine`, cost and hook traits    |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                           |
//!
//! # Potentials
//!
//! Every route gets its own potential at every node: the minimum relative
//! travel time from the node to the route's destination.  Potentials are
//! recomputed at every time step because blockages switch on and off.

pub mod error;
pub mod network;
pub mod potential;
pub mod route;


pub use error::{NetworkError, NetworkResult};
pub use network::{NetworkBuilder, PedNetwork};
pub use potential::{
    BlockageCost, IdentityCost, NoopHook, PotentialEngine, PotentialField, PotentialHook,
    ProportionalCost, SOURCE_SINK_POTENTIAL, UNREACHED,
};
pub use route::Route;
