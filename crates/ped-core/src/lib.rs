//! `ped-core` — foundational types for the pedestrian CTM route engine.
//!
//! This crate is a dependency of every other `ped-*` crate.  It has no
//! `ped-*` dependencies and keeps external ones small (`thiserror`, `log`,
//! `rustc-hash`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `LinkId`, `RouteId`, `GroupId`                  |
//! | [`params`]      | `SimParams`, `ChoiceCoefficients`                         |
//! | [`blockage`]    | `Blockage`, `BlockageWindow`, `BlockageRegistry`          |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, params, blockages.  |

pub mod blockage;
pub mod error;
pub mod ids;
pub mod params;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use blockage::{Blockage, BlockageRegistry, BlockageWindow};
pub use error::{CoreError, CoreResult};
pub use ids::{GroupId, LinkId, NodeId, RouteId};
pub use params::{ChoiceCoefficients, SimParams};
