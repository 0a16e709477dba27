//! `ped-demand` — demand groups and route choice.
//!
//! A [`Group`] is a slice of pedestrian demand sharing a route, a departure
//! interval and a route-choice set.  During simulation the flow model reports
//! arriving fragments with [`Group::add_travel_time`]; afterwards
//! [`Group::compute_travel_time_stats`] condenses the histogram.
//!
//! [`split_by_stochastic_choice`] distributes a group's population over its
//! route options with a logit model before the simulation starts.
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`group`]        | `Group`, `TravelTimeStats`                            |
//! | [`route_choice`] | `RouteCatalog`, utilities, probabilities, splitting   |
//! | [`error`]        | `DemandError`, `DemandResult<T>`                      |

pub mod error;
pub mod group;
pub mod route_choice;


pub use error::{DemandError, DemandResult};
pub use group::{GATE_CELL_INTERVALS, Group, MASS_TOLERANCE, NEGLIGIBLE_PROBABILITY, TravelTimeStats};
pub use route_choice::{
    RouteCatalog, choice_probabilities, route_utility, split_by_stochastic_choice, split_demand,
};
