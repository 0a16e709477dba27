//! Logit route choice.
//!
//! Each route option `r` of a group gets the utility
//!
//! ```text
//! U(r) = exp(alpha * v_crit(r) / d(r) + beta * d(r))
//! P(r) = U(r) / Σ U
//! ```
//!
//! and the group is split into one group per option with `P(r)` of the
//! population.  The option matching the group's own route comes first in the
//! result; downstream demand generation relies on that position.

use std::collections::HashMap;
use std::hash::BuildHasher;

use ped_core::ChoiceCoefficients;
use ped_network::{PedNetwork, Route};

use crate::{DemandError, DemandResult, Group};

// ── RouteCatalog ──────────────────────────────────────────────────────────────

/// Name-based route lookup used by the choice model.
pub trait RouteCatalog {
    fn route(&self, name: &str) -> Option<&Route>;
}

impl RouteCatalog for PedNetwork {
    fn route(&self, name: &str) -> Option<&Route> {
        self.route_by_name(name)
    }
}

impl<S: BuildHasher> RouteCatalog for HashMap<String, Route, S> {
    fn route(&self, name: &str) -> Option<&Route> {
        self.get(name)
    }
}

// ── Utilities ─────────────────────────────────────────────────────────────────

/// Logit utility of `route`.
#[inline]
pub fn route_utility(route: &Route, coeffs: &ChoiceCoefficients) -> f64 {
    let d = route.distance();
    (coeffs.alpha * route.critical_velocity() / d + coeffs.beta * d).exp()
}

/// Choice probabilities for `options`, in option order.
///
/// Fails if an option is missing from the catalog, or if the utilities are not
/// all finite with a positive sum.
pub fn choice_probabilities<C: RouteCatalog + ?Sized>(
    origin:  &str,
    options: &[String],
    catalog: &C,
    coeffs:  &ChoiceCoefficients,
) -> DemandResult<Vec<f64>> {
    if options.is_empty() {
        return Err(DemandError::NoRouteOptions(origin.to_owned()));
    }

    let utilities = options
        .iter()
        .map(|name| {
            catalog
                .route(name)
                .map(|r| route_utility(r, coeffs))
                .ok_or_else(|| DemandError::UnknownRoute(name.clone()))
        })
        .collect::<DemandResult<Vec<f64>>>()?;

    let total: f64 = utilities.iter().sum();
    if !(utilities.iter().all(|u| u.is_finite()) && total.is_finite() && total > 0.0) {
        return Err(DemandError::DegenerateUtilities { route: origin.to_owned(), utilities });
    }

    Ok(utilities.into_iter().map(|u| u / total).collect())
}

// ── Splitting ─────────────────────────────────────────────────────────────────

/// Split `group` across its route options.
///
/// The returned groups share `group`'s option list and departure interval; the
/// one on `group`'s own route is first, the rest follow in option order.
pub fn split_by_stochastic_choice<C: RouteCatalog + ?Sized>(
    group:   &Group,
    catalog: &C,
    coeffs:  &ChoiceCoefficients,
) -> DemandResult<Vec<Group>> {
    let options = group.route_options();
    let probs = choice_probabilities(group.route_name(), options, catalog, coeffs)?;
    let total = group.num_people();

    let mut split: Vec<Group> = Vec::with_capacity(options.len());
    for (name, p) in options.iter().zip(&probs) {
        let g = Group::with_options(name.clone(), group.dep_time(), p * total, options.clone());
        if name == group.route_name() {
            split.insert(0, g);
        } else {
            split.push(g);
        }
    }

    log::debug!(
        "split {:?} group at {} over {:?}: {:?}",
        group.route_name(),
        group.dep_time(),
        options,
        probs
    );
    Ok(split)
}

/// Apply [`split_by_stochastic_choice`] to every group with more than one
/// route option; single-option groups pass through unchanged.
pub fn split_demand<C: RouteCatalog + ?Sized>(
    groups:  Vec<Group>,
    catalog: &C,
    coeffs:  &ChoiceCoefficients,
) -> DemandResult<Vec<Group>> {
    let mut out = Vec::with_capacity(groups.len());
    for g in groups {
        if g.route_options().len() > 1 {
            out.extend(split_by_stochastic_choice(&g, catalog, coeffs)?);
        } else {
            out.push(g);
        }
    }
    Ok(out)
}
