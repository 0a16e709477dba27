//! Route potential fields.
//!
//! The potential of a node for route `r` is the minimum cumulative relative
//! travel time from that node to `r`'s destination.  The flow model reads
//! these values every time step to move pedestrians downhill.
//!
//! # Algorithm
//!
//! Label-setting shortest paths restricted to the route's node set, run once
//! per route per time step:
//!
//! 1. all route nodes start at [`UNREACHED`], the destination at 0;
//! 2. repeatedly settle the unvisited node with the lowest potential (ties go
//!    to the first one in ascending `NodeId` order);
//! 3. relax the settled node's outgoing links into still-unvisited nodes;
//! 4. after every round, pin every source/sink node other than the
//!    destination to [`SOURCE_SINK_POTENTIAL`] so that walking paths never
//!    run through another route's entry or exit.
//!
//! Relaxation follows *outgoing* links of the settled node.  Pedestrian cells
//! are traversable both ways, so networks carry links in both directions
//! (see [`NetworkBuilder::add_walkway`][crate::NetworkBuilder::add_walkway]).
//!
//! There is no priority queue: the selection scan is O(V), giving O(R·V²)
//! per step.  Route node sets are small compared to the full network.
//!
//! # Blockages
//!
//! Each candidate potential is passed through a [`BlockageCost`] together with
//! the active blockage percent of the neighbour node.  A node's blockage is
//! looked up through the cell of its *first* outgoing link only; other links
//! of the same node are not inspected.  The default [`IdentityCost`] leaves costs
//! untouched.

use std::collections::BTreeSet;

use ped_core::{BlockageRegistry, BlockageWindow, NodeId, RouteId};

use crate::{NetworkError, NetworkResult, PedNetwork};

/// Initial potential of every route node.
pub const UNREACHED: f64 = f64::INFINITY;

/// Potential forced onto source/sink nodes that are not the route's
/// destination.
pub const SOURCE_SINK_POTENTIAL: f64 = 1.0e10;

// ── PotentialField ────────────────────────────────────────────────────────────

/// Dense `route × node` potential table.
///
/// Row `r` holds the potentials of all nodes for `RouteId(r)`.  Nodes that are
/// not on a route keep [`UNREACHED`] (or the source/sink sentinel).
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialField {
    route_count: usize,
    node_count:  usize,
    values:      Vec<f64>,
}

impl PotentialField {
    pub fn new(route_count: usize, node_count: usize) -> Self {
        Self {
            route_count,
            node_count,
            values: vec![UNREACHED; route_count * node_count],
        }
    }

    /// A field sized for `network`.
    pub fn for_network(network: &PedNetwork) -> Self {
        Self::new(network.route_count(), network.node_count())
    }

    pub fn route_count(&self) -> usize {
        self.route_count
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn get(&self, route: RouteId, node: NodeId) -> f64 {
        self.values[route.index() * self.node_count + node.index()]
    }

    #[inline]
    pub fn set(&mut self, route: RouteId, node: NodeId, potential: f64) {
        self.values[route.index() * self.node_count + node.index()] = potential;
    }

    /// All node potentials of one route, indexed by `NodeId`.
    pub fn route_potentials(&self, route: RouteId) -> &[f64] {
        let start = route.index() * self.node_count;
        &self.values[start..start + self.node_count]
    }

    fn check_shape(&self, network: &PedNetwork) -> NetworkResult<()> {
        if self.route_count != network.route_count() || self.node_count != network.node_count() {
            return Err(NetworkError::FieldShape {
                routes:          self.route_count,
                nodes:           self.node_count,
                expected_routes: network.route_count(),
                expected_nodes:  network.node_count(),
            });
        }
        Ok(())
    }
}

// ── BlockageCost ──────────────────────────────────────────────────────────────

/// Cost modifier applied to every candidate potential.
///
/// `blockage_percent` is the active blockage percent of the neighbour node,
/// `0.0` when the node is not blocked.
pub trait BlockageCost {
    fn adjust(&self, candidate: f64, blockage_percent: f64) -> f64;
}

/// Leaves candidate potentials unchanged.  Default modifier.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityCost;

impl BlockageCost for IdentityCost {
    #[inline(always)]
    fn adjust(&self, candidate: f64, _blockage_percent: f64) -> f64 {
        candidate
    }
}

/// Inflates candidate potentials by `(100 + percent) / 100`.
///
/// Off by default; used to study how blockages would divert route potentials.
#[derive(Copy, Clone, Debug, Default)]
pub struct ProportionalCost;

impl BlockageCost for ProportionalCost {
    #[inline]
    fn adjust(&self, candidate: f64, blockage_percent: f64) -> f64 {
        candidate * (100.0 + blockage_percent) / 100.0
    }
}

// ── PotentialHook ─────────────────────────────────────────────────────────────

/// Callbacks invoked while potentials are computed.
///
/// `on_potentials_settled` is where the flow model precomputes its per-node
/// route-choice denominators.  All methods default to no-ops.
pub trait PotentialHook {
    /// A node's potential for `route` dropped from `previous` to `updated`
    /// during relaxation.
    fn on_relaxed(&mut self, _route: RouteId, _node: NodeId, _previous: f64, _updated: f64) {}

    /// All routes have been processed for this time step.
    fn on_potentials_settled(&mut self, _network: &PedNetwork, _field: &PotentialField) {}
}

/// A [`PotentialHook`] that does nothing.
pub struct NoopHook;

impl PotentialHook for NoopHook {}

// ── PotentialEngine ───────────────────────────────────────────────────────────

/// Computes route potentials for one time step.
///
/// `C` selects the blockage cost modifier at compile time.
pub struct PotentialEngine<C: BlockageCost = IdentityCost> {
    cost:   C,
    window: BlockageWindow,
}

impl PotentialEngine<IdentityCost> {
    pub fn new(window: BlockageWindow) -> Self {
        Self { cost: IdentityCost, window }
    }
}

impl<C: BlockageCost> PotentialEngine<C> {
    pub fn with_cost(cost: C, window: BlockageWindow) -> Self {
        Self { cost, window }
    }

    pub fn window(&self) -> BlockageWindow {
        self.window
    }

    /// Compute potentials for every route at `time_step`, then notify `hook`.
    pub fn compute_all_node_potentials<H: PotentialHook>(
        &self,
        network:   &PedNetwork,
        blockages: &BlockageRegistry,
        time_step: i32,
        field:     &mut PotentialField,
        hook:      &mut H,
    ) -> NetworkResult<()> {
        field.check_shape(network)?;

        for (route, _) in network.routes() {
            self.compute_node_potentials_for_route(network, route, blockages, time_step, field, hook)?;
        }
        log::debug!(
            "potentials settled for {} routes at step {}",
            network.route_count(),
            time_step
        );

        hook.on_potentials_settled(network, field);
        Ok(())
    }

    /// Compute the potential of every node on `route_id` at `time_step`.
    pub fn compute_node_potentials_for_route<H: PotentialHook>(
        &self,
        network:   &PedNetwork,
        route_id:  RouteId,
        blockages: &BlockageRegistry,
        time_step: i32,
        field:     &mut PotentialField,
        hook:      &mut H,
    ) -> NetworkResult<()> {
        field.check_shape(network)?;
        let route = network.route(route_id)?;
        let dest = route.destination_node();

        for &node in route.route_nodes() {
            field.set(route_id, node, UNREACHED);
        }
        field.set(route_id, dest, 0.0);

        let mut unvisited: BTreeSet<NodeId> = route.route_nodes().clone();

        while !unvisited.is_empty() {
            // Lowest potential, first seen in ascending NodeId order.
            let mut next: Option<(NodeId, f64)> = None;
            for &cand in &unvisited {
                let pot = field.get(route_id, cand);
                match next {
                    None if !pot.is_nan() => next = Some((cand, pot)),
                    Some((_, best)) if pot < best => next = Some((cand, pot)),
                    _ => {}
                }
            }

            let Some((node, node_pot)) = next else {
                return Err(NetworkError::InvalidNextNode { route: route.name().to_owned() });
            };
            unvisited.remove(&node);

            for link in network.out_links(node) {
                let neighbor = network.link_to[link.index()];
                if !unvisited.contains(&neighbor) {
                    continue;
                }
                let current = field.get(route_id, neighbor);
                let percent = self.node_blockage_percent(network, neighbor, blockages, time_step);
                let candidate = self
                    .cost
                    .adjust(node_pot + network.link_rel_travel_time[link.index()], percent);

                if candidate < current {
                    field.set(route_id, neighbor, candidate);
                    hook.on_relaxed(route_id, neighbor, current, candidate);
                }
            }

            for &ss in network.source_sink_nodes() {
                if ss != dest {
                    field.set(route_id, ss, SOURCE_SINK_POTENTIAL);
                }
            }
        }
        Ok(())
    }

    /// Active blockage percent of `node` at `time_step`, read through the cell
    /// of the node's first outgoing link.  Zero when the node has no outgoing
    /// link, the cell is not blocked, or the blockage is inactive.
    pub fn node_blockage_percent(
        &self,
        network:   &PedNetwork,
        node:      NodeId,
        blockages: &BlockageRegistry,
        time_step: i32,
    ) -> f64 {
        if blockages.is_empty() {
            return 0.0;
        }
        network
            .first_out_link(node)
            .and_then(|link| {
                blockages.active_percent(&network.link_cell[link.index()], time_step, self.window)
            })
            .unwrap_or(0.0)
    }
}
