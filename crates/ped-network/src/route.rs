//! Route descriptors.

use std::collections::BTreeSet;

use ped_core::{LinkId, NodeId};

use crate::{NetworkError, NetworkResult};

/// A pedestrian route: an ordered zone sequence plus the graph elements that
/// belong to it.
///
/// `route_nodes` is filled incrementally by the topology loader and must
/// contain `destination_node` once the network is built.  It is a `BTreeSet`
/// so that potential computation visits nodes in ascending `NodeId` order.
#[derive(Clone, Debug)]
pub struct Route {
    name:              String,
    zone_sequence:     Vec<String>,
    source_link:       LinkId,
    sink_link:         LinkId,
    origin_node:       NodeId,
    destination_node:  NodeId,
    route_nodes:       BTreeSet<NodeId>,
    distance:          f64,
    critical_velocity: f64,
}

impl Route {
    /// Create a route from its zone sequence and static distance (metres).
    pub fn new(
        name:          impl Into<String>,
        zone_sequence: Vec<String>,
        distance:      f64,
    ) -> NetworkResult<Self> {
        let name = name.into();
        if zone_sequence.is_empty() {
            return Err(NetworkError::EmptyZoneSequence { route: name });
        }
        Ok(Self {
            name,
            zone_sequence,
            source_link:       LinkId::INVALID,
            sink_link:         LinkId::INVALID,
            origin_node:       NodeId::INVALID,
            destination_node:  NodeId::INVALID,
            route_nodes:       BTreeSet::new(),
            distance,
            critical_velocity: 0.0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone_sequence(&self) -> &[String] {
        &self.zone_sequence
    }

    pub fn origin_zone(&self) -> &str {
        // Non-empty by construction.
        &self.zone_sequence[0]
    }

    pub fn destination_zone(&self) -> &str {
        &self.zone_sequence[self.zone_sequence.len() - 1]
    }

    // ── Topology wiring ───────────────────────────────────────────────────

    pub fn source_link(&self) -> LinkId {
        self.source_link
    }

    pub fn set_source_link(&mut self, link: LinkId) {
        self.source_link = link;
    }

    pub fn sink_link(&self) -> LinkId {
        self.sink_link
    }

    pub fn set_sink_link(&mut self, link: LinkId) {
        self.sink_link = link;
    }

    pub fn origin_node(&self) -> NodeId {
        self.origin_node
    }

    pub fn set_origin_node(&mut self, node: NodeId) {
        self.origin_node = node;
    }

    pub fn destination_node(&self) -> NodeId {
        self.destination_node
    }

    /// Set the destination and add it to the route's node set.
    pub fn set_destination_node(&mut self, node: NodeId) {
        self.destination_node = node;
        self.route_nodes.insert(node);
    }

    pub fn route_nodes(&self) -> &BTreeSet<NodeId> {
        &self.route_nodes
    }

    pub fn add_route_node(&mut self, node: NodeId) {
        self.route_nodes.insert(node);
    }

    // ── Route-choice attributes ───────────────────────────────────────────

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    /// Critical velocity measured on the route by the flow model.
    pub fn critical_velocity(&self) -> f64 {
        self.critical_velocity
    }

    pub fn set_critical_velocity(&mut self, velocity: f64) {
        self.critical_velocity = velocity;
    }
}
