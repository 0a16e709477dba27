//! Pedestrian network representation and builder.
//!
//! # Data layout
//!
//! Links are stored in **Compressed Sparse Row (CSR)** order.  The outgoing
//! links of `NodeId n` are
//!
//! ```text
//! link_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! The build sort is stable, so a node's outgoing links keep the order in
//! which they were added.  This matters: blockage lookup samples the cell of
//! a node's *first* outgoing link.
//!
//! # Route catalog
//!
//! Routes are stored densely by `RouteId` with a name index.  Potentials are
//! indexed by the same `RouteId`.

use rustc_hash::{FxHashMap, FxHashSet};

use ped_core::{LinkId, NodeId, RouteId};

use crate::{NetworkError, NetworkResult, Route};

// ── PedNetwork ────────────────────────────────────────────────────────────────

/// Directed pedestrian graph in CSR form plus the route catalog.
///
/// Do not construct directly; use [`NetworkBuilder`].
pub struct PedNetwork {
    // ── CSR link adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Link data (indexed by LinkId = position in sorted order) ──────────
    pub link_from: Vec<NodeId>,
    pub link_to: Vec<NodeId>,
    /// Traversal cost in time-interval units.
    pub link_rel_travel_time: Vec<f64>,
    /// Name of the cell that owns each link.
    pub link_cell: Vec<String>,

    // ── Node flags ────────────────────────────────────────────────────────
    /// Source/sink pseudo-nodes in ascending order.
    source_sink: Vec<NodeId>,

    // ── Routes ────────────────────────────────────────────────────────────
    routes: Vec<Route>,
    route_index: FxHashMap<String, RouteId>,
}

impl PedNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_out_start.len() - 1
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing links of `node`, in insertion order.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> impl Iterator<Item = LinkId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| LinkId(i as u32))
    }

    /// First outgoing link of `node`, if any.
    #[inline]
    pub fn first_out_link(&self, node: NodeId) -> Option<LinkId> {
        self.out_links(node).next()
    }

    pub fn source_sink_nodes(&self) -> &[NodeId] {
        &self.source_sink
    }

    pub fn is_source_sink(&self, node: NodeId) -> bool {
        self.source_sink.binary_search(&node).is_ok()
    }

    // ── Routes ────────────────────────────────────────────────────────────

    pub fn route(&self, id: RouteId) -> NetworkResult<&Route> {
        self.routes.get(id.index()).ok_or(NetworkError::RouteNotFound(id))
    }

    /// Mutable access, used by the flow model to write back critical
    /// velocities.
    pub fn route_mut(&mut self, id: RouteId) -> NetworkResult<&mut Route> {
        self.routes.get_mut(id.index()).ok_or(NetworkError::RouteNotFound(id))
    }

    pub fn route_id(&self, name: &str) -> Option<RouteId> {
        self.route_index.get(name).copied()
    }

    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.route_id(name).map(|id| &self.routes[id.index()])
    }

    /// Iterate `(RouteId, &Route)` in ascending id order.
    pub fn routes(&self) -> impl Iterator<Item = (RouteId, &Route)> + '_ {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, r)| (RouteId(i as u32), r))
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`PedNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ped_network::{NetworkBuilder, Route};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node();
/// let c = b.add_node();
/// b.add_walkway(a, c, 2.0, "cell-ac");
/// let mut route = Route::new("R1", vec!["za".into(), "zc".into()], 10.0).unwrap();
/// route.add_route_node(a);
/// route.set_destination_node(c);
/// b.add_route(route).unwrap();
/// let net = b.build().unwrap();
/// assert_eq!(net.link_count(), 2);
/// ```
pub struct NetworkBuilder {
    node_count:  usize,
    raw_links:   Vec<RawLink>,
    source_sink: FxHashSet<NodeId>,
    routes:      Vec<Route>,
    route_index: FxHashMap<String, RouteId>,
}

struct RawLink {
    from:            NodeId,
    to:              NodeId,
    rel_travel_time: f64,
    cell:            String,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            node_count:  0,
            raw_links:   Vec::new(),
            source_sink: FxHashSet::default(),
            routes:      Vec::new(),
            route_index: FxHashMap::default(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count as u32);
        self.node_count += 1;
        id
    }

    /// Add a source/sink pseudo-node.
    pub fn add_source_sink_node(&mut self) -> NodeId {
        let id = self.add_node();
        self.source_sink.insert(id);
        id
    }

    pub fn mark_source_sink(&mut self, node: NodeId) {
        self.source_sink.insert(node);
    }

    /// Add a **directed** link owned by `cell`.
    pub fn add_link(
        &mut self,
        from:            NodeId,
        to:              NodeId,
        rel_travel_time: f64,
        cell:            impl Into<String>,
    ) {
        self.raw_links.push(RawLink { from, to, rel_travel_time, cell: cell.into() });
    }

    /// Add links in both directions through the same cell.
    pub fn add_walkway(
        &mut self,
        a:               NodeId,
        b:               NodeId,
        rel_travel_time: f64,
        cell:            impl Into<String>,
    ) {
        let cell = cell.into();
        self.add_link(a, b, rel_travel_time, cell.clone());
        self.add_link(b, a, rel_travel_time, cell);
    }

    /// Register a route.  Names must be unique.
    pub fn add_route(&mut self, route: Route) -> NetworkResult<RouteId> {
        if self.route_index.contains_key(route.name()) {
            return Err(NetworkError::DuplicateRoute(route.name().to_owned()));
        }
        let id = RouteId(self.routes.len() as u32);
        self.route_index.insert(route.name().to_owned(), id);
        self.routes.push(route);
        Ok(id)
    }

    pub fn route_mut(&mut self, id: RouteId) -> Option<&mut Route> {
        self.routes.get_mut(id.index())
    }

    pub fn node_count(&self) -> usize { self.node_count }
    pub fn link_count(&self) -> usize { self.raw_links.len() }

    /// Consume the builder and produce a [`PedNetwork`].
    ///
    /// Fails if a link or route references an unknown node, or if a route's
    /// destination is not part of its node set.
    pub fn build(self) -> NetworkResult<PedNetwork> {
        let node_count = self.node_count;
        let known = |n: NodeId| n.index() < node_count;

        for l in &self.raw_links {
            for n in [l.from, l.to] {
                if !known(n) {
                    return Err(NetworkError::NodeNotFound(n));
                }
            }
        }
        for route in &self.routes {
            let dest = route.destination_node();
            if !route.route_nodes().contains(&dest) {
                return Err(NetworkError::DestinationNotOnRoute {
                    route: route.name().to_owned(),
                    node:  dest,
                });
            }
            if let Some(&n) = route.route_nodes().iter().find(|&&n| !known(n)) {
                return Err(NetworkError::NodeNotFound(n));
            }
        }

        // Stable sort keeps per-node insertion order.
        let mut raw = self.raw_links;
        raw.sort_by_key(|l| l.from.0);

        let link_from: Vec<NodeId> = raw.iter().map(|l| l.from).collect();
        let link_to: Vec<NodeId> = raw.iter().map(|l| l.to).collect();
        let link_rel_travel_time: Vec<f64> = raw.iter().map(|l| l.rel_travel_time).collect();
        let link_cell: Vec<String> = raw.into_iter().map(|l| l.cell).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &link_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, link_to.len());

        let mut source_sink: Vec<NodeId> = self.source_sink.into_iter().collect();
        source_sink.sort_unstable();
        if let Some(&n) = source_sink.iter().find(|&&n| !known(n)) {
            return Err(NetworkError::NodeNotFound(n));
        }

        Ok(PedNetwork {
            node_out_start,
            link_from,
            link_to,
            link_rel_travel_time,
            link_cell,
            source_sink,
            routes: self.routes,
            route_index: self.route_index,
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
