//! Road network representation and builder ("RoadGraph", C3).
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edges[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are sorted by source node and indexed by `EdgeId`. Iteration over a
//! node's outgoing edges is therefore a contiguous memory scan.
//!
//! Contraction-hierarchy shortcuts are **not** stored here: per the design
//! note on avoiding "copy graph on contraction", shortcuts live in a side
//! list owned by `eco_routing::ContractionHierarchy` and are unioned in at
//! query time. This graph is immutable once built.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`. The
//! contract (§4.3) only requires linear-scan nearest-node search; this is an
//! optional optimization on top of it.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use eco_core::{EdgeId, GeoPoint, NodeId};

// ── Road class & edge attributes ───────────────────────────────────────────────

/// Functional road classification, used only as a descriptive tag (does not
/// affect routing other than through the speed/capacity attributes below).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
}

/// A directed road segment.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length in meters. Strictly positive by construction.
    pub length_m: f64,
    /// Free-flow upper-bound speed in km/h. Strictly positive by construction.
    pub free_flow_speed_kmh: f64,
    pub speed_limit_kmh: f64,
    pub lanes: u32,
    /// Vehicles/hour. Defaults to `lanes * 1800` if not given explicitly.
    pub capacity: f64,
    pub road_class: RoadClass,
    pub oneway: bool,
    /// `Some(via)` if this edge is a CH shortcut contracting node `via`.
    /// Base-graph edges are always `None`; shortcuts live in
    /// `eco_routing::ContractionHierarchy`, not here, but the field is kept
    /// on the type so a shortcut's synthesized `Edge` is structurally the
    /// same thing as an original one.
    pub shortcut_via: Option<NodeId>,
}

impl Edge {
    pub fn is_shortcut(&self) -> bool {
        self.shortcut_via.is_some()
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Immutable after [`RoadGraphBuilder::build`]. Do not construct directly.
pub struct RoadGraph {
    /// Geographic position of each node. Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer. Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`. Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Edges sorted by source node, indexed by `EdgeId`.
    pub edges: Vec<Edge>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn node_pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`. No
    /// heap allocation — a contiguous index range.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Find the existing edge `u -> v`, if one exists. O(out-degree(u)).
    ///
    /// Invariant (§3): at most one non-shortcut edge per ordered pair, so
    /// this always finds at most one match among base-graph edges.
    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.out_edges(u).find(|&e| self.edges[e.index()].to == v)
    }

    /// Nearest road node to `pos` via the spatial index. `None` only if the
    /// graph has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Nearest-node search by linear scan, as required by the bare contract
    /// (§4.3): "acceptable; called twice per plan". Kept alongside the
    /// R-tree-backed `snap_to_node` for callers/tests that want to verify
    /// the index against the reference definition.
    pub fn snap_to_node_linear(&self, pos: GeoPoint) -> Option<NodeId> {
        self.node_pos
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                pos.distance_m(**a)
                    .partial_cmp(&pos.distance_m(**b))
                    .unwrap()
            })
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use eco_core::GeoPoint;
/// use eco_graph::{RoadClass, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(30.69, -88.04));
/// let c = b.add_node(GeoPoint::new(30.70, -88.03));
/// b.add_road(a, c, 1_200.0, 50.0, 50.0, 2, RoadClass::Secondary);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes: Vec<GeoPoint>,
    raw_edges: Vec<Edge>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self { nodes: Vec::with_capacity(nodes), raw_edges: Vec::with_capacity(edges) }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a single **directed** edge with the full attribute set (§3).
    #[allow(clippy::too_many_arguments)]
    pub fn add_directed_edge_full(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        free_flow_speed_kmh: f64,
        speed_limit_kmh: f64,
        lanes: u32,
        capacity: Option<f64>,
        road_class: RoadClass,
        oneway: bool,
    ) {
        let capacity = capacity.unwrap_or(lanes as f64 * 1800.0);
        self.raw_edges.push(Edge {
            from,
            to,
            length_m,
            free_flow_speed_kmh,
            speed_limit_kmh,
            lanes,
            capacity,
            road_class,
            oneway,
            shortcut_via: None,
        });
    }

    /// Convenience: a directed edge at the default capacity (`lanes * 1800`)
    /// with `speed_limit_kmh == free_flow_speed_kmh`.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        free_flow_speed_kmh: f64,
        lanes: u32,
        road_class: RoadClass,
    ) {
        self.add_directed_edge_full(
            from,
            to,
            length_m,
            free_flow_speed_kmh,
            free_flow_speed_kmh,
            lanes,
            None,
            road_class,
            true,
        );
    }

    /// Add edges in **both directions** for a non-oneway road segment.
    ///
    /// Per the open design question (§9), this mirrors the source's choice
    /// to give forward and reverse edges identical attributes — treating
    /// direction-specific speed limits as symmetric. Callers with
    /// direction-specific data should call [`add_directed_edge_full`] twice
    /// instead.
    ///
    /// [`add_directed_edge_full`]: Self::add_directed_edge_full
    pub fn add_road(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f64,
        free_flow_speed_kmh: f64,
        speed_limit_kmh: f64,
        lanes: u32,
        road_class: RoadClass,
    ) {
        self.add_directed_edge_full(
            a, b, length_m, free_flow_speed_kmh, speed_limit_kmh, lanes, None, road_class, false,
        );
        self.add_directed_edge_full(
            b, a, length_m, free_flow_speed_kmh, speed_limit_kmh, lanes, None, road_class, false,
        );
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`RoadGraph`].
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadGraph { node_pos: self.nodes, node_out_start, edges: raw, spatial_idx }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_edge_default_capacity() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_directed_edge(a, c, 1113.2, 60.0, 2, RoadClass::Secondary);
        let g = b.build();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge(EdgeId(0)).capacity, 3600.0);
    }

    #[test]
    fn road_yields_symmetric_reverse_edge() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.02));
        b.add_road(a, c, 2226.4, 120.0, 120.0, 2, RoadClass::Primary);
        let g = b.build();
        assert_eq!(g.edge_count(), 2);

        let fwd = g.find_edge(a, c).unwrap();
        let rev = g.find_edge(c, a).unwrap();
        assert_eq!(g.edge(fwd).length_m, g.edge(rev).length_m);
        assert_eq!(g.edge(fwd).free_flow_speed_kmh, g.edge(rev).free_flow_speed_kmh);
    }

    #[test]
    fn csr_out_edges_match_node_out_degree() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        let d = b.add_node(GeoPoint::new(0.0, 0.02));
        b.add_directed_edge(a, c, 1000.0, 50.0, 1, RoadClass::Residential);
        b.add_directed_edge(a, d, 2000.0, 50.0, 1, RoadClass::Residential);
        let g = b.build();
        assert_eq!(g.out_degree(a), 2);
        assert_eq!(g.out_edges(a).count(), 2);
        assert_eq!(g.out_degree(c), 0);
    }

    #[test]
    fn snap_to_node_finds_nearest() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(10.0, 10.0));
        b.add_directed_edge(a, c, 100.0, 50.0, 1, RoadClass::Residential);
        let g = b.build();
        assert_eq!(g.snap_to_node(GeoPoint::new(0.001, 0.001)), Some(a));
        assert_eq!(g.snap_to_node_linear(GeoPoint::new(0.001, 0.001)), Some(a));
    }

    #[test]
    fn empty_graph_has_no_nodes_or_edges() {
        let g = RoadGraph::empty();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }
}
