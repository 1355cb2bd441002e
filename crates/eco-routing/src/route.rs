//! The result of a routing search (§3 "Route result").

use eco_core::{GeoPoint, Instant, NodeId};
use eco_graph::RoadClass;

use crate::cost::Weights;

/// Per-edge metrics along a finished route, derived from the [`CostBreakdown`]
/// recorded when that edge was relaxed onto.
///
/// [`CostBreakdown`]: crate::cost::CostBreakdown
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub dist_m: f64,
    pub time_s: f64,
    pub speed_kmh: f64,
    pub co2_g: f64,
    pub congestion: f64,
    pub road_class: RoadClass,
}

/// A completed route: node path, polyline, aggregate metrics, and the
/// search diagnostics that produced it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub path: Vec<NodeId>,
    pub polyline: Vec<GeoPoint>,
    pub distance_km: f64,
    pub duration_min: f64,
    pub co2_g: f64,
    pub scalar_cost: f64,
    pub segments: Vec<Segment>,
    pub nodes_explored: usize,
    pub search_ms: f64,
    /// `geodesic(start, goal) / distance_traveled`; `1.0` for a trivial
    /// (zero-length) route.
    pub efficiency_ratio: f64,
    pub weights: Weights,
    pub depart_time: Instant,
    pub arrive_time: Instant,
}

impl Route {
    /// `true` for a `start == goal` route: a single-node path, no segments.
    pub fn is_trivial(&self) -> bool {
        self.path.len() <= 1
    }
}
