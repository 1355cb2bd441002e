//! Time-expanded A* search with an admissible geodesic heuristic ("AStarEngine", C6).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use eco_core::{advance_secs, elapsed_secs, FuelType, GeoPoint, Instant, NodeId, RoutingConfig};
use eco_graph::{edge_weight, RoadGraph, TrafficPredictions};

use crate::ch::{out_edges, resolve_edge, ContractionHierarchy, EdgeHandle};
use crate::cost::{edge_cost, CostBreakdown, Weights};
use crate::error::{RoutingError, RoutingResult};
use crate::route::{Route, Segment};

/// Per-query knobs that don't belong on the long-lived engine itself.
pub struct SearchRequest<'p> {
    pub predictions: Option<&'p TrafficPredictions>,
    pub weights: Weights,
    pub fuel: FuelType,
    /// Wall-clock deadline (§5 "cancellation and timeouts"); checked once
    /// per pop, not on a timer.
    pub deadline: Option<std::time::Instant>,
}

impl<'p> SearchRequest<'p> {
    pub fn new(weights: Weights) -> Self {
        Self { predictions: None, weights, fuel: FuelType::Petrol, deadline: None }
    }

    pub fn with_predictions(mut self, predictions: &'p TrafficPredictions) -> Self {
        self.predictions = Some(predictions);
        self
    }

    pub fn with_fuel(mut self, fuel: FuelType) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn with_deadline(mut self, deadline: std::time::Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Priority-queue entry: `(f_cost, tie_break, node, arrival_time, g_cost)` (§3).
struct QueueEntry {
    f_cost: f64,
    tie_break: u64,
    node: NodeId,
    arrival_time: Instant,
    g_cost: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.tie_break == other.tie_break
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // `BinaryHeap` is a max-heap; reverse both keys so the smallest f_cost
    // (and, among ties, the smallest tie_break — FIFO) surfaces first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.tie_break.cmp(&self.tie_break))
    }
}

/// Time-expanded A* over a [`RoadGraph`], optionally overlaid with a
/// [`ContractionHierarchy`]'s shortcuts.
pub struct AStarEngine<'g> {
    graph: &'g RoadGraph,
    ch: Option<&'g ContractionHierarchy>,
    config: RoutingConfig,
}

impl<'g> AStarEngine<'g> {
    pub fn new(graph: &'g RoadGraph, ch: Option<&'g ContractionHierarchy>, config: RoutingConfig) -> Self {
        Self { graph, ch, config }
    }

    /// `h(n, goal) = haversine(n, goal) / v_max_m_s` (§4.6). Admissible
    /// because `v_max` upper-bounds every achievable edge speed (enforced
    /// by the clamp inside [`eco_graph::edge_weight`]).
    fn heuristic(&self, node: NodeId, goal: GeoPoint) -> f64 {
        self.graph.node_pos(node).distance_m(goal) / self.config.v_max_ms()
    }

    pub fn search(&self, start: NodeId, goal: NodeId, depart_time: Instant, req: &SearchRequest) -> RoutingResult<Route> {
        if start.index() >= self.graph.node_count() || goal.index() >= self.graph.node_count() {
            return Err(RoutingError::NotReachable { from: start, to: goal });
        }

        if start == goal {
            let pos = self.graph.node_pos(start);
            return Ok(Route {
                path: vec![start],
                polyline: vec![pos],
                distance_km: 0.0,
                duration_min: 0.0,
                co2_g: 0.0,
                scalar_cost: 0.0,
                segments: Vec::new(),
                nodes_explored: 0,
                search_ms: 0.0,
                efficiency_ratio: 1.0,
                weights: req.weights,
                depart_time,
                arrive_time: depart_time,
            });
        }

        let started = std::time::Instant::now();
        let goal_pos = self.graph.node_pos(goal);
        let n = self.graph.node_count();

        let mut g_scores = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<(NodeId, EdgeHandle)>> = vec![None; n];
        let mut arrival_times: Vec<Option<Instant>> = vec![None; n];
        let mut breakdowns: Vec<Option<CostBreakdown>> = vec![None; n];
        let mut closed = vec![false; n];

        g_scores[start.index()] = 0.0;
        arrival_times[start.index()] = Some(depart_time);

        let mut heap = BinaryHeap::new();
        let mut tie_break: u64 = 0;
        heap.push(QueueEntry {
            f_cost: self.heuristic(start, goal_pos),
            tie_break,
            node: start,
            arrival_time: depart_time,
            g_cost: 0.0,
        });

        let mut nodes_explored = 0usize;

        while let Some(entry) = heap.pop() {
            if closed[entry.node.index()] {
                continue;
            }
            closed[entry.node.index()] = true;
            nodes_explored += 1;

            if entry.node == goal {
                return Ok(self.reconstruct(
                    start,
                    goal,
                    depart_time,
                    &parent,
                    &arrival_times,
                    &breakdowns,
                    g_scores[goal.index()],
                    nodes_explored,
                    started,
                    req.weights,
                ));
            }

            if nodes_explored >= self.config.astar_max_iterations {
                return Err(RoutingError::Overflow(self.config.astar_max_iterations));
            }
            if let Some(deadline) = req.deadline {
                if std::time::Instant::now() >= deadline {
                    return Err(RoutingError::DeadlineExceeded);
                }
            }

            for (handle, edge) in out_edges(self.graph, self.ch, entry.node) {
                if closed[edge.to.index()] {
                    continue;
                }

                let weight = edge_weight(edge, entry.arrival_time, req.predictions, &self.config);
                if weight.travel_time_s.is_infinite() {
                    continue;
                }

                let (j, breakdown) = edge_cost(edge, &weight, req.weights, req.fuel, 0.0);
                let g_new = entry.g_cost + j;

                if g_new < g_scores[edge.to.index()] {
                    g_scores[edge.to.index()] = g_new;
                    let arrival = advance_secs(entry.arrival_time, weight.travel_time_s);
                    parent[edge.to.index()] = Some((entry.node, handle));
                    arrival_times[edge.to.index()] = Some(arrival);
                    breakdowns[edge.to.index()] = Some(breakdown);

                    tie_break += 1;
                    heap.push(QueueEntry {
                        f_cost: g_new + self.heuristic(edge.to, goal_pos),
                        tie_break,
                        node: edge.to,
                        arrival_time: arrival,
                        g_cost: g_new,
                    });
                }
            }
        }

        Err(RoutingError::NotReachable { from: start, to: goal })
    }

    #[allow(clippy::too_many_arguments)]
    fn reconstruct(
        &self,
        start: NodeId,
        goal: NodeId,
        depart_time: Instant,
        parent: &[Option<(NodeId, EdgeHandle)>],
        arrival_times: &[Option<Instant>],
        breakdowns: &[Option<CostBreakdown>],
        scalar_cost: f64,
        nodes_explored: usize,
        started: std::time::Instant,
        weights: Weights,
    ) -> Route {
        let mut path = vec![goal];
        let mut rev_segments = Vec::new();
        let mut cur = goal;

        while let Some((prev, handle)) = parent[cur.index()] {
            let edge = resolve_edge(self.graph, self.ch, handle);
            let breakdown = breakdowns[cur.index()].expect("breakdown recorded alongside parent");
            rev_segments.push(Segment {
                dist_m: breakdown.distance_m,
                time_s: breakdown.travel_time_s,
                speed_kmh: breakdown.speed_kmh,
                co2_g: breakdown.co2_g,
                congestion: breakdown.congestion,
                road_class: edge.road_class,
            });
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        rev_segments.reverse();
        let segments = rev_segments;

        let polyline: Vec<GeoPoint> = path.iter().map(|&n| self.graph.node_pos(n)).collect();
        let distance_m: f64 = segments.iter().map(|s| s.dist_m).sum();
        let duration_s: f64 = segments.iter().map(|s| s.time_s).sum();
        let co2_g: f64 = segments.iter().map(|s| s.co2_g).sum();

        let geodesic_m = self.graph.node_pos(start).distance_m(self.graph.node_pos(goal));
        let efficiency_ratio = if distance_m > 0.0 { geodesic_m / distance_m } else { 1.0 };

        let arrive_time = arrival_times[goal.index()].unwrap_or(depart_time);

        Route {
            path,
            polyline,
            distance_km: distance_m / 1000.0,
            duration_min: duration_s / 60.0,
            co2_g,
            scalar_cost,
            segments,
            nodes_explored,
            search_ms: started.elapsed().as_secs_f64() * 1000.0,
            efficiency_ratio,
            weights,
            depart_time,
            arrive_time,
        }
    }
}

// Re-exported so call sites can compute elapsed wall-clock spans without an
// extra `eco_core` import when they already depend on this crate.
pub use eco_core::elapsed_secs as route_elapsed_secs;

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::GeoPoint;
    use eco_graph::{RoadClass, RoadGraphBuilder};
    use chrono::TimeZone;

    fn depart() -> Instant {
        chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn trivial_route_when_start_equals_goal() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let g = b.build();
        let engine = AStarEngine::new(&g, None, RoutingConfig::default());
        let req = SearchRequest::new(Weights::new(1.0, 0.0, 0.0, 0.0));
        let route = engine.search(a, a, depart(), &req).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.distance_km, 0.0);
    }

    #[test]
    fn disconnected_nodes_are_not_reachable() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(5.0, 5.0));
        let g = b.build();
        let engine = AStarEngine::new(&g, None, RoutingConfig::default());
        let req = SearchRequest::new(Weights::new(1.0, 0.0, 0.0, 0.0));
        let err = engine.search(a, c, depart(), &req).unwrap_err();
        assert!(matches!(err, RoutingError::NotReachable { .. }));
    }

    #[test]
    fn scenario_1_two_node_graph() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_directed_edge(a, c, 1113.2, 60.0, 1, RoadClass::Secondary);
        let g = b.build();

        let engine = AStarEngine::new(&g, None, RoutingConfig::default());
        let req = SearchRequest::new(Weights::new(1.0, 0.0, 0.0, 0.0));
        let route = engine.search(a, c, depart(), &req).unwrap();

        assert!((route.distance_km - 1.1132).abs() < 1e-4);
        // BPR factor at midday: 1 + 0.15 * 0.6^4 ≈ 1.0194.
        let expected_duration_min = (1113.2 / (60.0 / 3.6) * (1.0 + 0.15 * 0.6_f64.powf(4.0))) / 60.0;
        assert!((route.duration_min - expected_duration_min).abs() < 1e-6);
    }

    #[test]
    fn scenario_2_triangle_prefers_faster_direct_edge_for_pure_time() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        let d = b.add_node(GeoPoint::new(0.0, 0.02));
        b.add_directed_edge(a, c, 1113.2, 60.0, 1, RoadClass::Secondary);
        b.add_directed_edge(c, d, 1113.2, 60.0, 1, RoadClass::Secondary);
        b.add_directed_edge(a, d, 2226.4, 120.0, 2, RoadClass::Primary);
        let g = b.build();

        let engine = AStarEngine::new(&g, None, RoutingConfig::default());
        let req = SearchRequest::new(Weights::new(1.0, 0.0, 0.0, 0.0));
        let route = engine.search(a, d, depart(), &req).unwrap();

        assert_eq!(route.path, vec![a, d]);
    }

    #[test]
    fn scenario_2_triangle_prefers_detour_when_direct_edge_predicted_slow() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        let d = b.add_node(GeoPoint::new(0.0, 0.02));
        b.add_directed_edge(a, c, 1113.2, 60.0, 1, RoadClass::Secondary);
        b.add_directed_edge(c, d, 1113.2, 60.0, 1, RoadClass::Secondary);
        b.add_directed_edge(a, d, 2226.4, 120.0, 2, RoadClass::Primary);
        let g = b.build();

        let mut preds = TrafficPredictions::new();
        preds.insert((a, d), eco_graph::TrafficPrediction { speed_kmh: 20.0, flow: 0.0, congestion: 0.9 });

        let engine = AStarEngine::new(&g, None, RoutingConfig::default());
        let req = SearchRequest::new(Weights::new(1.0, 0.0, 0.0, 0.0)).with_predictions(&preds);
        let route = engine.search(a, d, depart(), &req).unwrap();

        assert_eq!(route.path, vec![a, c, d]);
    }

    #[test]
    fn admissibility_heuristic_never_exceeds_haversine_over_v_max() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 1.0));
        b.add_directed_edge(a, c, 1000.0, 60.0, 1, RoadClass::Secondary);
        let g = b.build();
        let cfg = RoutingConfig::default();
        let engine = AStarEngine::new(&g, None, cfg);
        let h = engine.heuristic(a, g.node_pos(c));
        let direct = g.node_pos(a).distance_m(g.node_pos(c)) / cfg.v_max_ms();
        assert!((h - direct).abs() < 1e-9);
    }
}
