//! Orchestration of C3…C9 behind a single "plan route" / "replan"
//! operation ("RoutingFacade", C10).

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use chrono::DateTime;

use eco_core::{GeoPoint, Instant, NodeId, RideId, RoutingConfig};
use eco_graph::RoadGraph;
use eco_mpc::{CommitOutcome, ReplanController, ReplanDecision, ReplanTriggers};
use eco_routing::{AStarEngine, ContractionHierarchy, PresetRoute, Route, SearchRequest, Weights};

use crate::error::{FacadeError, FacadeResult};
use crate::types::{
    ParetoRequest, PlanRequest, PlanResponse, Predictions, ReplanRequest, ReplanResponse, ReplanStatusReport,
    TrafficOverlayPoint,
};

fn parse_rfc3339(text: &str) -> FacadeResult<Instant> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| FacadeError::BadRequest(format!("invalid RFC3339 timestamp {text:?}: {e}")))
}

fn validate_point(p: GeoPoint, label: &str) -> FacadeResult<()> {
    if !(-90.0..=90.0).contains(&p.lat) || !p.lat.is_finite() {
        return Err(FacadeError::BadRequest(format!("{label} latitude {} out of range", p.lat)));
    }
    if !(-180.0..=180.0).contains(&p.lon) || !p.lon.is_finite() {
        return Err(FacadeError::BadRequest(format!("{label} longitude {} out of range", p.lon)));
    }
    Ok(())
}

fn validate_weights(w: Weights) -> FacadeResult<()> {
    if w.is_valid() {
        Ok(())
    } else {
        Err(FacadeError::BadRequest(format!("weights {w:?} must each lie in [0,1] and sum to at most 1")))
    }
}

/// Snap `pos` to the nearest graph node, or `BadRequest` if the graph is
/// empty.
fn snap(graph: &RoadGraph, pos: GeoPoint, label: &str) -> FacadeResult<NodeId> {
    graph
        .snap_to_node(pos)
        .ok_or_else(|| FacadeError::BadRequest(format!("cannot snap {label} {pos}: graph has no nodes")))
}

/// Build the `plan` response's `traffic_overlay`: one entry per node on
/// `primary.path`, plus one extra for the terminal node copying the
/// previous congestion/speed (§6).
fn build_traffic_overlay(route: &Route) -> Vec<TrafficOverlayPoint> {
    if route.path.is_empty() {
        return Vec::new();
    }

    let mut overlay = Vec::with_capacity(route.path.len() + 1);
    for (i, pos) in route.polyline.iter().enumerate() {
        let (congestion, speed_kmh) = match route.segments.get(i) {
            Some(s) => (s.congestion, s.speed_kmh),
            None => route.segments.last().map(|s| (s.congestion, s.speed_kmh)).unwrap_or((0.0, 0.0)),
        };
        overlay.push(TrafficOverlayPoint { lat: pos.lat, lng: pos.lon, congestion, speed_kmh });
    }
    if let Some(last) = overlay.last().copied() {
        overlay.push(last);
    }
    overlay
}

/// Process-wide handle: the shared, read-only `RoadGraph` and
/// `ContractionHierarchy`, plus the per-ride replan controller map (§3
/// "Ownership", §9 "global state becomes a single Core handle").
pub struct RoutingFacade {
    graph: RoadGraph,
    ch: Option<ContractionHierarchy>,
    config: RoutingConfig,
    rides: RwLock<HashMap<RideId, Mutex<ReplanController>>>,
}

impl RoutingFacade {
    /// Build a facade over `graph` without a contraction hierarchy overlay.
    pub fn new(graph: RoadGraph, config: RoutingConfig) -> Self {
        Self { graph, ch: None, config, rides: RwLock::new(HashMap::new()) }
    }

    /// Build a facade and run CH preprocessing up front (§4.7). Never
    /// fails: preprocessing downgrades to partial mode internally rather
    /// than producing a user-visible error (§7).
    #[tracing::instrument(skip(graph, config), fields(node_count = graph.node_count()))]
    pub fn with_contraction_hierarchy(graph: RoadGraph, config: RoutingConfig) -> Self {
        let ch = ContractionHierarchy::preprocess(&graph, config.ch_max_nodes);
        Self { graph, ch: Some(ch), config, rides: RwLock::new(HashMap::new()) }
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn config(&self) -> RoutingConfig {
        self.config
    }

    fn engine(&self) -> AStarEngine<'_> {
        AStarEngine::new(&self.graph, self.ch.as_ref(), self.config)
    }

    /// `plan(origin, destination, depart_time, weights, predictions?) ->
    /// Route | NotReachable` (§4.10).
    #[tracing::instrument(skip(self, req, predictions))]
    pub fn plan(&self, req: &PlanRequest, predictions: Predictions) -> FacadeResult<PlanResponse> {
        validate_point(req.origin, "origin")?;
        validate_point(req.destination, "destination")?;
        validate_weights(req.weights)?;
        let depart_time = parse_rfc3339(&req.departure_time)?;

        let start = snap(&self.graph, req.origin, "origin")?;
        let goal = snap(&self.graph, req.destination, "destination")?;

        let mut search_req = SearchRequest::new(req.weights).with_fuel(req.fuel);
        if let Some(p) = predictions {
            search_req = search_req.with_predictions(p);
        }

        let primary = self.engine().search(start, goal, depart_time, &search_req)?;

        // Alternative: the first Pareto survivor (fixed preset order, §4.8)
        // whose path differs from the primary's. This is an Open Question
        // in the spec (§9); documented in DESIGN.md.
        let alternative = eco_routing::plan_pareto(
            &self.graph,
            self.ch.as_ref(),
            self.config,
            start,
            goal,
            depart_time,
            predictions,
            req.fuel,
        )
        .ok()
        .and_then(|survivors| survivors.into_iter().find(|p: &PresetRoute| p.route.path != primary.path))
        .map(|p| p.route);

        let traffic_overlay = build_traffic_overlay(&primary);

        tracing::info!(
            distance_km = primary.distance_km,
            duration_min = primary.duration_min,
            nodes_explored = primary.nodes_explored,
            "plan complete"
        );

        Ok(PlanResponse { primary, alternative, traffic_overlay })
    }

    /// `pareto(origin, destination, depart_time, predictions?) -> [Route]`
    /// (§4.10).
    #[tracing::instrument(skip(self, req, predictions))]
    pub fn pareto(&self, req: &ParetoRequest, predictions: Predictions) -> FacadeResult<Vec<PresetRoute>> {
        validate_point(req.origin, "origin")?;
        validate_point(req.destination, "destination")?;
        let depart_time = parse_rfc3339(&req.departure_time)?;

        let start = snap(&self.graph, req.origin, "origin")?;
        let goal = snap(&self.graph, req.destination, "destination")?;

        let survivors = eco_routing::plan_pareto(
            &self.graph,
            self.ch.as_ref(),
            self.config,
            start,
            goal,
            depart_time,
            predictions,
            req.fuel,
        )?;

        tracing::info!(survivor_count = survivors.len(), "pareto plan complete");
        Ok(survivors)
    }

    /// `replan(ride_id, current_position, goal, now, weights, predictions?,
    /// triggers) -> {replanned, route?, reason}` (§4.10).
    #[tracing::instrument(skip(self, req, predictions), fields(ride_id = %req.ride_id))]
    pub fn replan(&self, req: &ReplanRequest, predictions: Predictions) -> FacadeResult<ReplanResponse> {
        validate_point(req.current_position, "current_position")?;
        validate_point(req.destination, "destination")?;
        validate_weights(req.weights)?;
        let now = parse_rfc3339(&req.departure_time)?;

        {
            let rides = self.rides.read().expect("replan state lock poisoned");
            if !rides.contains_key(&req.ride_id) {
                drop(rides);
                let mut rides = self.rides.write().expect("replan state lock poisoned");
                rides.entry(req.ride_id).or_insert_with(|| Mutex::new(ReplanController::new()));
            }
        }

        let rides = self.rides.read().expect("replan state lock poisoned");
        let controller_lock = rides.get(&req.ride_id).expect("just inserted above");
        let mut controller = controller_lock.lock().expect("replan controller lock poisoned");

        let triggers = ReplanTriggers {
            traffic_change_pct: req.traffic_change_pct,
            off_route: req.is_off_route,
            incident_on_route: req.incident_on_route,
        };

        let decision = controller.decide(now, &self.config, triggers);
        let status = controller.status();
        let status_report = ReplanStatusReport {
            replan_count: status.replan_count,
            last_replan: status.last_replan,
            current_cost: status.current_cost,
        };

        match decision {
            ReplanDecision::NotDue => Ok(ReplanResponse {
                replanned: false,
                route: controller.state().current_route().cloned(),
                reason: "not due".to_string(),
                status: status_report,
            }),
            ReplanDecision::CeilingReached => {
                tracing::warn!("replan ceiling reached");
                Ok(ReplanResponse {
                    replanned: false,
                    route: controller.state().current_route().cloned(),
                    reason: "ceiling".to_string(),
                    status: status_report,
                })
            }
            ReplanDecision::ShouldReplan => {
                let start = snap(&self.graph, req.current_position, "current_position")?;
                let goal = snap(&self.graph, req.destination, "destination")?;

                let mut search_req = SearchRequest::new(req.weights).with_fuel(req.fuel);
                if let Some(p) = predictions {
                    search_req = search_req.with_predictions(p);
                }
                let candidate = self.engine().search(start, goal, now, &search_req)?;

                match controller.try_commit(candidate.clone(), now, &self.config) {
                    CommitOutcome::Committed => {
                        let status = controller.status();
                        Ok(ReplanResponse {
                            replanned: true,
                            route: Some(candidate),
                            reason: "committed".to_string(),
                            status: ReplanStatusReport {
                                replan_count: status.replan_count,
                                last_replan: status.last_replan,
                                current_cost: status.current_cost,
                            },
                        })
                    }
                    CommitOutcome::RejectedHysteresis => {
                        let status = controller.status();
                        Ok(ReplanResponse {
                            replanned: false,
                            route: controller.state().current_route().cloned(),
                            reason: "hysteresis".to_string(),
                            status: ReplanStatusReport {
                                replan_count: status.replan_count,
                                last_replan: status.last_replan,
                                current_cost: status.current_cost,
                            },
                        })
                    }
                }
            }
        }
    }

    /// Remove a ride's replan state once it's no longer active. Returns
    /// `true` if a state existed and was removed.
    pub fn end_ride(&self, ride_id: RideId) -> bool {
        self.rides.write().expect("replan state lock poisoned").remove(&ride_id).is_some()
    }

    pub fn active_ride_count(&self) -> usize {
        self.rides.read().expect("replan state lock poisoned").len()
    }
}
