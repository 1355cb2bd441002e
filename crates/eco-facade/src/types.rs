//! Request/response shapes that cross the process boundary (§6).

use eco_core::{FuelType, GeoPoint, Instant, RideId};
use eco_graph::TrafficPredictions;
use eco_routing::{Route, Weights};

/// `plan` request (§6). `departure_time` is RFC3339 text; the facade
/// parses it to a UTC instant and rejects malformed text as `BadRequest`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub departure_time: String,
    pub weights: Weights,
    /// Accepted but currently ignored (§6).
    pub avoid_tolls: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fuel: FuelType,
}

impl PlanRequest {
    pub fn new(origin: GeoPoint, destination: GeoPoint, departure_time: impl Into<String>, weights: Weights) -> Self {
        Self {
            origin,
            destination,
            departure_time: departure_time.into(),
            weights,
            avoid_tolls: false,
            fuel: FuelType::Petrol,
        }
    }
}

/// One point on the `plan` response's `traffic_overlay` (§6).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficOverlayPoint {
    pub lat: f64,
    pub lng: f64,
    /// In `[0, 1]`.
    pub congestion: f64,
    pub speed_kmh: f64,
}

/// `plan` response (§6).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanResponse {
    pub primary: Route,
    pub alternative: Option<Route>,
    pub traffic_overlay: Vec<TrafficOverlayPoint>,
}

/// `pareto` request (§6): no weights — the preset palette supplies them.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub departure_time: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fuel: FuelType,
}

/// `replan` request (§6).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplanRequest {
    pub ride_id: RideId,
    pub current_position: GeoPoint,
    pub destination: GeoPoint,
    /// The instant this replan request was issued ("now" in §4.9), as
    /// RFC3339 text.
    pub departure_time: String,
    pub weights: Weights,
    pub traffic_change_pct: f64,
    pub is_off_route: bool,
    pub incident_on_route: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fuel: FuelType,
}

/// Mirrors [`eco_mpc::ReplanController`]'s observable state (§4.9), owned
/// (not borrowed) so it can cross the facade boundary.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplanStatusReport {
    pub replan_count: u32,
    pub last_replan: Option<Instant>,
    pub current_cost: Option<f64>,
}

/// `replan` response (§6).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplanResponse {
    pub replanned: bool,
    pub route: Option<Route>,
    pub reason: String,
    pub status: ReplanStatusReport,
}

/// Read-only traffic predictions accepted by every facade operation; `None`
/// means "fall back to BPR for every edge" (§3).
pub type Predictions<'a> = Option<&'a TrafficPredictions>;
