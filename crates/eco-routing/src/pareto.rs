//! Preset-weight Pareto route set ("ParetoPlanner", C8).
//!
//! Runs the engine once per preset weight vector (§4.8), then strikes any
//! route dominated by another on `(duration, co2, distance)`. This is weight
//! scalarization across a fixed palette, not exact Pareto-optimal
//! enumeration (§1 Non-goals) — four searches, not a frontier sweep.

use eco_core::{FuelType, Instant, NodeId};
use eco_graph::{RoadGraph, TrafficPredictions};

use crate::astar::{AStarEngine, SearchRequest};
use crate::ch::ContractionHierarchy;
use crate::cost::Weights;
use crate::error::RoutingResult;
use crate::route::Route;

/// The four fixed weight presets (§4.8), in the order they're evaluated and
/// returned. Evaluation order matters for the "duplicate paths are kept
/// only once" determinism rule: the earliest preset to find a given path
/// wins the tag.
pub const PRESETS: [(&str, Weights); 4] = [
    ("fastest", Weights::FASTEST),
    ("greenest", Weights::GREENEST),
    ("balanced", Weights::BALANCED),
    ("smoothest", Weights::SMOOTHEST),
];

/// One surviving route, tagged with the preset name that produced it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresetRoute {
    pub preset_name: &'static str,
    pub route: Route,
}

/// `true` if `a` dominates `b`: no worse on every objective and strictly
/// better on at least one (§4.8, §8 invariant 5).
fn dominates(a: &Route, b: &Route) -> bool {
    let no_worse = a.duration_min <= b.duration_min && a.co2_g <= b.co2_g && a.distance_km <= b.distance_km;
    let strictly_better =
        a.duration_min < b.duration_min || a.co2_g < b.co2_g || a.distance_km < b.distance_km;
    no_worse && strictly_better
}

/// Run [`AStarEngine::search`] once per preset in [`PRESETS`], then drop any
/// dominated route and collapse duplicate paths to their first-seen preset.
#[allow(clippy::too_many_arguments)]
pub fn plan_pareto(
    graph: &RoadGraph,
    ch: Option<&ContractionHierarchy>,
    config: eco_core::RoutingConfig,
    start: NodeId,
    goal: NodeId,
    depart_time: Instant,
    predictions: Option<&TrafficPredictions>,
    fuel: FuelType,
) -> RoutingResult<Vec<PresetRoute>> {
    let engine = AStarEngine::new(graph, ch, config);

    let mut candidates: Vec<PresetRoute> = Vec::new();
    for (name, weights) in PRESETS {
        let mut req = SearchRequest::new(weights).with_fuel(fuel);
        if let Some(p) = predictions {
            req = req.with_predictions(p);
        }
        match engine.search(start, goal, depart_time, &req) {
            Ok(route) => {
                if candidates.iter().any(|c: &PresetRoute| c.route.path == route.path) {
                    continue;
                }
                candidates.push(PresetRoute { preset_name: name, route });
            }
            Err(crate::error::RoutingError::NotReachable { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    let survivors: Vec<PresetRoute> = candidates
        .iter()
        .filter(|candidate| !candidates.iter().any(|other| dominates(&other.route, &candidate.route)))
        .cloned()
        .collect();

    Ok(survivors)
}

/// `rayon`-backed variant of [`plan_pareto`] that runs the four preset
/// searches across a thread pool (mirrors the source framework's own
/// `parallel` feature on its tick-loop crate, §10).
#[cfg(feature = "parallel")]
#[allow(clippy::too_many_arguments)]
pub fn plan_pareto_parallel(
    graph: &RoadGraph,
    ch: Option<&ContractionHierarchy>,
    config: eco_core::RoutingConfig,
    start: NodeId,
    goal: NodeId,
    depart_time: Instant,
    predictions: Option<&TrafficPredictions>,
    fuel: FuelType,
) -> RoutingResult<Vec<PresetRoute>> {
    use rayon::prelude::*;

    let engine = AStarEngine::new(graph, ch, config);

    let results: Vec<Option<PresetRoute>> = PRESETS
        .par_iter()
        .map(|&(name, weights)| {
            let mut req = SearchRequest::new(weights).with_fuel(fuel);
            if let Some(p) = predictions {
                req = req.with_predictions(p);
            }
            match engine.search(start, goal, depart_time, &req) {
                Ok(route) => Some(PresetRoute { preset_name: name, route }),
                Err(_) => None,
            }
        })
        .collect();

    let mut candidates: Vec<PresetRoute> = Vec::new();
    for preset in results.into_iter().flatten() {
        if candidates.iter().any(|c| c.route.path == preset.route.path) {
            continue;
        }
        candidates.push(preset);
    }

    let survivors: Vec<PresetRoute> = candidates
        .iter()
        .filter(|candidate| !candidates.iter().any(|other| dominates(&other.route, &candidate.route)))
        .cloned()
        .collect();

    Ok(survivors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use eco_core::GeoPoint;
    use eco_graph::{RoadClass, RoadGraphBuilder};

    fn depart() -> Instant {
        chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn pareto_output_has_no_dominated_survivor() {
        // Star graph, three disjoint paths: time-ordering P1 < P2 < P3,
        // CO2-ordering reversed (§8 scenario 4).
        let mut b = RoadGraphBuilder::new();
        let origin = b.add_node(GeoPoint::new(0.0, 0.0));
        let dest = b.add_node(GeoPoint::new(0.0, 0.05));

        // P1: fast, short, high speed (low time, but higher CO2 at speed).
        let p1 = b.add_node(GeoPoint::new(0.01, 0.0));
        b.add_directed_edge(origin, p1, 2000.0, 120.0, 3, RoadClass::Motorway);
        b.add_directed_edge(p1, dest, 2000.0, 120.0, 3, RoadClass::Motorway);

        // P2: middling.
        let p2 = b.add_node(GeoPoint::new(0.02, 0.0));
        b.add_directed_edge(origin, p2, 2500.0, 60.0, 2, RoadClass::Secondary);
        b.add_directed_edge(p2, dest, 2500.0, 60.0, 2, RoadClass::Secondary);

        // P3: slow, long, low speed — lowest CO2 via low EF at moderate speed.
        let p3 = b.add_node(GeoPoint::new(0.03, 0.0));
        b.add_directed_edge(origin, p3, 3000.0, 30.0, 1, RoadClass::Residential);
        b.add_directed_edge(p3, dest, 3000.0, 30.0, 1, RoadClass::Residential);

        let g = b.build();
        let survivors = plan_pareto(&g, None, eco_core::RoutingConfig::default(), origin, dest, depart(), None, FuelType::Petrol).unwrap();

        assert!(!survivors.is_empty());
        for s in &survivors {
            for other in &survivors {
                if std::ptr::eq(s, other) {
                    continue;
                }
                assert!(!dominates(&other.route, &s.route), "{} dominated by {}", s.preset_name, other.preset_name);
            }
        }
    }

    #[test]
    fn pareto_subset_of_four_individual_plans() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_directed_edge(a, c, 1113.2, 60.0, 1, RoadClass::Secondary);
        let g = b.build();

        let survivors = plan_pareto(&g, None, eco_core::RoutingConfig::default(), a, c, depart(), None, FuelType::Petrol).unwrap();
        let engine = AStarEngine::new(&g, None, eco_core::RoutingConfig::default());

        for s in &survivors {
            let req = SearchRequest::new(
                PRESETS.iter().find(|(name, _)| *name == s.preset_name).unwrap().1,
            );
            let direct = engine.search(a, c, depart(), &req).unwrap();
            assert_eq!(direct.path, s.route.path);
        }
    }

    #[test]
    fn unreachable_goal_yields_empty_pareto_set() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(5.0, 5.0));
        let g = b.build();
        let survivors = plan_pareto(&g, None, eco_core::RoutingConfig::default(), a, c, depart(), None, FuelType::Petrol).unwrap();
        assert!(survivors.is_empty());
    }
}
