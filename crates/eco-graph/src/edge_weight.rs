//! Time-dependent edge weight: predicted-speed override or BPR fallback
//! ("EdgeWeight", C4).

use std::collections::HashMap;

use chrono::Timelike;
use eco_core::{Instant, NodeId, RoutingConfig};

use crate::network::Edge;

/// One predicted traffic observation for a directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficPrediction {
    pub speed_kmh: f64,
    pub flow: f64,
    /// In `[0, 1]`.
    pub congestion: f64,
}

/// Read-only snapshot of predicted traffic, keyed by directed edge
/// endpoints. The source keys this map by a formatted `"u-v"` string; a
/// `(NodeId, NodeId)` tuple key is the direct Rust equivalent and avoids a
/// string allocation per lookup.
pub type TrafficPredictions = HashMap<(NodeId, NodeId), TrafficPrediction>;

/// Which branch of §4.4 produced the result: a predicted-speed override, or
/// the BPR volume-delay fallback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpeedSource {
    Predicted,
    Fallback,
}

/// Result of evaluating an edge's time-dependent weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeWeightResult {
    pub travel_time_s: f64,
    pub effective_speed_kmh: f64,
    pub source: SpeedSource,
}

/// Time-of-day volume ratio bucket (§4.4), by UTC hour `[0, 24)`.
fn volume_ratio(hour: u32) -> f64 {
    match hour {
        7 | 8 | 17 | 18 => 0.85,
        9..=16 => 0.6,
        5 | 6 | 19..=21 => 0.4,
        _ => 0.15,
    }
}

/// Evaluate `edge`'s travel time and effective speed at `current_time`.
///
/// Returns `(+inf, 0.0)` if `free_flow_speed_kmh <= 0`, regardless of
/// predictions — such an edge can never be relaxed onto (§4.4).
pub fn edge_weight(
    edge: &Edge,
    current_time: Instant,
    predictions: Option<&TrafficPredictions>,
    config: &RoutingConfig,
) -> EdgeWeightResult {
    if edge.free_flow_speed_kmh <= 0.0 {
        return EdgeWeightResult {
            travel_time_s: f64::INFINITY,
            effective_speed_kmh: 0.0,
            source: SpeedSource::Fallback,
        };
    }

    // The A* heuristic assumes no edge is traversable faster than
    // `v_max_kmh` (§9, "heuristic admissibility under prediction boosts").
    // A prediction (or a malformed free-flow speed) that exceeds it would
    // silently break that assumption, so every speed leaving this function
    // is clamped here rather than trusted at each call site.
    if config.predictions_enabled {
        if let Some(pred) = predictions.and_then(|p| p.get(&(edge.from, edge.to))) {
            if pred.speed_kmh > 0.0 {
                let clamped_kmh = pred.speed_kmh.min(config.v_max_kmh);
                let travel_time_s = edge.length_m / (clamped_kmh / 3.6);
                return EdgeWeightResult {
                    travel_time_s,
                    effective_speed_kmh: clamped_kmh,
                    source: SpeedSource::Predicted,
                };
            }
        }
    }

    let free_flow_kmh = edge.free_flow_speed_kmh.min(config.v_max_kmh);
    let t0 = edge.length_m / (free_flow_kmh / 3.6);
    let ratio = volume_ratio(current_time.hour());
    let volume = edge.capacity * ratio;
    let vc = if edge.capacity > 0.0 { volume / edge.capacity } else { 0.0 };
    let t = t0 * (1.0 + config.bpr_alpha * vc.powf(config.bpr_beta));
    let effective_speed_kmh = edge.length_m / t * 3.6;

    EdgeWeightResult { travel_time_s: t, effective_speed_kmh, source: SpeedSource::Fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::RoadClass;
    use chrono::TimeZone;
    use eco_core::NodeId;

    fn edge(length_m: f64, free_flow_speed_kmh: f64) -> Edge {
        Edge {
            from: NodeId(0),
            to: NodeId(1),
            length_m,
            free_flow_speed_kmh,
            speed_limit_kmh: free_flow_speed_kmh,
            lanes: 1,
            capacity: 1800.0,
            road_class: RoadClass::Secondary,
            oneway: true,
            shortcut_via: None,
        }
    }

    #[test]
    fn zero_free_flow_speed_is_infinite() {
        let e = edge(1000.0, 0.0);
        let t = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let r = edge_weight(&e, t, None, &RoutingConfig::default());
        assert!(r.travel_time_s.is_infinite());
    }

    #[test]
    fn scenario_1_two_node_bpr_at_midday() {
        // spec §8 scenario 1: 1113.2 m @ 60 km/h, midday volume_ratio=0.6.
        let e = edge(1113.2, 60.0);
        let t = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let r = edge_weight(&e, t, None, &RoutingConfig::default());
        let t0 = 1113.2 / (60.0 / 3.6);
        let expected = t0 * (1.0 + 0.15 * 0.6_f64.powf(4.0));
        assert!((r.travel_time_s - expected).abs() < 1e-9);
        assert_eq!(r.source, SpeedSource::Fallback);
    }

    #[test]
    fn prediction_overrides_bpr() {
        let e = edge(1000.0, 60.0);
        let t = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut preds = TrafficPredictions::new();
        preds.insert((NodeId(0), NodeId(1)), TrafficPrediction { speed_kmh: 20.0, flow: 500.0, congestion: 0.7 });
        let r = edge_weight(&e, t, Some(&preds), &RoutingConfig::default());
        assert_eq!(r.source, SpeedSource::Predicted);
        assert!((r.effective_speed_kmh - 20.0).abs() < 1e-9);
    }

    #[test]
    fn predictions_disabled_falls_back_to_bpr() {
        let e = edge(1000.0, 60.0);
        let t = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut preds = TrafficPredictions::new();
        preds.insert((NodeId(0), NodeId(1)), TrafficPrediction { speed_kmh: 20.0, flow: 500.0, congestion: 0.7 });
        let mut cfg = RoutingConfig::default();
        cfg.predictions_enabled = false;
        let r = edge_weight(&e, t, Some(&preds), &cfg);
        assert_eq!(r.source, SpeedSource::Fallback);
    }

    #[test]
    fn volume_ratio_buckets() {
        assert_eq!(volume_ratio(8), 0.85);
        assert_eq!(volume_ratio(12), 0.6);
        assert_eq!(volume_ratio(6), 0.4);
        assert_eq!(volume_ratio(2), 0.15);
    }
}
