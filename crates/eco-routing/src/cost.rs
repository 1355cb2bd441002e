//! Scalarized multi-objective edge cost ("CostKernel", C5).

use eco_core::{emission_factor, FuelType};
use eco_graph::{Edge, EdgeWeightResult};

/// Convex combination weights `(α, β, γ, δ)` over `(time, CO₂, congestion,
/// detour)`. The caller is responsible for normalizing so the components
/// sum to at most 1; this type does not renormalize.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
}

impl Weights {
    pub fn new(alpha: f64, beta: f64, gamma: f64, delta: f64) -> Self {
        Self { alpha, beta, gamma, delta }
    }

    /// `true` if every component is in `[0, 1]` and they sum to at most 1
    /// (within floating-point slack). A facade validating a `plan` request
    /// (§6) should reject requests that fail this as `BadRequest`.
    pub fn is_valid(&self) -> bool {
        let in_range = [self.alpha, self.beta, self.gamma, self.delta]
            .iter()
            .all(|w| (0.0..=1.0).contains(w));
        in_range && (self.alpha + self.beta + self.gamma + self.delta) <= 1.0 + 1e-9
    }

    pub const FASTEST: Weights = Weights { alpha: 0.80, beta: 0.10, gamma: 0.05, delta: 0.05 };
    pub const GREENEST: Weights = Weights { alpha: 0.15, beta: 0.65, gamma: 0.15, delta: 0.05 };
    pub const BALANCED: Weights = Weights { alpha: 0.40, beta: 0.30, gamma: 0.20, delta: 0.10 };
    pub const SMOOTHEST: Weights = Weights { alpha: 0.30, beta: 0.10, gamma: 0.55, delta: 0.05 };
}

/// Per-edge breakdown of the scalarized cost, retained on the search
/// frontier so a finished route can report segment-level metrics (§3).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    pub travel_time_s: f64,
    pub speed_kmh: f64,
    pub co2_g: f64,
    pub congestion: f64,
    pub distance_m: f64,
}

/// Evaluate edge `e`'s scalar cost `J(e,t)` (§4.5).
///
/// `detour_ratio` is accepted but left to the caller to compute (§9 open
/// question); pure planning passes `0.0`.
pub fn edge_cost(
    edge: &Edge,
    weight: &EdgeWeightResult,
    weights: Weights,
    fuel: FuelType,
    detour_ratio: f64,
) -> (f64, CostBreakdown) {
    let length_km = edge.length_m / 1000.0;
    let t_norm = weight.travel_time_s / 60.0;

    let congestion = (1.0 - weight.effective_speed_kmh / edge.free_flow_speed_kmh).clamp(0.0, 1.0);
    let ef = emission_factor(weight.effective_speed_kmh, fuel);
    let co2_norm = length_km * ef * (1.0 + 0.5 * congestion) / 100.0;
    let co2_g = length_km * ef;

    let d_norm = detour_ratio;

    let j = weights.alpha * t_norm + weights.beta * co2_norm + weights.gamma * congestion + weights.delta * d_norm;

    let breakdown = CostBreakdown {
        travel_time_s: weight.travel_time_s,
        speed_kmh: weight.effective_speed_kmh,
        co2_g,
        congestion,
        distance_m: edge.length_m,
    };

    (j, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_graph::{RoadClass, SpeedSource};
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
    fn pure_time_weighting_ignores_co2_and_congestion() {
        let e = edge(1000.0, 60.0);
        let w = EdgeWeightResult { travel_time_s: 60.0, effective_speed_kmh: 60.0, source: SpeedSource::Fallback };
        let (j, breakdown) = edge_cost(&e, &w, Weights::new(1.0, 0.0, 0.0, 0.0), FuelType::Petrol, 0.0);
        assert!((j - (60.0 / 60.0)).abs() < 1e-9);
        assert_eq!(breakdown.congestion, 0.0);
    }

    #[test]
    fn congestion_penalizes_slower_than_free_flow() {
        let e = edge(1000.0, 60.0);
        let slow = EdgeWeightResult { travel_time_s: 120.0, effective_speed_kmh: 30.0, source: SpeedSource::Fallback };
        let fast = EdgeWeightResult { travel_time_s: 60.0, effective_speed_kmh: 60.0, source: SpeedSource::Fallback };
        let (_, slow_b) = edge_cost(&e, &slow, Weights::BALANCED, FuelType::Petrol, 0.0);
        let (_, fast_b) = edge_cost(&e, &fast, Weights::BALANCED, FuelType::Petrol, 0.0);
        assert!(slow_b.congestion > fast_b.congestion);
    }

    #[test]
    fn preset_weights_sum_to_one() {
        for w in [Weights::FASTEST, Weights::GREENEST, Weights::BALANCED, Weights::SMOOTHEST] {
            assert!((w.alpha + w.beta + w.gamma + w.delta - 1.0).abs() < 1e-9);
            assert!(w.is_valid());
        }
    }
}
