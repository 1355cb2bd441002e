//! Top-level routing configuration.
//!
//! Analogous to the source framework's `SimConfig`: a plain struct with a
//! `Default` impl matching the documented defaults (§6), constructed by the
//! application from env vars or a config file and handed to the facade.
//! The core itself never reads the environment.

/// Every tunable named in §6 of the specification.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingConfig {
    /// Global upper bound on achievable speed, used by the A* heuristic.
    /// Must be ≥ any predicted or free-flow speed in the graph for the
    /// heuristic to stay admissible.
    pub v_max_kmh: f64,

    /// BPR volume-delay exponent coefficient.
    pub bpr_alpha: f64,

    /// BPR volume-delay exponent.
    pub bpr_beta: f64,

    /// Minimum seconds between periodic re-plans.
    pub replan_interval_s: f64,

    /// Hysteresis margin θ: a candidate route must beat the current one by
    /// at least this fraction before it is committed.
    pub hysteresis_threshold: f64,

    /// Hard ceiling on replans per ride.
    pub max_replans: u32,

    /// Contraction hierarchy: max nodes fully contracted before falling back
    /// to partial (ranking-only) preprocessing.
    pub ch_max_nodes: usize,

    /// A* expansion cap; exceeding it returns "no route found" rather than
    /// running unbounded.
    pub astar_max_iterations: usize,

    /// Whether the facade should consult `TrafficPredictions` at all. When
    /// `false`, every edge falls back to BPR regardless of what a caller
    /// passes in.
    pub predictions_enabled: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            v_max_kmh: 120.0,
            bpr_alpha: 0.15,
            bpr_beta: 4.0,
            replan_interval_s: 45.0,
            hysteresis_threshold: 0.15,
            max_replans: 20,
            ch_max_nodes: 3000,
            astar_max_iterations: 150_000,
            predictions_enabled: true,
        }
    }
}

impl RoutingConfig {
    /// Global speed bound converted to metres/second, as consumed by the
    /// A* heuristic.
    #[inline]
    pub fn v_max_ms(&self) -> f64 {
        self.v_max_kmh / 3.6
    }
}
