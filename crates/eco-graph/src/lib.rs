//! `eco-graph` — road network graph, spatial indexing, and time-dependent
//! edge weights.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|---------------------------------------------------------|
//! | [`network`]    | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `Edge`  |
//! | [`edge_weight`]| `edge_weight`, `TrafficPredictions`, `SpeedSource`       |
//!
//! OSM/Overpass ingestion is explicitly out of scope: the graph is accepted
//! already built via [`RoadGraphBuilder`]. Fallible lookups (`snap_to_node`,
//! `find_edge`) return `Option`, not a crate-specific error type — nothing
//! here can fail in a way that needs more than presence/absence.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.    |

pub mod edge_weight;
pub mod network;

pub use edge_weight::{edge_weight, EdgeWeightResult, SpeedSource, TrafficPrediction, TrafficPredictions};
pub use network::{Edge, RoadClass, RoadGraph, RoadGraphBuilder};
