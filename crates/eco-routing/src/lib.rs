//! `eco-routing` — time-dependent A* search, multi-objective cost kernel,
//! contraction hierarchies, and Pareto route enumeration.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|------------------------------------------------------------|
//! | [`cost`]   | `Weights`, `CostBreakdown`, `edge_cost` ("CostKernel", C5) |
//! | [`astar`]  | `AStarEngine`, `SearchRequest` ("AStarEngine", C6)         |
//! | [`ch`]     | `ContractionHierarchy`, `out_edges` overlay ("CH", C7)     |
//! | [`pareto`] | `plan_pareto`, `PARESETS` ("ParetoPlanner", C8)            |
//! | [`route`]  | `Route`, `Segment`                                          |
//! | [`error`]  | `RoutingError`, `RoutingResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.      |
//! | `parallel` | Runs [`pareto::plan_pareto`]'s four preset searches on a `rayon` pool. |

pub mod astar;
pub mod ch;
pub mod cost;
pub mod error;
pub mod pareto;
pub mod route;

pub use astar::{AStarEngine, SearchRequest};
pub use ch::{ContractionHierarchy, EdgeHandle};
pub use cost::{edge_cost, CostBreakdown, Weights};
pub use error::{RoutingError, RoutingResult};
pub use pareto::{plan_pareto, PresetRoute, PRESETS};
pub use route::{Route, Segment};
