//! `eco-facade` — the single entry point orchestrating the road graph,
//! time-dependent routing engine, and per-ride replan controllers
//! ("RoutingFacade", C10).
//!
//! # Crate layout
//!
//! | Module    | Contents                                                   |
//! |-----------|---------------------------------------------------------------|
//! | [`facade`]| `RoutingFacade` — `plan`, `pareto`, `replan`                  |
//! | [`types`] | Request/response shapes that cross the process boundary (§6) |
//! | [`error`] | `FacadeError`, `FacadeResult<T>`, CLI exit codes              |
//!
//! This is the only crate that touches [`std::sync`] synchronization
//! primitives directly (§5 "Concurrency & Resource Model"): the process-wide
//! `RoadGraph`/`ContractionHierarchy` are read-only after construction, and
//! each ride's [`eco_mpc::ReplanController`] is guarded by its own mutex
//! inside a `RwLock`-protected map, so replan commits for one ride never
//! block a `plan` or `pareto` call or another ride's replan.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on request/response types. |
//! | `parallel` | Forwards to `eco-routing`'s `parallel` feature.          |

pub mod error;
pub mod facade;
pub mod types;


pub use error::{exit_code, FacadeError, FacadeResult};
pub use facade::RoutingFacade;
pub use types::{
    ParetoRequest, PlanRequest, PlanResponse, Predictions, ReplanRequest, ReplanResponse, ReplanStatusReport,
    TrafficOverlayPoint,
};
