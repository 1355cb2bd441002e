//! `eco-core` — foundational types shared by every `eco-*` crate.
//!
//! This crate is a dependency of every other `eco-*` crate. It intentionally
//! has no `eco-*` dependencies and minimal external ones (`thiserror` and
//! `chrono`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                            |
//! |---------------|------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`, `RideId`                          |
//! | [`geo`]       | `GeoPoint`, haversine distance, polyline projection   |
//! | [`time`]      | `Instant`, `advance_secs`, `elapsed_secs`             |
//! | [`config`]    | `RoutingConfig`                                       |
//! | [`emissions`] | `FuelType`, fuel/CO₂ model, carpool savings           |
//! | [`error`]     | `EcoError`, `EcoResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod config;
pub mod emissions;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoutingConfig;
pub use emissions::{carpool_savings, co2_to_tree_days, emission_factor, fuel_consumption, CarpoolSavings, FuelType, RideSegment};
pub use error::{EcoError, EcoResult};
pub use geo::{project_point_onto_polyline, GeoPoint, PolylineProjection};
pub use ids::{EdgeId, NodeId, RideId};
pub use time::{advance_secs, elapsed_secs, Instant};
