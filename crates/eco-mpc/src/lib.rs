//! `eco-mpc` — Model-Predictive-Control re-planning loop with
//! anti-oscillation hysteresis ("ReplanController", C9).
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|------------------------------------------------------------|
//! | [`controller`] | `ReplanController`, `ReplanDecision`, `CommitOutcome`, `ReplanTriggers`, `ReplanStatus` |
//! | [`state`]      | `ReplanState`, `ReplanSummary`                            |
//!
//! A controller never runs a search; the facade owns the graph and engine
//! and feeds search results back in through [`ReplanController::try_commit`].
//! `decide`/`try_commit` return plain enums rather than a crate-specific
//! error type — a ceiling or a hysteresis rejection is an ordinary outcome
//! for a ride in progress, not a failure.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.    |

pub mod controller;
pub mod state;

pub use controller::{CommitOutcome, ReplanController, ReplanDecision, ReplanStatus, ReplanTriggers};
pub use state::{ReplanState, ReplanSummary, HISTORY_CAPACITY};
