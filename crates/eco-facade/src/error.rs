//! Facade-level error surface (§6 "Error surface").
//!
//! This is the one error type in the workspace that crosses the process
//! boundary: every lower-crate error converts into it so a caller only
//! ever has to match on these four variants.

use thiserror::Error;

use eco_core::NodeId;
use eco_routing::RoutingError;

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("no route from {from} to {to}")]
    NotReachable { from: NodeId, to: NodeId },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("search expansion cap ({0}) exceeded before goal was reached")]
    Overflow(usize),

    #[error("replan suppressed: {0}")]
    ReplanSuppressed(String),
}

impl From<RoutingError> for FacadeError {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::NotReachable { from, to } => FacadeError::NotReachable { from, to },
            RoutingError::Overflow(cap) => FacadeError::Overflow(cap),
            RoutingError::DeadlineExceeded => FacadeError::ReplanSuppressed("search deadline exceeded".into()),
        }
    }
}

pub type FacadeResult<T> = Result<T, FacadeError>;

/// Process exit codes for a CLI harness built on this facade (§6).
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const BAD_INPUT: i32 = 2;
    pub const NOT_REACHABLE: i32 = 3;
    pub const DEADLINE_EXCEEDED: i32 = 4;
}

impl FacadeError {
    /// Map this error to the exit code a CLI harness should return (§6).
    pub fn exit_code(&self) -> i32 {
        match self {
            FacadeError::BadRequest(_) => exit_code::BAD_INPUT,
            FacadeError::NotReachable { .. } => exit_code::NOT_REACHABLE,
            FacadeError::Overflow(_) => exit_code::NOT_REACHABLE,
            FacadeError::ReplanSuppressed(reason) if reason.contains("deadline") => exit_code::DEADLINE_EXCEEDED,
            FacadeError::ReplanSuppressed(_) => exit_code::NOT_REACHABLE,
        }
    }
}
