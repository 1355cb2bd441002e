//! Routing-subsystem error type.

use thiserror::Error;

use eco_core::NodeId;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no route from {from} to {to}")]
    NotReachable { from: NodeId, to: NodeId },

    #[error("expansion cap ({0}) exceeded before goal was reached")]
    Overflow(usize),

    #[error("search deadline exceeded before goal was reached")]
    DeadlineExceeded,
}

pub type RoutingResult<T> = Result<T, RoutingError>;
