//! Shared base error type.
//!
//! Sub-crates define their own error enums (`EcoError` is deliberately not
//! a catch-all) and convert into them via `From` impls where it keeps error
//! sites clean. This type covers the handful of failures that are common to
//! every crate in the workspace.

use thiserror::Error;

use crate::NodeId;

#[derive(Debug, Error)]
pub enum EcoError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EcoResult<T> = Result<T, EcoError>;
