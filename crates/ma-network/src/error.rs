//! Network-subsystem error type.

use thiserror::Error;

use ma_core::{CoreError, NodeId};

/// Errors produced by `ma-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
