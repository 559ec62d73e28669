use thiserror::Error;

use crate::types::AgentId;

/// Errors raised by the Harvest engine.
///
/// `OutOfBounds` is a programming error on grid accessors. The per-entry
/// variants (`InvalidAction`, `UnknownAgent`, `DuplicateAction`) only reject
/// the offending batch entry; the rest of the tick still runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HarvestError {
    #[error("Cell ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        height: usize,
        width: usize,
    },

    #[error("Action index {action} for {agent} is not a recognized action")]
    InvalidAction { agent: AgentId, action: usize },

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),

    #[error("More than one action submitted for {0} in a single tick")]
    DuplicateAction(AgentId),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
