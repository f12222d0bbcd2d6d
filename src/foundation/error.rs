use crate::foundation::core::{NodeId, Rect};

/// Result alias used across the crate.
pub type PortaResult<T> = Result<T, PortaError>;

/// Every failure the engine reports.
///
/// Variants carry the offending node, slot, rect or name so callers can tell which part of a
/// graph or request was rejected.
#[derive(thiserror::Error, Debug)]
pub enum PortaError {
    #[error("invalid dimension: {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    #[error("out of range: ({x}, {y}) outside {width}x{height}")]
    OutOfRange {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    #[error("unknown operator: `{0}`")]
    UnknownOperator(String),

    #[error("unknown slot: `{slot}` on {node} ({op})")]
    UnknownSlot {
        node: NodeId,
        op: String,
        slot: String,
    },

    #[error("unknown parameter: `{name}` for `{op}`")]
    UnknownParameter { op: String, name: String },

    #[error("invalid parameter: `{name}` for `{op}`: {reason}")]
    InvalidParameter {
        op: String,
        name: String,
        reason: String,
    },

    #[error("unknown pixel format: `{0}`")]
    UnknownFormat(String),

    #[error("invalid scale: {0}")]
    InvalidScale(f64),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("cyclic graph: {consumer}.{slot} <- {producer}")]
    CyclicGraph {
        consumer: NodeId,
        slot: &'static str,
        producer: NodeId,
    },

    #[error("missing input: {node}.{slot} is unbound (requested {rect})")]
    MissingInput {
        node: NodeId,
        slot: &'static str,
        rect: Rect,
    },

    #[error("concurrent modification: plan compiled at revision {planned}, graph is at {current}")]
    ConcurrentModification { planned: u64, current: u64 },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PortaError {
    pub fn format_mismatch(msg: impl Into<String>) -> Self {
        Self::FormatMismatch(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn invalid_parameter(
        op: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            op: op.into(),
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
