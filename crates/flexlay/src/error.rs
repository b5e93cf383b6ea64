//! Tree Errors

use thiserror::Error;

/// Errors returned by tree mutations. Numeric oddities (NaN sizes, negative
/// dimensions, huge values) are valid layout inputs and never produce these.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    #[error("child already has an owner and cannot be inserted")]
    ChildAlreadyOwned,

    #[error("nodes with a measure function cannot have children")]
    MeasureNodeCannotHaveChildren,

    #[error("cannot set a measure function on a node with children")]
    MeasureFuncOnNodeWithChildren,

    #[error("only nodes with a measure function can be marked dirty manually")]
    OnlyMeasureNodesCanBeMarkedDirty,

    #[error("child index {index} is out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("node is still attached or has children and cannot be reset")]
    NodeStillInUse,
}
