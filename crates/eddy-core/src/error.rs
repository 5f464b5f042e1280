use crate::{EdgeId, ItemId, NodeId};
use thiserror::Error;

/// Invariant violations raised by diagram mutation.
///
/// All of these are programming-error class: commands are constructed from
/// already-validated editor state, so none of them should occur at runtime.
/// They are never caught and retried locally; callers surface them as a
/// generic failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("node {0} is not part of the diagram")]
    UnknownNode(NodeId),
    #[error("edge {0} is not part of the diagram")]
    UnknownEdge(EdgeId),
    #[error("item {0} is already part of the diagram")]
    DuplicateItem(ItemId),
    #[error("breakpoint index {index} out of range for edge {edge} ({len} breakpoints)")]
    BreakpointIndexOutOfRange {
        edge: EdgeId,
        index: usize,
        len: usize,
    },
    #[error("edge {edge} is not registered in the input list of node {node}")]
    InputNotRegistered { node: NodeId, edge: EdgeId },
    #[error("node {0} still has incident edges")]
    NodeInUse(NodeId),
}
