use eddy_core::{EdgeId, EdgeKind, NodeId, Pos};
use serde::{Deserialize, Serialize};

/// A diagram edge between two nodes.
///
/// `breakpoints` are the user-placed polyline waypoints, ordered from source
/// to target. `path` is the cached routed polyline (source anchor,
/// breakpoints, target anchor) recomputed by [`crate::Diagram::update_edge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub kind: EdgeKind,
    pub source: NodeId,
    pub target: NodeId,
    pub breakpoints: Vec<Pos>,
    pub path: Vec<Pos>,
}

impl Edge {
    pub fn new(id: EdgeId, kind: EdgeKind, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            kind,
            source,
            target,
            breakpoints: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.label()
    }
}
