use eddy_core::{EdgeId, Identity, NodeId, NodeKind, Pos};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A diagram node: one Graphol construct placed on the scene.
///
/// Incident edges are tracked by id in insertion order. The `inputs` list is
/// only meaningful for kinds with ordered inputs (role chain, property
/// assertion); adjacency bookkeeping never touches it. Commands append and
/// remove input ids explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub pos: Pos,
    pub identity: Identity,
    /// Ordered incoming-input list, argument order of the generated axiom.
    pub inputs: Vec<EdgeId>,
    edges: Vec<EdgeId>,
    anchors: HashMap<EdgeId, Pos>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, label: impl Into<String>, pos: Pos) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            pos,
            identity: kind.identity(),
            inputs: Vec::new(),
            edges: Vec::new(),
            anchors: HashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.label()
    }

    /// Register an incident edge. Pure adjacency bookkeeping: idempotent,
    /// keeps insertion order, does not touch `inputs`.
    pub fn add_edge(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    /// Deregister an incident edge. The anchor for that edge is kept: a
    /// detached edge may be reattached by an undo/redo cycle and must come
    /// back at the same boundary point.
    pub fn remove_edge(&mut self, edge: EdgeId) {
        self.edges.retain(|&e| e != edge);
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn has_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Where `edge` visually attaches on this node's boundary. Defaults to
    /// the node position until an anchor is set.
    pub fn anchor(&self, edge: EdgeId) -> Pos {
        self.anchors.get(&edge).copied().unwrap_or(self.pos)
    }

    pub fn set_anchor(&mut self, edge: EdgeId, pos: Pos) {
        self.anchors.insert(edge, pos);
    }
}
