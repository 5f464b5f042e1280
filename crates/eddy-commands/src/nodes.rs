//! Commands over diagram nodes and mixed item batches.

use crate::edges::InputPair;
use crate::Command;
use eddy_core::{DiagramError, EdgeId, EdgeKind, ItemId, NodeId, Pos};
use eddy_diagram::{Diagram, Edge, Node};
use std::any::Any;
use std::collections::HashMap;

/// Adds a node to a diagram. The node is constructed by the caller (factory
/// concern) and owned by the command while detached.
#[derive(Debug)]
pub struct NodeAdd {
    node_id: NodeId,
    node: Option<Node>,
    description: String,
}

impl NodeAdd {
    pub fn new(node: Node) -> Self {
        Self {
            node_id: node.id,
            description: format!("add {}", node.name()),
            node: Some(node),
        }
    }
}

impl Command for NodeAdd {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let node = self
            .node
            .take()
            .ok_or(DiagramError::UnknownNode(self.node_id))?;
        diagram.insert_node(node)?;
        diagram.notify_item_added(ItemId::Node(self.node_id));
        diagram.notify_updated();
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        // Fails with NodeInUse if edges were attached without going through
        // the command layer.
        self.node = Some(diagram.take_node(self.node_id)?);
        diagram.notify_item_removed(ItemId::Node(self.node_id));
        diagram.notify_updated();
        Ok(())
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Moves a batch of nodes. Successive moves of the same node set merge into
/// one undo step, so a drag produces a single history entry.
#[derive(Debug)]
pub struct NodeMove {
    // (node, undo position, redo position)
    moves: Vec<(NodeId, Pos, Pos)>,
    description: String,
}

impl NodeMove {
    /// `moves` pairs every node with its captured old position and the new
    /// one. Old positions must be captured before any mutation.
    pub fn new(diagram: &Diagram, targets: Vec<(NodeId, Pos)>) -> Result<Self, DiagramError> {
        let mut moves = Vec::with_capacity(targets.len());
        for (id, new_pos) in targets {
            let node = diagram.node(id)?;
            moves.push((id, node.pos, new_pos));
        }
        let description = if moves.len() == 1 {
            let (id, _, _) = moves[0];
            format!("move {}", diagram.node(id)?.name())
        } else {
            format!("move {} nodes", moves.len())
        };
        Ok(Self { moves, description })
    }

    fn apply(&self, diagram: &mut Diagram, use_redo: bool) -> Result<(), DiagramError> {
        let mut touched: Vec<EdgeId> = Vec::new();
        for &(id, undo, redo) in &self.moves {
            let node = diagram.node_mut(id)?;
            node.pos = if use_redo { redo } else { undo };
            for &edge in node.edges() {
                if !touched.contains(&edge) {
                    touched.push(edge);
                }
            }
        }
        for edge in touched {
            diagram.update_edge(edge)?;
        }
        diagram.notify_updated();
        Ok(())
    }
}

impl Command for NodeMove {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.apply(diagram, true)
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.apply(diagram, false)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn can_merge(&self, other: &dyn Command) -> bool {
        match other.as_any().downcast_ref::<NodeMove>() {
            Some(other) => {
                other.moves.len() == self.moves.len()
                    && other
                        .moves
                        .iter()
                        .zip(&self.moves)
                        .all(|(a, b)| a.0 == b.0)
            }
            None => false,
        }
    }

    fn merge(&mut self, other: Box<dyn Command>) {
        if let Some(other) = other.as_any().downcast_ref::<NodeMove>() {
            for (mine, theirs) in self.moves.iter_mut().zip(&other.moves) {
                mine.2 = theirs.2;
            }
        }
    }
}

/// Removes a batch of items atomically: edges first, then nodes.
///
/// The batch must be closed over incidence: every incident edge of every
/// removed node has to be part of the batch, otherwise construction fails
/// with `NodeInUse`. For every surviving node with ordered inputs that loses
/// an incoming input edge, the undo/redo variants of its input list are
/// captured up front.
#[derive(Debug)]
pub struct ItemsRemove {
    node_ids: Vec<NodeId>,
    edge_ids: Vec<EdgeId>,
    // Entities owned while detached, plus each removed edge's endpoints.
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    inputs: HashMap<NodeId, InputPair>,
    description: String,
}

impl ItemsRemove {
    pub fn new(diagram: &Diagram, items: Vec<ItemId>) -> Result<Self, DiagramError> {
        let mut node_ids = Vec::new();
        let mut edge_ids = Vec::new();
        for item in &items {
            match *item {
                ItemId::Node(id) => {
                    diagram.node(id)?;
                    node_ids.push(id);
                }
                ItemId::Edge(id) => {
                    diagram.edge(id)?;
                    edge_ids.push(id);
                }
            }
        }

        for &id in &node_ids {
            let node = diagram.node(id)?;
            if node.edges().iter().any(|e| !edge_ids.contains(e)) {
                return Err(DiagramError::NodeInUse(id));
            }
        }

        let mut inputs: HashMap<NodeId, InputPair> = HashMap::new();
        for &id in &edge_ids {
            let edge = diagram.edge(id)?;
            if edge.kind != EdgeKind::INPUT || node_ids.contains(&edge.target) {
                continue;
            }
            let target = diagram.node(edge.target)?;
            if !target.kind.has_ordered_inputs() {
                continue;
            }
            let pair = inputs.entry(edge.target).or_insert_with(|| InputPair {
                undo: target.inputs.clone(),
                redo: target.inputs.clone(),
            });
            if let Some(position) = pair.redo.iter().position(|&e| e == id) {
                pair.redo.remove(position);
            }
        }

        let description = if items.len() == 1 {
            match items[0] {
                ItemId::Node(id) => format!("remove {}", diagram.node(id)?.name()),
                ItemId::Edge(id) => format!("remove {}", diagram.edge(id)?.name()),
            }
        } else {
            format!("remove {} items", items.len())
        };

        Ok(Self {
            node_ids,
            edge_ids,
            nodes: Vec::new(),
            edges: Vec::new(),
            inputs,
            description,
        })
    }
}

impl Command for ItemsRemove {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        for &id in &self.edge_ids {
            let (source, target) = {
                let edge = diagram.edge(id)?;
                (edge.source, edge.target)
            };
            diagram.node_mut(source)?.remove_edge(id);
            diagram.node_mut(target)?.remove_edge(id);
            self.edges.push(diagram.take_edge(id)?);
            diagram.notify_item_removed(ItemId::Edge(id));
        }
        for (&node, pair) in &self.inputs {
            diagram.node_mut(node)?.inputs = pair.redo.clone();
        }
        for &id in &self.node_ids {
            self.nodes.push(diagram.take_node(id)?);
            diagram.notify_item_removed(ItemId::Node(id));
        }
        diagram.notify_updated();
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        for node in self.nodes.drain(..) {
            let id = node.id;
            diagram.insert_node(node)?;
            diagram.notify_item_added(ItemId::Node(id));
        }
        for edge in self.edges.drain(..) {
            let id = edge.id;
            let (source, target) = (edge.source, edge.target);
            diagram.insert_edge(edge)?;
            diagram.node_mut(source)?.add_edge(id);
            diagram.node_mut(target)?.add_edge(id);
            diagram.update_edge(id)?;
            diagram.notify_item_added(ItemId::Edge(id));
        }
        for (&node, pair) in &self.inputs {
            diagram.node_mut(node)?.inputs = pair.undo.clone();
        }
        diagram.notify_updated();
        Ok(())
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
