//! Commands over diagram edges: attach/detach, breakpoint editing, anchor
//! moves and endpoint swaps.

use crate::Command;
use eddy_core::{DiagramError, EdgeId, EdgeKind, ItemId, NodeId, Pos};
use eddy_diagram::{Diagram, Edge};
use std::any::Any;
use std::collections::HashMap;

/// Undo/redo variants of one node's ordered input list, captured at command
/// construction. Always applied by copy so the two variants never alias.
#[derive(Debug, Clone)]
pub(crate) struct InputPair {
    pub(crate) undo: Vec<EdgeId>,
    pub(crate) redo: Vec<EdgeId>,
}

/// Adds an edge to a diagram.
///
/// The constructor already wires the edge into both endpoints' incidence
/// lists and, for an input edge targeting a node with ordered inputs,
/// appends the edge id to that node's input list before snapshotting the
/// undo/redo variants. Attachment and input-order bookkeeping are separate,
/// explicit steps here; plain adjacency registration never touches `inputs`.
#[derive(Debug)]
pub struct EdgeAdd {
    edge_id: EdgeId,
    source: NodeId,
    target: NodeId,
    // Owned while detached from the arena.
    edge: Option<Edge>,
    inputs: Option<InputPair>,
    description: String,
}

impl EdgeAdd {
    pub fn new(diagram: &mut Diagram, mut edge: Edge) -> Result<Self, DiagramError> {
        let description = format!("add {}", edge.name());
        let id = edge.id;
        let source = edge.source;
        let target = edge.target;

        diagram.node_mut(source)?.add_edge(id);
        diagram.node_mut(target)?.add_edge(id);

        let mut inputs = None;
        if edge.kind == EdgeKind::INPUT {
            let target_node = diagram.node_mut(target)?;
            if target_node.kind.has_ordered_inputs() {
                let undo = target_node.inputs.clone();
                target_node.inputs.push(id);
                let redo = target_node.inputs.clone();
                inputs = Some(InputPair { undo, redo });
            }
        }

        diagram.route_edge(&mut edge)?;

        Ok(Self {
            edge_id: id,
            source,
            target,
            edge: Some(edge),
            inputs,
            description,
        })
    }
}

impl Command for EdgeAdd {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let edge = self
            .edge
            .take()
            .ok_or(DiagramError::UnknownEdge(self.edge_id))?;
        // Map source/target over the edge.
        diagram.node_mut(self.source)?.add_edge(self.edge_id);
        diagram.node_mut(self.target)?.add_edge(self.edge_id);
        // Switch the inputs.
        if let Some(pair) = &self.inputs {
            diagram.node_mut(self.target)?.inputs = pair.redo.clone();
        }
        // Add the edge to the diagram and recompute its geometry.
        diagram.insert_edge(edge)?;
        diagram.update_edge(self.edge_id)?;
        diagram.notify_item_added(ItemId::Edge(self.edge_id));
        diagram.notify_updated();
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        // Remove source/target from the edge.
        diagram.node_mut(self.source)?.remove_edge(self.edge_id);
        diagram.node_mut(self.target)?.remove_edge(self.edge_id);
        // Switch the inputs.
        if let Some(pair) = &self.inputs {
            diagram.node_mut(self.target)?.inputs = pair.undo.clone();
        }
        // Remove the edge from the diagram, keeping it alive for redo.
        self.edge = Some(diagram.take_edge(self.edge_id)?);
        diagram.notify_item_removed(ItemId::Edge(self.edge_id));
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

/// Adds a breakpoint on an edge.
#[derive(Debug)]
pub struct EdgeBreakpointAdd {
    edge: EdgeId,
    index: usize,
    point: Pos,
    description: String,
}

impl EdgeBreakpointAdd {
    pub fn new(
        diagram: &Diagram,
        edge: EdgeId,
        index: usize,
        point: Pos,
    ) -> Result<Self, DiagramError> {
        let e = diagram.edge(edge)?;
        let len = e.breakpoints.len();
        if index > len {
            return Err(DiagramError::BreakpointIndexOutOfRange { edge, index, len });
        }
        Ok(Self {
            edge,
            index,
            point,
            description: format!("add {} breakpoint", e.name()),
        })
    }
}

impl Command for EdgeBreakpointAdd {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let e = diagram.edge_mut(self.edge)?;
        let len = e.breakpoints.len();
        if self.index > len {
            return Err(DiagramError::BreakpointIndexOutOfRange {
                edge: self.edge,
                index: self.index,
                len,
            });
        }
        e.breakpoints.insert(self.index, self.point);
        diagram.update_edge(self.edge)?;
        diagram.notify_updated();
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let e = diagram.edge_mut(self.edge)?;
        let len = e.breakpoints.len();
        if self.index >= len {
            return Err(DiagramError::BreakpointIndexOutOfRange {
                edge: self.edge,
                index: self.index,
                len,
            });
        }
        e.breakpoints.remove(self.index);
        diagram.update_edge(self.edge)?;
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

/// Moves an existing breakpoint of an edge.
#[derive(Debug)]
pub struct EdgeBreakpointMove {
    edge: EdgeId,
    index: usize,
    undo: Pos,
    redo: Pos,
    description: String,
}

impl EdgeBreakpointMove {
    /// Captures the current point at `index` as the undo value.
    pub fn new(
        diagram: &Diagram,
        edge: EdgeId,
        index: usize,
        point: Pos,
    ) -> Result<Self, DiagramError> {
        let e = diagram.edge(edge)?;
        let len = e.breakpoints.len();
        let undo = *e
            .breakpoints
            .get(index)
            .ok_or(DiagramError::BreakpointIndexOutOfRange { edge, index, len })?;
        Ok(Self {
            edge,
            index,
            undo,
            redo: point,
            description: format!("move {} breakpoint", e.name()),
        })
    }

    fn apply(&self, diagram: &mut Diagram, point: Pos) -> Result<(), DiagramError> {
        let e = diagram.edge_mut(self.edge)?;
        let len = e.breakpoints.len();
        let slot = e.breakpoints.get_mut(self.index).ok_or(
            DiagramError::BreakpointIndexOutOfRange {
                edge: self.edge,
                index: self.index,
                len,
            },
        )?;
        *slot = point;
        diagram.update_edge(self.edge)?;
        diagram.notify_updated();
        Ok(())
    }
}

impl Command for EdgeBreakpointMove {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.apply(diagram, self.redo)
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.apply(diagram, self.undo)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Deletes a breakpoint from an edge. The removed point is captured at
/// construction, before any mutation, so undo restores it exactly.
#[derive(Debug)]
pub struct EdgeBreakpointRemove {
    edge: EdgeId,
    index: usize,
    point: Pos,
    description: String,
}

impl EdgeBreakpointRemove {
    pub fn new(diagram: &Diagram, edge: EdgeId, index: usize) -> Result<Self, DiagramError> {
        let e = diagram.edge(edge)?;
        let len = e.breakpoints.len();
        let point = *e
            .breakpoints
            .get(index)
            .ok_or(DiagramError::BreakpointIndexOutOfRange { edge, index, len })?;
        Ok(Self {
            edge,
            index,
            point,
            description: format!("remove {} breakpoint", e.name()),
        })
    }
}

impl Command for EdgeBreakpointRemove {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let e = diagram.edge_mut(self.edge)?;
        let len = e.breakpoints.len();
        if self.index >= len {
            return Err(DiagramError::BreakpointIndexOutOfRange {
                edge: self.edge,
                index: self.index,
                len,
            });
        }
        e.breakpoints.remove(self.index);
        diagram.update_edge(self.edge)?;
        diagram.notify_updated();
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let e = diagram.edge_mut(self.edge)?;
        let len = e.breakpoints.len();
        if self.index > len {
            return Err(DiagramError::BreakpointIndexOutOfRange {
                edge: self.edge,
                index: self.index,
                len,
            });
        }
        e.breakpoints.insert(self.index, self.point);
        diagram.update_edge(self.edge)?;
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

/// Moves the anchor point an edge uses on one of its endpoint nodes.
/// Anchors are keyed per (node, edge) pair.
#[derive(Debug)]
pub struct EdgeAnchorMove {
    edge: EdgeId,
    node: NodeId,
    undo: Pos,
    redo: Pos,
    description: String,
}

impl EdgeAnchorMove {
    /// Captures the node's current anchor for `edge` as the undo value.
    pub fn new(
        diagram: &Diagram,
        edge: EdgeId,
        node: NodeId,
        point: Pos,
    ) -> Result<Self, DiagramError> {
        let description = format!("move {} anchor point", diagram.edge(edge)?.name());
        let undo = diagram.node(node)?.anchor(edge);
        Ok(Self {
            edge,
            node,
            undo,
            redo: point,
            description,
        })
    }

    fn apply(&self, diagram: &mut Diagram, point: Pos) -> Result<(), DiagramError> {
        diagram.node_mut(self.node)?.set_anchor(self.edge, point);
        diagram.update_edge(self.edge)?;
        diagram.notify_updated();
        Ok(())
    }
}

impl Command for EdgeAnchorMove {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.apply(diagram, self.redo)
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.apply(diagram, self.undo)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Reverses the direction of a set of edges atomically.
///
/// For every input edge whose endpoint has ordered inputs, the constructor
/// precomputes that node's post-swap input list in two full passes over the
/// edge set: first remove the ids of edges that stop being incoming inputs,
/// then append the ids of edges that become incoming inputs. The passes are
/// never interleaved per-edge, because one node can be eligible through the
/// source of one affected edge and the target of another.
#[derive(Debug)]
pub struct EdgeSwap {
    edges: Vec<EdgeId>,
    inputs: HashMap<NodeId, InputPair>,
    description: String,
}

impl EdgeSwap {
    pub fn new(diagram: &Diagram, edges: Vec<EdgeId>) -> Result<Self, DiagramError> {
        let mut inputs: HashMap<NodeId, InputPair> = HashMap::new();
        for &id in &edges {
            let edge = diagram.edge(id)?;
            if edge.kind != EdgeKind::INPUT {
                continue;
            }
            for endpoint in [edge.source, edge.target] {
                let node = diagram.node(endpoint)?;
                if node.kind.has_ordered_inputs() && !inputs.contains_key(&endpoint) {
                    inputs.insert(
                        endpoint,
                        InputPair {
                            undo: node.inputs.clone(),
                            redo: node.inputs.clone(),
                        },
                    );
                }
            }
        }

        // Remove pass: these edges stop being incoming inputs of their
        // current target. A missing id means the pre-state is inconsistent.
        for &id in &edges {
            let edge = diagram.edge(id)?;
            if edge.kind != EdgeKind::INPUT {
                continue;
            }
            if let Some(pair) = inputs.get_mut(&edge.target) {
                let position = pair.redo.iter().position(|&e| e == id).ok_or(
                    DiagramError::InputNotRegistered {
                        node: edge.target,
                        edge: id,
                    },
                )?;
                pair.redo.remove(position);
            }
        }

        // Append pass: after the swap these edges point into their current
        // source.
        for &id in &edges {
            let edge = diagram.edge(id)?;
            if edge.kind != EdgeKind::INPUT {
                continue;
            }
            if let Some(pair) = inputs.get_mut(&edge.source) {
                pair.redo.push(id);
            }
        }

        let description = if edges.len() == 1 {
            format!("swap {}", diagram.edge(edges[0])?.name())
        } else {
            format!("swap {} edges", edges.len())
        };

        Ok(Self {
            edges,
            inputs,
            description,
        })
    }

    fn swap(&self, diagram: &mut Diagram, use_redo: bool) -> Result<(), DiagramError> {
        // Swap the edges.
        for &id in &self.edges {
            let edge = diagram.edge_mut(id)?;
            std::mem::swap(&mut edge.source, &mut edge.target);
            edge.breakpoints.reverse();
            let endpoints = [edge.source, edge.target];
            for (i, node) in endpoints.into_iter().enumerate() {
                if i == 1 && endpoints[0] == endpoints[1] {
                    continue;
                }
                if let Some(pair) = self.inputs.get(&node) {
                    let variant = if use_redo { &pair.redo } else { &pair.undo };
                    diagram.node_mut(node)?.inputs = variant.clone();
                }
            }
            diagram.update_edge(id)?;
        }
        // Identify all the endpoints, only once the whole batch of
        // topological changes is in place.
        let mut requested: Vec<NodeId> = Vec::new();
        for &id in &self.edges {
            let edge = diagram.edge(id)?;
            for node in [edge.source, edge.target] {
                if !requested.contains(&node) {
                    requested.push(node);
                    diagram.request_identification(node);
                }
            }
        }
        diagram.notify_updated();
        Ok(())
    }
}

impl Command for EdgeSwap {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.swap(diagram, true)
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        self.swap(diagram, false)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::NodeKind;
    use eddy_diagram::Node;

    fn node(id: i64, kind: NodeKind) -> Node {
        Node::new(NodeId(id), kind, "", Pos::new(id as f32 * 100.0, 0.0))
    }

    fn attach(diagram: &mut Diagram, edge: Edge) -> EdgeAdd {
        let mut cmd = EdgeAdd::new(diagram, edge).unwrap();
        cmd.redo(diagram).unwrap();
        cmd
    }

    fn role_chain_fixture() -> Diagram {
        // Two roles feeding a role chain: inputs [e10, e11].
        let mut diagram = Diagram::new("test");
        diagram.insert_node(node(1, NodeKind::ROLE)).unwrap();
        diagram.insert_node(node(2, NodeKind::ROLE)).unwrap();
        diagram.insert_node(node(3, NodeKind::ROLE_CHAIN)).unwrap();
        attach(
            &mut diagram,
            Edge::new(EdgeId(10), EdgeKind::INPUT, NodeId(1), NodeId(3)),
        );
        attach(
            &mut diagram,
            Edge::new(EdgeId(11), EdgeKind::INPUT, NodeId(2), NodeId(3)),
        );
        diagram
    }

    #[test]
    fn add_input_edge_appends_to_input_order() {
        let mut diagram = role_chain_fixture();
        diagram.insert_node(node(4, NodeKind::ROLE)).unwrap();

        let edge = Edge::new(EdgeId(12), EdgeKind::INPUT, NodeId(4), NodeId(3));
        let mut cmd = EdgeAdd::new(&mut diagram, edge).unwrap();
        // Construction already wires adjacency and the input entry.
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(10), EdgeId(11), EdgeId(12)]
        );

        cmd.redo(&mut diagram).unwrap();
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(10), EdgeId(11), EdgeId(12)]
        );
        assert!(diagram.contains(ItemId::Edge(EdgeId(12))));

        cmd.undo(&mut diagram).unwrap();
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(10), EdgeId(11)]
        );
        assert!(!diagram.contains(ItemId::Edge(EdgeId(12))));
        assert!(!diagram.node(NodeId(4)).unwrap().has_edge(EdgeId(12)));

        cmd.redo(&mut diagram).unwrap();
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(10), EdgeId(11), EdgeId(12)]
        );
    }

    #[test]
    fn add_first_input_edge_scenario() {
        let mut diagram = Diagram::new("test");
        diagram.insert_node(node(1, NodeKind::ROLE)).unwrap();
        diagram.insert_node(node(2, NodeKind::ROLE_CHAIN)).unwrap();

        let edge = Edge::new(EdgeId(10), EdgeKind::INPUT, NodeId(1), NodeId(2));
        let mut cmd = EdgeAdd::new(&mut diagram, edge).unwrap();
        cmd.redo(&mut diagram).unwrap();
        assert_eq!(diagram.node(NodeId(2)).unwrap().inputs, vec![EdgeId(10)]);

        cmd.undo(&mut diagram).unwrap();
        assert!(diagram.node(NodeId(2)).unwrap().inputs.is_empty());
    }

    #[test]
    fn add_plain_edge_never_touches_inputs() {
        let mut diagram = Diagram::new("test");
        diagram.insert_node(node(1, NodeKind::CONCEPT)).unwrap();
        diagram.insert_node(node(2, NodeKind::ROLE_CHAIN)).unwrap();

        attach(
            &mut diagram,
            Edge::new(EdgeId(10), EdgeKind::INCLUSION, NodeId(1), NodeId(2)),
        );
        assert!(diagram.node(NodeId(2)).unwrap().inputs.is_empty());
    }

    #[test]
    fn breakpoint_add_validates_index() {
        let mut diagram = role_chain_fixture();
        assert!(matches!(
            EdgeBreakpointAdd::new(&diagram, EdgeId(10), 1, Pos::default()),
            Err(DiagramError::BreakpointIndexOutOfRange { .. })
        ));

        let mut cmd = EdgeBreakpointAdd::new(&diagram, EdgeId(10), 0, Pos::new(5.0, 5.0)).unwrap();
        cmd.redo(&mut diagram).unwrap();
        assert_eq!(
            diagram.edge(EdgeId(10)).unwrap().breakpoints,
            vec![Pos::new(5.0, 5.0)]
        );
        cmd.undo(&mut diagram).unwrap();
        assert!(diagram.edge(EdgeId(10)).unwrap().breakpoints.is_empty());
    }

    #[test]
    fn breakpoint_remove_restores_exact_point() {
        let mut diagram = role_chain_fixture();
        let p0 = Pos::new(10.0, 1.0);
        let p1 = Pos::new(20.0, 2.0);
        diagram.edge_mut(EdgeId(10)).unwrap().breakpoints = vec![p0, p1];

        let mut cmd = EdgeBreakpointRemove::new(&diagram, EdgeId(10), 0).unwrap();
        cmd.redo(&mut diagram).unwrap();
        assert_eq!(diagram.edge(EdgeId(10)).unwrap().breakpoints, vec![p1]);

        cmd.undo(&mut diagram).unwrap();
        assert_eq!(diagram.edge(EdgeId(10)).unwrap().breakpoints, vec![p0, p1]);
    }

    #[test]
    fn breakpoint_move_swaps_between_captured_points() {
        let mut diagram = role_chain_fixture();
        let old = Pos::new(10.0, 1.0);
        let new = Pos::new(42.0, -7.0);
        diagram.edge_mut(EdgeId(10)).unwrap().breakpoints = vec![old];

        let mut cmd = EdgeBreakpointMove::new(&diagram, EdgeId(10), 0, new).unwrap();
        cmd.redo(&mut diagram).unwrap();
        assert_eq!(diagram.edge(EdgeId(10)).unwrap().breakpoints, vec![new]);
        cmd.undo(&mut diagram).unwrap();
        assert_eq!(diagram.edge(EdgeId(10)).unwrap().breakpoints, vec![old]);
    }

    #[test]
    fn anchor_move_roundtrip_updates_path() {
        let mut diagram = role_chain_fixture();
        let target = Pos::new(290.0, 10.0);

        let mut cmd = EdgeAnchorMove::new(&diagram, EdgeId(10), NodeId(3), target).unwrap();
        cmd.redo(&mut diagram).unwrap();
        assert_eq!(diagram.node(NodeId(3)).unwrap().anchor(EdgeId(10)), target);
        assert_eq!(diagram.edge(EdgeId(10)).unwrap().path.last(), Some(&target));

        cmd.undo(&mut diagram).unwrap();
        // Default anchor is the node position.
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().anchor(EdgeId(10)),
            diagram.node(NodeId(3)).unwrap().pos
        );
    }

    #[test]
    fn swap_reverses_endpoints_and_breakpoints() {
        let mut diagram = role_chain_fixture();
        let p0 = Pos::new(10.0, 1.0);
        let p1 = Pos::new(20.0, 2.0);
        diagram.edge_mut(EdgeId(10)).unwrap().breakpoints = vec![p0, p1];

        let mut cmd = EdgeSwap::new(&diagram, vec![EdgeId(10)]).unwrap();
        assert_eq!(cmd.description(), "swap input edge");

        cmd.redo(&mut diagram).unwrap();
        {
            let edge = diagram.edge(EdgeId(10)).unwrap();
            assert_eq!(edge.source, NodeId(3));
            assert_eq!(edge.target, NodeId(1));
            assert_eq!(edge.breakpoints, vec![p1, p0]);
        }
        // No longer an incoming input of the chain node; it became one of
        // its outgoing edges instead.
        assert_eq!(diagram.node(NodeId(3)).unwrap().inputs, vec![EdgeId(11)]);

        cmd.undo(&mut diagram).unwrap();
        {
            let edge = diagram.edge(EdgeId(10)).unwrap();
            assert_eq!(edge.source, NodeId(1));
            assert_eq!(edge.target, NodeId(3));
            assert_eq!(edge.breakpoints, vec![p0, p1]);
        }
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(10), EdgeId(11)]
        );
    }

    #[test]
    fn swap_many_edges_description_is_plural() {
        let diagram = role_chain_fixture();
        let cmd = EdgeSwap::new(&diagram, vec![EdgeId(10), EdgeId(11)]).unwrap();
        assert_eq!(cmd.description(), "swap 2 edges");
    }

    #[test]
    fn swap_node_eligible_as_source_and_target() {
        // Chain node 3 is the target of input edge 10 and the source of
        // input edge 12 into a property assertion node 5. Swapping both
        // must leave exactly one entry for edge 12 in node 3's redo list.
        let mut diagram = role_chain_fixture();
        diagram
            .insert_node(node(5, NodeKind::PROPERTY_ASSERTION))
            .unwrap();
        attach(
            &mut diagram,
            Edge::new(EdgeId(12), EdgeKind::INPUT, NodeId(3), NodeId(5)),
        );
        assert_eq!(diagram.node(NodeId(5)).unwrap().inputs, vec![EdgeId(12)]);

        let mut cmd = EdgeSwap::new(&diagram, vec![EdgeId(10), EdgeId(12)]).unwrap();
        cmd.redo(&mut diagram).unwrap();

        // Edge 10 left the chain's input list, edge 12 entered it once.
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(11), EdgeId(12)]
        );
        // Edge 12 no longer feeds the assertion node.
        assert!(diagram.node(NodeId(5)).unwrap().inputs.is_empty());

        cmd.undo(&mut diagram).unwrap();
        assert_eq!(
            diagram.node(NodeId(3)).unwrap().inputs,
            vec![EdgeId(10), EdgeId(11)]
        );
        assert_eq!(diagram.node(NodeId(5)).unwrap().inputs, vec![EdgeId(12)]);
    }

    #[test]
    fn swap_detects_inconsistent_input_list() {
        let mut diagram = role_chain_fixture();
        // Corrupt the pre-state: drop edge 10 from the chain's input list.
        diagram.node_mut(NodeId(3)).unwrap().inputs = vec![EdgeId(11)];

        assert_eq!(
            EdgeSwap::new(&diagram, vec![EdgeId(10)]).err(),
            Some(DiagramError::InputNotRegistered {
                node: NodeId(3),
                edge: EdgeId(10),
            })
        );
    }

    #[test]
    fn swap_requests_identification_after_batch() {
        let mut diagram = role_chain_fixture();
        let rx = diagram.bus().receiver();
        // Drain construction-time noise.
        while rx.try_recv().is_ok() {}

        let mut cmd = EdgeSwap::new(&diagram, vec![EdgeId(10)]).unwrap();
        cmd.redo(&mut diagram).unwrap();

        let mut identified = Vec::new();
        let mut updates = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                eddy_events::Event::NodeIdentificationRequested { id } => identified.push(id),
                eddy_events::Event::DiagramUpdated => updates += 1,
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(identified, vec![NodeId(3), NodeId(1)]);
        assert_eq!(updates, 1);
    }
}
