//! Inverse-law property tests for the edge commands, plus notification
//! ordering checks that unit tests in the crate don't cover.

use eddy_commands::{
    Command, EdgeAdd, EdgeAnchorMove, EdgeBreakpointAdd, EdgeBreakpointMove, EdgeBreakpointRemove,
    EdgeSwap,
};
use eddy_core::{EdgeId, EdgeKind, ItemId, NodeId, NodeKind, Pos};
use eddy_diagram::{Diagram, Edge, Node};
use eddy_events::Event;
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn pos_strategy() -> impl Strategy<Value = Pos> {
    (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Pos::new(x, y))
}

fn breakpoints_strategy() -> impl Strategy<Value = Vec<Pos>> {
    proptest::collection::vec(pos_strategy(), 0..6)
}

fn breakpoints_and_insert_index() -> impl Strategy<Value = (Vec<Pos>, usize)> {
    breakpoints_strategy().prop_flat_map(|bps| {
        let len = bps.len();
        (Just(bps), 0..=len)
    })
}

fn breakpoints_and_existing_index() -> impl Strategy<Value = (Vec<Pos>, usize)> {
    proptest::collection::vec(pos_strategy(), 1..6).prop_flat_map(|bps| {
        let len = bps.len();
        (Just(bps), 0..len)
    })
}

/// One input edge from a role node into a role chain, with the given
/// breakpoints already in place.
fn diagram_with_edge(breakpoints: &[Pos]) -> Diagram {
    let mut diagram = Diagram::new("prop");
    diagram
        .insert_node(Node::new(NodeId(1), NodeKind::ROLE, "r", Pos::new(0.0, 0.0)))
        .unwrap();
    diagram
        .insert_node(Node::new(
            NodeId(2),
            NodeKind::ROLE_CHAIN,
            "",
            Pos::new(200.0, 0.0),
        ))
        .unwrap();
    let mut edge = Edge::new(EdgeId(10), EdgeKind::INPUT, NodeId(1), NodeId(2));
    edge.breakpoints = breakpoints.to_vec();
    let mut cmd = EdgeAdd::new(&mut diagram, edge).unwrap();
    cmd.redo(&mut diagram).unwrap();
    diagram
}

/// Everything a breakpoint/anchor/swap command is allowed to change.
fn edge_state(diagram: &Diagram) -> (NodeId, NodeId, Vec<Pos>, Vec<Pos>, Vec<EdgeId>) {
    let edge = diagram.edge(EdgeId(10)).unwrap();
    (
        edge.source,
        edge.target,
        edge.breakpoints.clone(),
        edge.path.clone(),
        diagram.node(NodeId(2)).unwrap().inputs.clone(),
    )
}

proptest! {
    #[test]
    fn breakpoint_add_is_invertible((bps, index) in breakpoints_and_insert_index(), point in pos_strategy()) {
        let mut diagram = diagram_with_edge(&bps);
        let before = edge_state(&diagram);

        let mut cmd = EdgeBreakpointAdd::new(&diagram, EdgeId(10), index, point).unwrap();
        cmd.redo(&mut diagram).unwrap();
        {
            let edge = diagram.edge(EdgeId(10)).unwrap();
            prop_assert_eq!(edge.breakpoints.len(), bps.len() + 1);
            prop_assert_eq!(edge.breakpoints[index], point);
        }
        let after = edge_state(&diagram);

        cmd.undo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), before);

        cmd.redo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), after);
    }

    #[test]
    fn breakpoint_remove_is_invertible((bps, index) in breakpoints_and_existing_index()) {
        let mut diagram = diagram_with_edge(&bps);
        let before = edge_state(&diagram);

        let mut cmd = EdgeBreakpointRemove::new(&diagram, EdgeId(10), index).unwrap();
        cmd.redo(&mut diagram).unwrap();
        prop_assert_eq!(
            diagram.edge(EdgeId(10)).unwrap().breakpoints.len(),
            bps.len() - 1
        );

        cmd.undo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), before);
    }

    #[test]
    fn breakpoint_move_is_invertible((bps, index) in breakpoints_and_existing_index(), point in pos_strategy()) {
        let mut diagram = diagram_with_edge(&bps);
        let before = edge_state(&diagram);

        let mut cmd = EdgeBreakpointMove::new(&diagram, EdgeId(10), index, point).unwrap();
        cmd.redo(&mut diagram).unwrap();
        prop_assert_eq!(diagram.edge(EdgeId(10)).unwrap().breakpoints[index], point);

        cmd.undo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), before);
    }

    #[test]
    fn anchor_move_is_invertible(bps in breakpoints_strategy(), point in pos_strategy()) {
        let mut diagram = diagram_with_edge(&bps);
        let before = edge_state(&diagram);

        let mut cmd = EdgeAnchorMove::new(&diagram, EdgeId(10), NodeId(2), point).unwrap();
        cmd.redo(&mut diagram).unwrap();
        prop_assert_eq!(diagram.node(NodeId(2)).unwrap().anchor(EdgeId(10)), point);

        cmd.undo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), before);
        prop_assert_eq!(
            diagram.node(NodeId(2)).unwrap().anchor(EdgeId(10)),
            diagram.node(NodeId(2)).unwrap().pos
        );
    }

    #[test]
    fn swap_alternation_is_stable(bps in breakpoints_strategy()) {
        let mut diagram = diagram_with_edge(&bps);
        let before = edge_state(&diagram);

        let mut cmd = EdgeSwap::new(&diagram, vec![EdgeId(10)]).unwrap();
        cmd.redo(&mut diagram).unwrap();
        let swapped = edge_state(&diagram);
        prop_assert_eq!(swapped.0, NodeId(2));
        prop_assert_eq!(swapped.1, NodeId(1));
        let mut reversed = bps.clone();
        reversed.reverse();
        prop_assert_eq!(&swapped.2, &reversed);

        cmd.undo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), before.clone());

        cmd.redo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), swapped);

        cmd.undo(&mut diagram).unwrap();
        prop_assert_eq!(edge_state(&diagram), before);
    }
}

#[test]
fn edge_add_emits_item_added_then_updated() {
    init_tracing();
    let mut diagram = Diagram::new("events");
    diagram
        .insert_node(Node::new(NodeId(1), NodeKind::CONCEPT, "A", Pos::default()))
        .unwrap();
    diagram
        .insert_node(Node::new(
            NodeId(2),
            NodeKind::CONCEPT,
            "B",
            Pos::new(100.0, 0.0),
        ))
        .unwrap();

    let rx = diagram.bus().receiver();
    while rx.try_recv().is_ok() {}

    let edge = Edge::new(EdgeId(10), EdgeKind::INCLUSION, NodeId(1), NodeId(2));
    let mut cmd = EdgeAdd::new(&mut diagram, edge).unwrap();
    cmd.redo(&mut diagram).unwrap();

    assert!(matches!(
        rx.try_recv(),
        Ok(Event::ItemAdded { item: ItemId::Edge(EdgeId(10)), .. })
    ));
    assert!(matches!(rx.try_recv(), Ok(Event::DiagramUpdated)));
    assert!(rx.try_recv().is_err());

    cmd.undo(&mut diagram).unwrap();
    assert!(matches!(
        rx.try_recv(),
        Ok(Event::ItemRemoved { item: ItemId::Edge(EdgeId(10)), .. })
    ));
    assert!(matches!(rx.try_recv(), Ok(Event::DiagramUpdated)));
    assert!(rx.try_recv().is_err());
}

#[test]
fn breakpoint_commands_emit_only_updated() {
    init_tracing();
    let mut diagram = diagram_with_edge(&[]);
    let rx = diagram.bus().receiver();
    while rx.try_recv().is_ok() {}

    let mut cmd = EdgeBreakpointAdd::new(&diagram, EdgeId(10), 0, Pos::new(1.0, 1.0)).unwrap();
    cmd.redo(&mut diagram).unwrap();

    assert!(matches!(rx.try_recv(), Ok(Event::DiagramUpdated)));
    assert!(rx.try_recv().is_err());
}
