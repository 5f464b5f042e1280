use crate::{Edge, Node};
use eddy_core::{DiagramError, EdgeId, EdgeKind, Identity, ItemId, NodeId};
use eddy_events::{Event, EventBus};
use std::collections::HashMap;

/// The diagram aggregate: an arena of nodes and edges addressed by stable
/// ids, plus the notification bus the command layer publishes on.
///
/// Structural invariant: every stored edge's endpoints are stored nodes, and
/// a node can only be taken out once no incident edges remain. Commands hold
/// ids and snapshots, never references into the arena; entities detached by
/// `take_node`/`take_edge` are moved out by value and can be reattached later
/// by the same command.
#[derive(Debug)]
pub struct Diagram {
    name: String,
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    // Insertion order, for stable iteration.
    order: Vec<ItemId>,
    bus: EventBus,
}

impl Diagram {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_bus(name, EventBus::new())
    }

    pub fn with_bus(name: impl Into<String>, bus: EventBus) -> Self {
        Self {
            name: name.into(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
            order: Vec::new(),
            bus,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node, DiagramError> {
        self.nodes.get(&id).ok_or(DiagramError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DiagramError> {
        self.nodes.get_mut(&id).ok_or(DiagramError::UnknownNode(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, DiagramError> {
        self.edges.get(&id).ok_or(DiagramError::UnknownEdge(id))
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, DiagramError> {
        self.edges.get_mut(&id).ok_or(DiagramError::UnknownEdge(id))
    }

    pub fn contains(&self, item: ItemId) -> bool {
        match item {
            ItemId::Node(id) => self.nodes.contains_key(&id),
            ItemId::Edge(id) => self.edges.contains_key(&id),
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ------------------------------------------------------------------
    // Storage attach/detach. Structural only: no notifications, no
    // adjacency bookkeeping. Commands drive both explicitly.
    // ------------------------------------------------------------------

    pub fn insert_node(&mut self, node: Node) -> Result<(), DiagramError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(DiagramError::DuplicateItem(ItemId::Node(id)));
        }
        self.nodes.insert(id, node);
        self.order.push(ItemId::Node(id));
        Ok(())
    }

    pub fn insert_edge(&mut self, edge: Edge) -> Result<(), DiagramError> {
        let id = edge.id;
        if self.edges.contains_key(&id) {
            return Err(DiagramError::DuplicateItem(ItemId::Edge(id)));
        }
        for endpoint in [edge.source, edge.target] {
            if !self.nodes.contains_key(&endpoint) {
                tracing::warn!(
                    "Rejecting edge {} because endpoint node {} is missing from diagram '{}'",
                    id,
                    endpoint,
                    self.name
                );
                return Err(DiagramError::UnknownNode(endpoint));
            }
        }
        self.edges.insert(id, edge);
        self.order.push(ItemId::Edge(id));
        Ok(())
    }

    /// Detach a node from storage. The node must have no incident edges
    /// left; callers remove those first.
    pub fn take_node(&mut self, id: NodeId) -> Result<Node, DiagramError> {
        let node = self.nodes.remove(&id).ok_or(DiagramError::UnknownNode(id))?;
        if !node.edges().is_empty() {
            self.nodes.insert(id, node);
            return Err(DiagramError::NodeInUse(id));
        }
        self.order.retain(|&item| item != ItemId::Node(id));
        Ok(node)
    }

    /// Detach an edge from storage. The edge stays valid and can be
    /// reattached with `insert_edge`.
    pub fn take_edge(&mut self, id: EdgeId) -> Result<Edge, DiagramError> {
        let edge = self
            .edges
            .remove(&id)
            .ok_or(DiagramError::UnknownEdge(id))?;
        self.order.retain(|&item| item != ItemId::Edge(id));
        Ok(edge)
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Recompute the cached polyline of a stored edge: source anchor,
    /// breakpoints, target anchor, against current node positions.
    pub fn update_edge(&mut self, id: EdgeId) -> Result<(), DiagramError> {
        let (source, target) = {
            let edge = self.edge(id)?;
            (edge.source, edge.target)
        };
        let source_anchor = self.node(source)?.anchor(id);
        let target_anchor = self.node(target)?.anchor(id);
        let edge = self.edge_mut(id)?;
        let mut path = Vec::with_capacity(edge.breakpoints.len() + 2);
        path.push(source_anchor);
        path.extend_from_slice(&edge.breakpoints);
        path.push(target_anchor);
        edge.path = path;
        Ok(())
    }

    /// Same recompute for an edge not (or not yet) in storage, e.g. while a
    /// command still owns it between construction and its first redo.
    pub fn route_edge(&self, edge: &mut Edge) -> Result<(), DiagramError> {
        let source_anchor = self.node(edge.source)?.anchor(edge.id);
        let target_anchor = self.node(edge.target)?.anchor(edge.id);
        let mut path = Vec::with_capacity(edge.breakpoints.len() + 2);
        path.push(source_anchor);
        path.extend_from_slice(&edge.breakpoints);
        path.push(target_anchor);
        edge.path = path;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    /// Recompute the inferred identity of a node.
    ///
    /// Predicate kinds (and the role operators) keep their static identity.
    /// Other constructor kinds take the first non-Neutral identity found
    /// among the sources of their incoming input and inclusion edges,
    /// scanning incident edges in insertion order; Neutral otherwise.
    pub fn identify_node(&mut self, id: NodeId) -> Result<Identity, DiagramError> {
        let node = self.node(id)?;
        let kind = node.kind;
        if !kind.is_constructor() || kind.identity() != Identity::Neutral {
            let identity = kind.identity();
            self.node_mut(id)?.identity = identity;
            return Ok(identity);
        }

        let mut identity = Identity::Neutral;
        for &edge_id in self.node(id)?.edges() {
            let Ok(edge) = self.edge(edge_id) else {
                tracing::warn!(
                    "Skipping dangling edge {} while identifying node {}",
                    edge_id,
                    id
                );
                continue;
            };
            if edge.target != id {
                continue;
            }
            if !matches!(edge.kind, EdgeKind::INPUT | EdgeKind::INCLUSION) {
                continue;
            }
            let source = self.node(edge.source)?;
            if source.identity != Identity::Neutral && source.identity != Identity::Unknown {
                identity = source.identity;
                break;
            }
        }
        self.node_mut(id)?.identity = identity;
        Ok(identity)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn notify_item_added(&self, item: ItemId) {
        self.bus.publish(Event::ItemAdded {
            diagram: self.name.clone(),
            item,
        });
    }

    pub fn notify_item_removed(&self, item: ItemId) {
        self.bus.publish(Event::ItemRemoved {
            diagram: self.name.clone(),
            item,
        });
    }

    pub fn notify_updated(&self) {
        self.bus.publish(Event::DiagramUpdated);
    }

    pub fn request_identification(&self, id: NodeId) {
        self.bus.publish(Event::NodeIdentificationRequested { id });
    }
}
