use crossbeam_channel::{unbounded, Receiver, Sender};
use eddy_core::{ItemId, NodeId};
use serde::{Deserialize, Serialize};

pub mod telemetry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Diagram change notifications. ItemAdded/ItemRemoved fire for
    // top-level items only (nodes and edges, not breakpoints or anchors);
    // DiagramUpdated fires once per applied or reverted command.
    ItemAdded {
        diagram: String,
        item: ItemId,
    },
    ItemRemoved {
        diagram: String,
        item: ItemId,
    },
    DiagramUpdated,

    /// Edge topology around this node changed in a way that can alter its
    /// inferred identity. Emitted only after a whole batch of topological
    /// changes has been applied.
    NodeIdentificationRequested {
        id: NodeId,
    },

    // Undo/Redo
    UndoStackChanged {
        can_undo: bool,
        can_redo: bool,
        undo_description: Option<String>,
        redo_description: Option<String>,
    },
    /// Whether the current stack position matches the last saved state.
    CleanChanged {
        clean: bool,
    },
}

#[derive(Clone)]
#[derive(Debug)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// This is useful for processing events in the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
