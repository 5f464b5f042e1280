//! Label editing.

use crate::Command;
use eddy_core::{DiagramError, NodeId};
use eddy_diagram::Diagram;
use std::any::Any;

/// Changes a node's label text. The previous text is captured at
/// construction.
#[derive(Debug)]
pub struct LabelChange {
    node: NodeId,
    undo: String,
    redo: String,
    description: String,
}

impl LabelChange {
    pub fn new(
        diagram: &Diagram,
        node: NodeId,
        text: impl Into<String>,
    ) -> Result<Self, DiagramError> {
        let current = diagram.node(node)?;
        Ok(Self {
            node,
            undo: current.label.clone(),
            redo: text.into(),
            description: format!("change {} label", current.name()),
        })
    }

    fn apply(&self, diagram: &mut Diagram, text: &str) -> Result<(), DiagramError> {
        diagram.node_mut(self.node)?.label = text.to_string();
        diagram.notify_updated();
        Ok(())
    }
}

impl Command for LabelChange {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let text = self.redo.clone();
        self.apply(diagram, &text)
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        let text = self.undo.clone();
        self.apply(diagram, &text)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
