//! Reversible diagram-editing commands and the undo/redo stack.
//!
//! Every user edit is a [`Command`]: an immutable-after-construction record
//! whose constructor snapshots whatever state `undo` will need, paired with
//! two mutually inverse operations over the diagram arena. Commands are
//! pushed on a [`CommandStack`], which applies `redo` immediately and
//! sequences later `undo`/`redo` strictly LIFO.

pub mod edges;
pub mod labels;
pub mod nodes;
pub mod stack;

pub use edges::{
    EdgeAdd, EdgeAnchorMove, EdgeBreakpointAdd, EdgeBreakpointMove, EdgeBreakpointRemove, EdgeSwap,
};
pub use labels::LabelChange;
pub use nodes::{ItemsRemove, NodeAdd, NodeMove};
pub use stack::{CommandStack, MacroCommand, StackError};

use eddy_core::DiagramError;
use eddy_diagram::Diagram;
use std::any::Any;
use std::fmt::Debug;

/// Trait for commands that can be executed and undone
pub trait Command: Debug + Send {
    /// Apply the command's structural effects and emit notifications.
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError>;

    /// Revert the command from its captured snapshots.
    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError>;

    /// Human-readable description shown in the edit history.
    fn description(&self) -> String;

    /// Support for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Check if this command can be merged with another
    fn can_merge(&self, _other: &dyn Command) -> bool {
        false
    }

    /// Merge another command into this one (if can_merge returns true)
    fn merge(&mut self, _other: Box<dyn Command>) {}
}
