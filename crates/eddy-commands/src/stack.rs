//! The undo/redo stack: strict LIFO sequencing with macro grouping and
//! clean-state tracking.

use crate::Command;
use eddy_core::DiagramError;
use eddy_diagram::Diagram;
use eddy_events::telemetry;
use eddy_events::{Event, EventBus};
use std::any::Any;
use thiserror::Error;

const STACK_TARGET: &str = "eddy::commands::stack";

#[derive(Error, Debug)]
pub enum StackError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("a macro is already being composed")]
    MacroAlreadyOpen,
    #[error("no open macro to end")]
    NoOpenMacro,
    #[error("cannot navigate history while a macro is being composed")]
    MacroOpen,
    #[error(transparent)]
    Diagram(#[from] DiagramError),
}

/// A batch of commands presented to the stack as one undoable unit: redo
/// applies in push order, undo reverts in reverse order.
#[derive(Debug)]
pub struct MacroCommand {
    description: String,
    commands: Vec<Box<dyn Command>>,
}

impl MacroCommand {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for MacroCommand {
    fn redo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        for command in &mut self.commands {
            command.redo(diagram)?;
        }
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), DiagramError> {
        for command in self.commands.iter_mut().rev() {
            command.undo(diagram)?;
        }
        Ok(())
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Manages command history for undo/redo.
///
/// `push` applies the command immediately. Commands pushed between
/// `begin_macro` and `end_macro` still apply immediately but collapse into a
/// single stack slot. The clean mark tracks the stack depth at the last
/// save; diverging history (a push after undos) invalidates it.
pub struct CommandStack {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    open_macro: Option<MacroCommand>,
    max_size: usize,
    clean_len: Option<usize>,
    was_clean: bool,
    event_bus: EventBus,
}

impl CommandStack {
    pub fn new(max_size: usize, event_bus: EventBus) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open_macro: None,
            max_size,
            clean_len: Some(0),
            was_clean: true,
            event_bus,
        }
    }

    /// Execute a command and add it to the history.
    pub fn push(&mut self, mut cmd: Box<dyn Command>, diagram: &mut Diagram) -> Result<(), StackError> {
        let correlation_id = telemetry::new_correlation_id();
        let description = cmd.description();
        telemetry::command_start(&description, &correlation_id);

        if let Err(err) = cmd.redo(diagram) {
            telemetry::command_failure(&description, &correlation_id, Some(err.to_string()));
            return Err(err.into());
        }
        telemetry::command_success(&description, &correlation_id);

        if let Some(open) = &mut self.open_macro {
            open.commands.push(cmd);
            return Ok(());
        }

        // Diverging history: anything above the current depth can never be
        // reached again.
        self.redo_stack.clear();
        if matches!(self.clean_len, Some(clean) if clean > self.undo_stack.len()) {
            self.clean_len = None;
        }

        // Try to merge with the last command.
        if let Some(last) = self.undo_stack.last_mut() {
            if last.can_merge(cmd.as_ref()) {
                tracing::debug!(target: STACK_TARGET, command = %description, "merged into previous command");
                last.merge(cmd);
                self.notify_change();
                return Ok(());
            }
        }

        self.undo_stack.push(cmd);

        // Enforce max size.
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
            self.clean_len = match self.clean_len {
                Some(n) if n > 0 => Some(n - 1),
                _ => None,
            };
        }

        self.notify_change();
        Ok(())
    }

    /// Open a macro. Commands pushed until `end_macro` become one undo unit.
    pub fn begin_macro(&mut self, description: impl Into<String>) -> Result<(), StackError> {
        if self.open_macro.is_some() {
            return Err(StackError::MacroAlreadyOpen);
        }
        self.open_macro = Some(MacroCommand::new(description));
        Ok(())
    }

    /// Close the open macro and place it on the stack. An empty macro
    /// leaves no history entry.
    pub fn end_macro(&mut self) -> Result<(), StackError> {
        let open = self.open_macro.take().ok_or(StackError::NoOpenMacro)?;
        if open.is_empty() {
            return Ok(());
        }
        self.redo_stack.clear();
        if matches!(self.clean_len, Some(clean) if clean > self.undo_stack.len()) {
            self.clean_len = None;
        }
        self.undo_stack.push(Box::new(open));
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
            self.clean_len = match self.clean_len {
                Some(n) if n > 0 => Some(n - 1),
                _ => None,
            };
        }
        self.notify_change();
        Ok(())
    }

    /// Undo the last command.
    pub fn undo(&mut self, diagram: &mut Diagram) -> Result<(), StackError> {
        if self.open_macro.is_some() {
            return Err(StackError::MacroOpen);
        }
        let mut cmd = self.undo_stack.pop().ok_or(StackError::NothingToUndo)?;
        let correlation_id = telemetry::new_correlation_id();
        telemetry::command_start(telemetry::CMD_UNDO, &correlation_id);
        if let Err(err) = cmd.undo(diagram) {
            telemetry::command_failure(telemetry::CMD_UNDO, &correlation_id, Some(err.to_string()));
            return Err(err.into());
        }
        telemetry::command_success(telemetry::CMD_UNDO, &correlation_id);
        self.redo_stack.push(cmd);
        self.notify_change();
        Ok(())
    }

    /// Redo the last undone command.
    pub fn redo(&mut self, diagram: &mut Diagram) -> Result<(), StackError> {
        if self.open_macro.is_some() {
            return Err(StackError::MacroOpen);
        }
        let mut cmd = self.redo_stack.pop().ok_or(StackError::NothingToRedo)?;
        let correlation_id = telemetry::new_correlation_id();
        telemetry::command_start(telemetry::CMD_REDO, &correlation_id);
        if let Err(err) = cmd.redo(diagram) {
            telemetry::command_failure(telemetry::CMD_REDO, &correlation_id, Some(err.to_string()));
            return Err(err.into());
        }
        telemetry::command_success(telemetry::CMD_REDO, &correlation_id);
        self.undo_stack.push(cmd);
        self.notify_change();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Whether the stack is at the depth of the last `set_clean` call.
    pub fn is_clean(&self) -> bool {
        self.clean_len == Some(self.undo_stack.len())
    }

    /// Mark the current depth as the saved state.
    pub fn set_clean(&mut self) {
        self.clean_len = Some(self.undo_stack.len());
        self.notify_change();
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_macro = None;
        self.clean_len = Some(0);
        self.notify_change();
    }

    fn notify_change(&mut self) {
        self.event_bus.publish(Event::UndoStackChanged {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_description: self.undo_description(),
            redo_description: self.redo_description(),
        });
        let clean = self.is_clean();
        if clean != self.was_clean {
            self.was_clean = clean;
            self.event_bus.publish(Event::CleanChanged { clean });
        }
    }
}
