use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use uuid::Uuid;

const TELEMETRY_TARGET: &str = "eddy::events::telemetry";

/// Contract names for the undoable editor commands.
pub const CMD_EDGE_ADD: &str = "EdgeAdd";
pub const CMD_EDGE_SWAP: &str = "EdgeSwap";
pub const CMD_ITEMS_REMOVE: &str = "ItemsRemove";
pub const CMD_UNDO: &str = "Undo";
pub const CMD_REDO: &str = "Redo";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandLifecycle {
    Start,
    Success,
    Failure,
}

impl fmt::Display for CommandLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "command_start"),
            Self::Success => write!(f, "command_success"),
            Self::Failure => write!(f, "command_failure"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandTelemetry {
    pub correlation_id: String,
    pub command: String,
    pub lifecycle: CommandLifecycle,
    pub error_reason: Option<String>,
}

impl CommandTelemetry {
    pub fn start(command: impl Into<String>, correlation_id: &str) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            command: command.into(),
            lifecycle: CommandLifecycle::Start,
            error_reason: None,
        }
    }

    pub fn success(command: impl Into<String>, correlation_id: &str) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            command: command.into(),
            lifecycle: CommandLifecycle::Success,
            error_reason: None,
        }
    }

    pub fn failure(
        command: impl Into<String>,
        correlation_id: &str,
        reason: Option<String>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            command: command.into(),
            lifecycle: CommandLifecycle::Failure,
            error_reason: reason,
        }
    }

    fn now_unix_ms() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }
}

pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn command_start(command: &str, correlation_id: &str) -> CommandTelemetry {
    let telemetry = CommandTelemetry::start(command, correlation_id);
    info!(
        target: TELEMETRY_TARGET,
        command = %telemetry.command,
        correlation_id = %telemetry.correlation_id,
        lifecycle = %telemetry.lifecycle,
        timestamp_ms = CommandTelemetry::now_unix_ms(),
        "command_start"
    );
    telemetry
}

pub fn command_success(command: &str, correlation_id: &str) -> CommandTelemetry {
    let telemetry = CommandTelemetry::success(command, correlation_id);
    info!(
        target: TELEMETRY_TARGET,
        command = %telemetry.command,
        correlation_id = %telemetry.correlation_id,
        lifecycle = %telemetry.lifecycle,
        timestamp_ms = CommandTelemetry::now_unix_ms(),
        "command_success"
    );
    telemetry
}

pub fn command_failure(command: &str, correlation_id: &str, reason: Option<String>) -> CommandTelemetry {
    let telemetry = CommandTelemetry::failure(command, correlation_id, reason);
    let error_reason = telemetry.error_reason.as_deref().unwrap_or("unclassified");

    error!(
        target: TELEMETRY_TARGET,
        command = %telemetry.command,
        correlation_id = %telemetry.correlation_id,
        lifecycle = %telemetry.lifecycle,
        error = %error_reason,
        timestamp_ms = CommandTelemetry::now_unix_ms(),
        "command_failure"
    );

    telemetry
}
