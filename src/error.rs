use crate::types::Step;
use std::time::Duration;

/// Broad failure category, used to tell infrastructure problems apart from
/// a server that answers but answers wrongly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The process or connection could not be established or was lost
    Transport,
    /// The server spoke, but not the way an MCP server should
    Protocol,
    /// The exchange worked but the tool result is unusable
    Application,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to start server '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session initialization failed: {0}")]
    Handshake(#[source] rmcp::service::ClientInitializeError),

    #[error("{step} failed: {source}")]
    Request {
        step: Step,
        #[source]
        source: rmcp::ServiceError,
    },

    #[error("{step} timed out after {timeout:?}")]
    Timeout { step: Step, timeout: Duration },

    #[error("{0} was cancelled")]
    Cancelled(Step),

    #[error("tool '{tool}' not advertised by the server (available: {available:?})")]
    ToolNotAdvertised {
        tool: String,
        available: Vec<String>,
    },

    #[error("tool '{tool}' returned an error: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("tool '{0}' returned no content")]
    EmptyContent(String),

    #[error("tool '{tool}' returned {kind} content where text was expected")]
    NonTextContent { tool: String, kind: String },

    #[error("failed to decode tool result: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Spawn { .. } | Error::Timeout { .. } | Error::Cancelled(_) => {
                FailureKind::Transport
            }
            Error::Request {
                source: rmcp::ServiceError::McpError(_),
                ..
            } => FailureKind::Protocol,
            Error::Request { .. } => FailureKind::Transport,
            Error::Handshake(_) | Error::Json(_) => FailureKind::Protocol,
            Error::ToolNotAdvertised { .. }
            | Error::ToolFailed { .. }
            | Error::EmptyContent(_)
            | Error::NonTextContent { .. } => FailureKind::Application,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
