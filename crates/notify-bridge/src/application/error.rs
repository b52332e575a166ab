//! Error taxonomy and the translation into the host-facing error shape.
//!
//! Every stage of a command (parameter extraction, session resolution, the
//! SDK call, result encoding) fails with a [`BridgeError`].  The dispatcher
//! turns each one into a [`Reply::Error`] so nothing escapes a command without
//! a reply.

use serde_json::Value;
use thiserror::Error;

use notify_core::{ParamError, SdkError};

use crate::domain::command::{ErrorKind, ErrorReply, Reply};

/// Result type produced by every routed command.
pub type CommandResult = Result<Value, BridgeError>;

/// Errors that can occur while executing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A required key is absent from the parameter bundle.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// A key has the wrong shape, or names an enumerated value with no
    /// tolerant fallback (for example an unknown tracking event).
    #[error("invalid parameter '{0}'")]
    InvalidParameter(String),

    /// A capability command addressed a session that was never added (or was
    /// already removed).
    #[error("unknown session '{0}'")]
    UnknownSession(String),

    /// The SDK call itself failed.  The cause is relayed, not reinterpreted.
    #[error("operation failed: {0}")]
    OperationFailed(#[from] SdkError),
}

impl From<ParamError> for BridgeError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::Missing(key) => BridgeError::MissingParameter(key),
            ParamError::Invalid(key) => BridgeError::InvalidParameter(key),
        }
    }
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::MissingParameter(_) => ErrorKind::MissingParameter,
            BridgeError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            BridgeError::UnknownSession(_) => ErrorKind::UnknownSession,
            BridgeError::OperationFailed(_) => ErrorKind::OperationFailed,
        }
    }

    pub fn to_reply(&self) -> ErrorReply {
        ErrorReply {
            error_kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Converts the outcome of a routed command into the reply sent to the host.
pub fn translate(result: CommandResult) -> Reply {
    match result {
        Ok(value) => Reply::Success(value),
        Err(err) => Reply::Error(err.to_reply()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
