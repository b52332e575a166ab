//! Commands received from the host and the replies sent back.
//!
//! Every [`Command`] produces exactly one [`Reply`]:
//!
//! ```text
//! Command { name: "inbox.get_unread_message_count", parameters: {"clientId":"u1"} }
//!     → Reply::Success(3)
//!     | Reply::Error(ErrorReply { error_kind: UnknownSession, .. })
//!     | Reply::NotImplemented
//! ```
//!
//! `NotImplemented` is not an error: it tells the host that this bridge build
//! has no route for the name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named request from the host.
///
/// Parameters are kept as the raw JSON value the host sent.  Only the
/// dispatcher narrows them, through `notify_core::Params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    parameters: Value,
}

impl Command {
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Splits the command into its name and raw parameters.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.parameters)
    }
}

/// Machine-readable failure category carried by every error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingParameter,
    InvalidParameter,
    UnknownSession,
    OperationFailed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingParameter => "missing_parameter",
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::UnknownSession => "unknown_session",
            ErrorKind::OperationFailed => "operation_failed",
        }
    }
}

/// The uniform error shape delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReply {
    pub error_kind: ErrorKind,
    pub message: String,
}

/// The single reply produced for a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The command succeeded; `Value::Null` for commands with no result.
    Success(Value),
    /// The command failed at extraction, session resolution, or in the SDK.
    Error(ErrorReply),
    /// No route exists for the command name.
    NotImplemented,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    /// Returns the success value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Reply::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error payload, if any.
    pub fn error(&self) -> Option<&ErrorReply> {
        match self {
            Reply::Error(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_into_parts() {
        let cmd = Command::new("client.add", json!({ "clientId": "u1" }));
        assert_eq!(cmd.name(), "client.add");
        let (name, params) = cmd.into_parts();
        assert_eq!(name, "client.add");
        assert_eq!(params["clientId"], "u1");
    }

    #[test]
    fn test_error_reply_serializes_with_camel_case_kind_field() {
        let reply = ErrorReply {
            error_kind: ErrorKind::UnknownSession,
            message: "unknown session 'u2'".to_string(),
        };

        let json = serde_json::to_value(&reply).unwrap();

        assert_eq!(json, json!({ "errorKind": "unknown_session", "message": "unknown session 'u2'" }));
    }

    #[test]
    fn test_error_kind_as_str_matches_serde() {
        for kind in [
            ErrorKind::MissingParameter,
            ErrorKind::InvalidParameter,
            ErrorKind::UnknownSession,
            ErrorKind::OperationFailed,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn test_reply_accessors() {
        let ok = Reply::Success(json!(3));
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&json!(3)));
        assert!(ok.error().is_none());

        assert!(!Reply::NotImplemented.is_success());
        assert!(Reply::NotImplemented.value().is_none());
    }
}
