//! JSON message types for the line-oriented host protocol.
//!
//! When the bridge runs as a standalone process, the host writes one JSON
//! request per line to stdin and reads one JSON response per line from stdout.
//!
//! # Message flow
//!
//! ```text
//! Host → Bridge:  {"id":7,"command":"inbox.get_unread_message_count","parameters":{"clientId":"u1"}}
//! Bridge → Host:  {"id":7,"status":"ok","value":3}
//! ```
//!
//! Responses may arrive in a different order from the requests (commands run
//! concurrently), so the host correlates them through the `id` it chose.  The
//! bridge echoes `id` untouched and never interprets it.
//!
//! # Response discriminant
//!
//! ```json
//! {"id":1,"status":"ok","value":null}
//! {"id":2,"status":"error","error":{"errorKind":"unknown_session","message":"unknown session 'u2'"}}
//! {"id":3,"status":"not_implemented"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::command::{Command, ErrorReply, Reply};

/// A request line sent by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRequest {
    /// Correlation token chosen by the host; echoed in the response.
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub parameters: Value,
}

impl HostRequest {
    /// Splits the request into its correlation id and the command to dispatch.
    pub fn into_command(self) -> (Value, Command) {
        (self.id, Command::new(self.command, self.parameters))
    }
}

/// The outcome part of a response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
// `tag = "status"` writes the variant name into a `"status"` field next to the
// variant's own fields.
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HostResponseBody {
    Ok { value: Value },
    Error { error: ErrorReply },
    NotImplemented,
}

/// A response line sent back to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostResponse {
    pub id: Value,
    #[serde(flatten)]
    pub body: HostResponseBody,
}

impl HostResponse {
    pub fn from_reply(id: Value, reply: Reply) -> Self {
        let body = match reply {
            Reply::Success(value) => HostResponseBody::Ok { value },
            Reply::Error(error) => HostResponseBody::Error { error },
            Reply::NotImplemented => HostResponseBody::NotImplemented,
        };
        Self { id, body }
    }
}
