//! Domain layer for notify-bridge.
//!
//! Pure types with no I/O: the command/reply pair that crosses the host
//! boundary, the line-protocol envelope around it, and the process-wide
//! configuration.

pub mod command;
pub mod config;
pub mod messages;

pub use command::{Command, ErrorKind, ErrorReply, Reply};
pub use config::BridgeConfig;
pub use messages::{HostRequest, HostResponse, HostResponseBody};
