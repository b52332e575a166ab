//! Infrastructure layer for notify-bridge.
//!
//! Everything that touches the outside world lives here:
//!
//! - **`config_file`** – reads the optional TOML configuration file.
//! - **`line_server`** – the JSON-lines transport between the host and the
//!   dispatcher (stdin/stdout in the binary, in-memory pipes in tests).
//! - **`memory_sdk`** – a process-local notification backend implementing
//!   every SDK capability trait.
//!
//! # What does NOT belong here?
//!
//! - Command routing and parameter extraction (application layer)
//! - Command, reply and wire message types (domain layer)

pub mod config_file;
pub mod line_server;
pub mod memory_sdk;

pub use config_file::{load_config, parse_config, ConfigError};
pub use line_server::serve;
pub use memory_sdk::{MemoryBackend, MemoryClient, MemoryClientFactory};
