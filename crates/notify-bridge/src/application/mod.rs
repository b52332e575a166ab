//! Application layer for notify-bridge.
//!
//! Everything between a decoded [`Command`](crate::domain::Command) and the
//! [`Reply`](crate::domain::Reply) sent back:
//!
//! - **`registry`** – live client sessions keyed by the host-chosen `clientId`.
//! - **`routes`** – the finite routing table from command name to operation.
//! - **`handlers`** – one module per capability area; each handler extracts
//!   its parameters and makes exactly one SDK call.
//! - **`dispatcher`** – drives a command through lookup, session resolution
//!   and the handler, then translates the outcome.
//! - **`error`** – the failure taxonomy and its translation into replies.

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::Dispatcher;
pub use error::{translate, BridgeError, CommandResult};
pub use registry::{ClientFactory, ClientRegistry, ClientSession};
pub use routes::{Route, RouteTable, RouteTableError, SessionCall};
