//! Session-scoped command handlers, one module per capability area.
//!
//! Each handler is a plain `fn(SessionCall) -> HandlerFuture`.  The
//! dispatcher has already resolved the session; the handler extracts the
//! parameters it needs, performs exactly one SDK call and encodes the result
//! as a JSON value.

pub mod brands;
pub mod inbox;
pub mod preferences;
pub mod tokens;
pub mod tracking;

use serde::Serialize;
use serde_json::Value;

use notify_core::SdkError;

use super::error::BridgeError;
use super::routes::{RouteTable, RouteTableError};

/// Registers the commands of every capability area.
pub fn register_all(table: &mut RouteTable) -> Result<(), RouteTableError> {
    brands::register(table)?;
    tokens::register(table)?;
    preferences::register(table)?;
    inbox::register(table)?;
    tracking::register(table)?;
    Ok(())
}

/// Encodes an SDK result for the host.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|err| {
        BridgeError::OperationFailed(SdkError::Other(format!("failed to encode result: {err}")))
    })
}
