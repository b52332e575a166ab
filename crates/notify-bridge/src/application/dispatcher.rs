//! Command dispatcher: owns the life of one request from name to reply.
//!
//! # Request lifecycle
//!
//! ```text
//! Command { name, parameters }
//!   │
//!   ├─ route lookup ──────────── no route ─────────► Reply::NotImplemented
//!   │
//!   ├─ Params::from_value ────── not an object ────► invalid_parameter("params")
//!   ├─ require("clientId") ───── absent / wrong ───► missing / invalid
//!   │
//!   ├─ client.add     → registry.add_or_get  → "clientId"
//!   ├─ client.remove  → registry.remove      → "clientId"
//!   └─ <area>.<act>   → registry.get ──────── unknown ──► unknown_session
//!                         └─ handler: own params, one SDK call, encode
//!   │
//!   ▼
//! translate(result) → Reply::Success | Reply::Error
//! ```
//!
//! `dispatch` never fails at the type level: every error path ends in a
//! reply.  Commands are independent, so callers may run any number of
//! `dispatch` futures at once on a shared `Arc<Dispatcher>`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, debug_span, info, warn, Instrument};
use uuid::Uuid;

use notify_core::Params;

use super::error::{translate, CommandResult};
use super::registry::ClientRegistry;
use super::routes::{Route, RouteTable, RouteTableError, SessionCall, CLIENT_ID_KEY};
use crate::domain::{BridgeConfig, Command, Reply};

pub struct Dispatcher {
    routes: RouteTable,
    registry: Arc<ClientRegistry>,
    config: Arc<BridgeConfig>,
}

impl Dispatcher {
    /// Creates a dispatcher serving every supported command.
    ///
    /// # Errors
    ///
    /// [`RouteTableError`] if the standard routing table cannot be built.
    pub fn new(registry: Arc<ClientRegistry>, config: BridgeConfig) -> Result<Self, RouteTableError> {
        Ok(Self::with_routes(RouteTable::standard()?, registry, config))
    }

    /// Creates a dispatcher over a caller-supplied routing table.
    pub fn with_routes(routes: RouteTable, registry: Arc<ClientRegistry>, config: BridgeConfig) -> Self {
        debug!("dispatcher ready with {} routes", routes.len());
        Self {
            routes,
            registry,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Runs one command to completion and returns its single reply.
    pub async fn dispatch(&self, command: Command) -> Reply {
        let (name, parameters) = command.into_parts();

        // Unknown names are answered before the bundle is looked at.
        let Some(route) = self.routes.get(&name) else {
            debug!("no route for command '{name}'");
            return Reply::NotImplemented;
        };

        let trace_id = Uuid::new_v4();
        let span = debug_span!("dispatch", command = %name, %trace_id);
        let result = self.run(route, parameters).instrument(span).await;

        if let Err(err) = &result {
            warn!("command '{name}' ({trace_id}) failed: {err}");
        }
        translate(result)
    }

    async fn run(&self, route: Route, parameters: Value) -> CommandResult {
        let params = Params::from_value(parameters)?;
        let client_id: String = params.require(CLIENT_ID_KEY)?;

        match route {
            Route::AddClient => {
                self.registry.add_or_get(&client_id, &params)?;
                Ok(Value::String(client_id))
            }
            Route::RemoveClient => {
                self.registry.remove(&client_id);
                Ok(Value::String(client_id))
            }
            Route::Session(handler) => {
                let session = self.registry.get(&client_id)?;
                if session.options().show_logs {
                    info!("session '{client_id}' running command");
                } else {
                    debug!("session '{client_id}' running command");
                }
                handler(SessionCall {
                    session,
                    params,
                    config: Arc::clone(&self.config),
                })
                .await
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
