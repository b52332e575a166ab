//! Client registry: the identity-keyed table of live client sessions.
//!
//! A *session* is a configured SDK client the host created with `client.add`
//! and addresses by an opaque string id (`clientId`) in every later command.
//!
//! # Session lifecycle (for beginners)
//!
//! ```text
//!   client.add {clientId:"u1", userId, jwt, ...}
//!        │  builds the SDK client once, stores it
//!        ▼
//!   ┌──────────┐   brands.* / tokens.* / preferences.* / inbox.* / tracking.*
//!   │  "u1"    │◄── resolve with get("u1"), never created implicitly
//!   └──────────┘
//!        │
//!   client.remove {clientId:"u1"}   (idempotent)
//! ```
//!
//! Sessions are never expired for idleness; the host owns their lifetime
//! (typically login and logout).
//!
//! # Concurrency
//!
//! Commands run concurrently, so the table sits behind a `RwLock`.  The lock
//! is only held for the map operation itself and never across an `.await`.
//! Callers receive an `Arc<ClientSession>`: removing the id afterwards only
//! detaches it from the table, and a call that already resolved the session
//! keeps a valid handle until it finishes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use notify_core::{
    BrandApi, ClientOptions, InboxApi, NotificationClient, Params, PreferenceApi, SdkError,
    TokenApi, TrackingApi,
};

use super::error::BridgeError;

/// Builds an SDK client from the options supplied with `client.add`.
///
/// The production implementation wires up the real SDK; tests and the
/// development binary use an in-memory backend.
#[cfg_attr(test, mockall::automock)]
pub trait ClientFactory: Send + Sync {
    fn build(&self, options: &ClientOptions) -> Result<Arc<dyn NotificationClient>, SdkError>;
}

/// A configured handle to the SDK, owned by the registry.
pub struct ClientSession {
    id: String,
    options: ClientOptions,
    client: Arc<dyn NotificationClient>,
}

impl ClientSession {
    pub fn new(
        id: impl Into<String>,
        options: ClientOptions,
        client: Arc<dyn NotificationClient>,
    ) -> Self {
        Self {
            id: id.into(),
            options,
            client,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn brands(&self) -> &dyn BrandApi {
        self.client.brands()
    }

    pub fn tokens(&self) -> &dyn TokenApi {
        self.client.tokens()
    }

    pub fn preferences(&self) -> &dyn PreferenceApi {
        self.client.preferences()
    }

    pub fn inbox(&self) -> &dyn InboxApi {
        self.client.inbox()
    }

    pub fn tracking(&self) -> &dyn TrackingApi {
        self.client.tracking()
    }
}

impl fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSession")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// In-memory table of live sessions keyed by the host-chosen id.
pub struct ClientRegistry {
    factory: Arc<dyn ClientFactory>,
    sessions: RwLock<HashMap<String, Arc<ClientSession>>>,
}

impl ClientRegistry {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the session for `session_id`, building it first if needed.
    ///
    /// An existing session is returned unchanged: the factory is not called
    /// again and `params` is not inspected.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::MissingParameter`] / [`BridgeError::InvalidParameter`]
    ///   if the client options cannot be extracted from `params`.
    /// - [`BridgeError::OperationFailed`] if the factory rejects the options.
    pub fn add_or_get(
        &self,
        session_id: &str,
        params: &Params,
    ) -> Result<Arc<ClientSession>, BridgeError> {
        // The write lock is taken up front so two concurrent adds for the same
        // id cannot both build a client.
        let mut sessions = self.write();

        if let Some(existing) = sessions.get(session_id) {
            debug!("session '{session_id}' already registered; reusing it");
            return Ok(Arc::clone(existing));
        }

        let options = ClientOptions::from_params(params)?;
        let client = self.factory.build(&options)?;
        let session = Arc::new(ClientSession::new(session_id, options, client));
        sessions.insert(session_id.to_string(), Arc::clone(&session));

        info!(
            "session '{session_id}' added for user '{}' ({} live)",
            session.options().user_id,
            sessions.len()
        );
        Ok(session)
    }

    /// Detaches and returns the session for `session_id`.
    ///
    /// Removing an unknown id is not an error and returns `None`.
    pub fn remove(&self, session_id: &str) -> Option<Arc<ClientSession>> {
        let mut sessions = self.write();
        let removed = sessions.remove(session_id);
        match &removed {
            Some(_) => info!("session '{session_id}' removed ({} live)", sessions.len()),
            None => debug!("session '{session_id}' was not registered; nothing to remove"),
        }
        removed
    }

    /// Resolves a registered session.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnknownSession`] if no session is registered under
    /// `session_id`.
    pub fn get(&self, session_id: &str) -> Result<Arc<ClientSession>, BridgeError> {
        self.read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownSession(session_id.to_string()))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.read().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the registered ids in sorted order.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    // Every critical section is a single map operation, so a poisoned lock
    // still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<ClientSession>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<ClientSession>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
