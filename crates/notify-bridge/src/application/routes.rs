//! The routing table: command name → operation.
//!
//! The table is finite and built once at startup.  Every capability area
//! (`brands`, `tokens`, `preferences`, `inbox`, `tracking`) registers its own
//! commands from its handler module, and registering the same name twice is
//! a construction-time error instead of a silent overwrite.
//!
//! # Route kinds
//!
//! ```text
//! client.add / client.remove   → registry lifecycle, handled by the dispatcher
//! <area>.<action>              → SessionHandler, receives a resolved session
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

use notify_core::Params;

use super::error::CommandResult;
use super::handlers;
use super::registry::ClientSession;
use crate::domain::BridgeConfig;

// ── Command names ─────────────────────────────────────────────────────────────

/// Parameter key naming the target session in every session-scoped command.
pub const CLIENT_ID_KEY: &str = "clientId";

pub const CLIENT_ADD: &str = "client.add";
pub const CLIENT_REMOVE: &str = "client.remove";

pub const BRANDS_GET_BRAND: &str = "brands.get_brand";

pub const TOKENS_PUT_USER_TOKEN: &str = "tokens.put_user_token";
pub const TOKENS_DELETE_USER_TOKEN: &str = "tokens.delete_user_token";

pub const PREFERENCES_GET_USER_PREFERENCES: &str = "preferences.get_user_preferences";
pub const PREFERENCES_GET_USER_PREFERENCE_TOPIC: &str = "preferences.get_user_preference_topic";
pub const PREFERENCES_PUT_USER_PREFERENCE_TOPIC: &str = "preferences.put_user_preference_topic";

pub const INBOX_GET_MESSAGES: &str = "inbox.get_messages";
pub const INBOX_GET_ARCHIVED_MESSAGES: &str = "inbox.get_archived_messages";
pub const INBOX_GET_UNREAD_MESSAGE_COUNT: &str = "inbox.get_unread_message_count";
pub const INBOX_GET_MESSAGE_BY_ID: &str = "inbox.get_message_by_id";
pub const INBOX_CLICK_MESSAGE: &str = "inbox.click_message";
pub const INBOX_UNREAD_MESSAGE: &str = "inbox.unread_message";
pub const INBOX_READ_MESSAGE: &str = "inbox.read_message";
pub const INBOX_OPEN_MESSAGE: &str = "inbox.open_message";
pub const INBOX_ARCHIVE_MESSAGE: &str = "inbox.archive_message";
pub const INBOX_READ_ALL_MESSAGES: &str = "inbox.read_all_messages";

pub const TRACKING_POST_TRACKING_URL: &str = "tracking.post_tracking_url";

// ── Handler types ─────────────────────────────────────────────────────────────

/// Everything a session-scoped handler needs, owned so the returned future
/// can be `'static` and run on any worker thread.
pub struct SessionCall {
    pub session: Arc<ClientSession>,
    pub params: Params,
    pub config: Arc<BridgeConfig>,
}

pub type HandlerFuture = BoxFuture<'static, CommandResult>;

/// A session-scoped operation.  It extracts its own parameters from
/// `call.params` and performs exactly one SDK call.
pub type SessionHandler = fn(SessionCall) -> HandlerFuture;

/// What the dispatcher does for a routed command name.
#[derive(Clone, Copy)]
pub enum Route {
    AddClient,
    RemoveClient,
    Session(SessionHandler),
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::AddClient => f.write_str("AddClient"),
            Route::RemoveClient => f.write_str("RemoveClient"),
            Route::Session(_) => f.write_str("Session(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("command '{0}' is registered twice")]
    Duplicate(String),

    /// Names must have the form `area.action` with both parts non-empty.
    #[error("command name '{0}' is not of the form 'area.action'")]
    MalformedName(String),
}

// ── RouteTable ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<&'static str, Route>,
}

impl RouteTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the table with every command the bridge supports.
    ///
    /// # Errors
    ///
    /// [`RouteTableError::Duplicate`] if two areas claim the same name.
    pub fn standard() -> Result<Self, RouteTableError> {
        let mut table = Self::empty();
        table.register(CLIENT_ADD, Route::AddClient)?;
        table.register(CLIENT_REMOVE, Route::RemoveClient)?;
        handlers::register_all(&mut table)?;
        Ok(table)
    }

    /// Adds one route.
    ///
    /// # Errors
    ///
    /// - [`RouteTableError::MalformedName`] if `name` is not `area.action`.
    /// - [`RouteTableError::Duplicate`] if `name` is already registered.
    pub fn register(&mut self, name: &'static str, route: Route) -> Result<(), RouteTableError> {
        if !is_well_formed(name) {
            return Err(RouteTableError::MalformedName(name.to_string()));
        }
        if self.routes.contains_key(name) {
            return Err(RouteTableError::Duplicate(name.to_string()));
        }
        self.routes.insert(name, route);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Route> {
        self.routes.get(name).copied()
    }

    /// Returns every registered name in sorted order.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.routes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn is_well_formed(name: &str) -> bool {
    match name.split_once('.') {
        Some((area, action)) => !area.is_empty() && !action.is_empty() && !action.contains('.'),
        None => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
