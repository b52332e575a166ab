//! In-memory notification backend.
//!
//! A process-local implementation of every SDK capability trait.  The binary
//! uses it in development mode (`--demo-data`), and the integration tests use
//! it as a stand-in for the hosted service.
//!
//! # Data model
//!
//! ```text
//! MemoryBackend
//!   ├─ brands:   brand id → Brand              (shared by all users)
//!   ├─ template: UserState                     (copied for each new user)
//!   └─ users:    user id  → UserState
//!                  ├─ tokens    token → (provider, device)
//!                  ├─ topics    preference topics, in display order
//!                  ├─ messages  inbox, newest first
//!                  ├─ clicks    (message id, tracking id)
//!                  └─ tracking  posted (url, event) pairs
//! ```
//!
//! Each [`MemoryClient`] is bound to one user id.  Two sessions for the same
//! user therefore see the same inbox, like two devices signed in to one
//! account.
//!
//! # Cursors
//!
//! Inbox and preference cursors are decimal offsets into the list.  A cursor
//! that is not a number is rejected with HTTP 400, as the hosted service does
//! for a cursor it did not issue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use notify_core::{
    Brand, BrandApi, ClientOptions, Device, InboxApi, InboxMessage, InboxPage,
    NotificationClient, Paging, PreferenceApi, PreferenceStatus,
    PreferenceTopic, SdkError, TokenApi, TopicUpdate, TrackingApi, TrackingEvent, UserPreferences,
};
use notify_core::domain::BrandSettings;

use crate::application::ClientFactory;

/// Number of preference topics returned per page.
pub const PREFERENCE_PAGE_SIZE: usize = 10;

// ── State ─────────────────────────────────────────────────────────────────────

/// A push token registered for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredToken {
    pub provider: String,
    pub device: Device,
}

/// One call to `post_tracking_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingPost {
    pub url: String,
    pub event: TrackingEvent,
}

/// Everything the backend stores for one user.
#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub tokens: HashMap<String, RegisteredToken>,
    pub topics: Vec<PreferenceTopic>,
    pub messages: Vec<InboxMessage>,
    pub clicks: Vec<(String, String)>,
    pub tracking: Vec<TrackingPost>,
}

impl UserState {
    fn message_mut(&mut self, message_id: &str) -> Result<&mut InboxMessage, SdkError> {
        self.messages
            .iter_mut()
            .find(|m| m.message_id == message_id)
            .ok_or_else(|| SdkError::NotFound(format!("message '{message_id}'")))
    }
}

#[derive(Debug, Default)]
struct State {
    brands: HashMap<String, Brand>,
    template: UserState,
    users: HashMap<String, UserState>,
}

/// Shared store behind every [`MemoryClient`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with one brand, two preference topics and a short inbox
    /// that every new user starts from.
    pub fn with_demo_data() -> Self {
        let backend = Self::new();
        backend.insert_brand(Brand {
            id: "demo-brand".to_string(),
            name: Some("Demo".to_string()),
            settings: Some(BrandSettings {
                primary_color: Some("#9121c2".to_string()),
                show_footer: true,
            }),
        });

        let template = UserState {
            topics: vec![
                topic("product-updates", "Product updates", PreferenceStatus::OptedIn),
                topic("marketing", "Marketing", PreferenceStatus::OptedOut),
            ],
            messages: ["Welcome aboard", "Your weekly summary", "New sign-in detected"]
                .into_iter()
                .map(|title| {
                    let mut message = InboxMessage::new(Uuid::new_v4().to_string(), title);
                    message.tracking_id = Some(Uuid::new_v4().to_string());
                    message
                })
                .collect(),
            ..UserState::default()
        };
        backend.lock().template = template;
        backend
    }

    pub fn insert_brand(&self, brand: Brand) {
        self.lock().brands.insert(brand.id.clone(), brand);
    }

    /// Adds a topic to `user_id`'s preferences, replacing one with the same id.
    pub fn insert_topic(&self, user_id: &str, new_topic: PreferenceTopic) {
        self.with_user(user_id, |user| {
            match user.topics.iter_mut().find(|t| t.topic_id == new_topic.topic_id) {
                Some(existing) => *existing = new_topic,
                None => user.topics.push(new_topic),
            }
        });
    }

    /// Delivers a message to the top of `user_id`'s inbox.
    pub fn deliver(&self, user_id: &str, message: InboxMessage) {
        self.with_user(user_id, |user| user.messages.insert(0, message));
    }

    /// Delivers a new unread message and returns its generated id.
    pub fn deliver_new(&self, user_id: &str, title: &str) -> String {
        let message_id = Uuid::new_v4().to_string();
        let mut message = InboxMessage::new(message_id.clone(), title);
        message.tracking_id = Some(Uuid::new_v4().to_string());
        self.deliver(user_id, message);
        message_id
    }

    /// Returns a copy of everything stored for `user_id`.
    pub fn user_state(&self, user_id: &str) -> UserState {
        self.with_user(user_id, |user| user.clone())
    }

    fn with_user<R>(&self, user_id: &str, f: impl FnOnce(&mut UserState) -> R) -> R {
        let mut state = self.lock();
        let State {
            template, users, ..
        } = &mut *state;
        let user = users
            .entry(user_id.to_string())
            .or_insert_with(|| template.clone());
        f(user)
    }

    // A panic inside `with_user` leaves at most one user's state partially
    // updated; the store stays usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn topic(id: &str, name: &str, status: PreferenceStatus) -> PreferenceTopic {
    PreferenceTopic {
        topic_id: id.to_string(),
        topic_name: name.to_string(),
        section_id: None,
        section_name: None,
        status,
        default_status: status,
        has_custom_routing: false,
        custom_routing: Vec::new(),
    }
}

fn parse_cursor(cursor: Option<&str>) -> Result<usize, SdkError> {
    match cursor {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| SdkError::Http {
            status: 400,
            message: format!("invalid cursor '{raw}'"),
        }),
    }
}

fn page_of(
    messages: Vec<InboxMessage>,
    limit: u32,
    cursor: Option<&str>,
) -> Result<InboxPage, SdkError> {
    if limit == 0 {
        return Err(SdkError::Http {
            status: 400,
            message: "pagination limit must be positive".to_string(),
        });
    }
    let start = parse_cursor(cursor)?.min(messages.len());
    let end = start.saturating_add(limit as usize).min(messages.len());
    let can_paginate = end < messages.len();

    Ok(InboxPage {
        total_count: messages.len() as u64,
        can_paginate,
        pagination_cursor: can_paginate.then(|| end.to_string()),
        messages: messages[start..end].to_vec(),
    })
}

// ── MemoryClient ──────────────────────────────────────────────────────────────

/// An SDK client bound to one user of a [`MemoryBackend`].
pub struct MemoryClient {
    backend: Arc<MemoryBackend>,
    user_id: String,
}

impl MemoryClient {
    pub fn new(backend: Arc<MemoryBackend>, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
        }
    }

    fn with_user<R>(&self, f: impl FnOnce(&mut UserState) -> R) -> R {
        self.backend.with_user(&self.user_id, f)
    }

    fn update_message(
        &self,
        message_id: &str,
        f: impl FnOnce(&mut InboxMessage),
    ) -> Result<(), SdkError> {
        self.with_user(|user| user.message_mut(message_id).map(f))
    }
}

#[async_trait]
impl BrandApi for MemoryClient {
    async fn get_brand(&self, brand_id: &str) -> Result<Brand, SdkError> {
        self.backend
            .lock()
            .brands
            .get(brand_id)
            .cloned()
            .ok_or_else(|| SdkError::NotFound(format!("brand '{brand_id}'")))
    }
}

#[async_trait]
impl TokenApi for MemoryClient {
    async fn put_user_token(
        &self,
        token: &str,
        provider: &str,
        device: &Device,
    ) -> Result<(), SdkError> {
        let registered = RegisteredToken {
            provider: provider.to_string(),
            device: device.clone(),
        };
        self.with_user(|user| user.tokens.insert(token.to_string(), registered));
        debug!("user '{}' registered a {provider} token", self.user_id);
        Ok(())
    }

    async fn delete_user_token(&self, token: &str) -> Result<(), SdkError> {
        self.with_user(|user| user.tokens.remove(token));
        Ok(())
    }
}

#[async_trait]
impl PreferenceApi for MemoryClient {
    async fn get_user_preferences(
        &self,
        pagination_cursor: Option<&str>,
    ) -> Result<UserPreferences, SdkError> {
        let start = parse_cursor(pagination_cursor)?;
        let topics = self.with_user(|user| user.topics.clone());

        let start = start.min(topics.len());
        let end = (start + PREFERENCE_PAGE_SIZE).min(topics.len());
        let more = end < topics.len();
        Ok(UserPreferences {
            items: topics[start..end].to_vec(),
            paging: Paging {
                cursor: more.then(|| end.to_string()),
                more,
            },
        })
    }

    async fn get_user_preference_topic(&self, topic_id: &str) -> Result<PreferenceTopic, SdkError> {
        self.with_user(|user| user.topics.iter().find(|t| t.topic_id == topic_id).cloned())
            .ok_or_else(|| SdkError::NotFound(format!("topic '{topic_id}'")))
    }

    async fn put_user_preference_topic(&self, update: &TopicUpdate) -> Result<(), SdkError> {
        self.with_user(|user| -> Result<(), SdkError> {
            let stored = user
                .topics
                .iter_mut()
                .find(|t| t.topic_id == update.topic_id)
                .ok_or_else(|| SdkError::NotFound(format!("topic '{}'", update.topic_id)))?;
            stored.status = update.status;
            stored.has_custom_routing = update.has_custom_routing;
            stored.custom_routing = update.custom_routing.clone();
            Ok(())
        })
    }
}

#[async_trait]
impl InboxApi for MemoryClient {
    async fn get_messages(
        &self,
        pagination_limit: u32,
        start_cursor: Option<&str>,
    ) -> Result<InboxPage, SdkError> {
        let active: Vec<InboxMessage> = self.with_user(|user| {
            user.messages.iter().filter(|m| !m.archived).cloned().collect()
        });
        page_of(active, pagination_limit, start_cursor)
    }

    async fn get_archived_messages(
        &self,
        pagination_limit: u32,
        start_cursor: Option<&str>,
    ) -> Result<InboxPage, SdkError> {
        let archived: Vec<InboxMessage> = self.with_user(|user| {
            user.messages.iter().filter(|m| m.archived).cloned().collect()
        });
        page_of(archived, pagination_limit, start_cursor)
    }

    async fn get_unread_message_count(&self) -> Result<u64, SdkError> {
        Ok(self.with_user(|user| {
            user.messages.iter().filter(|m| !m.archived && !m.read).count() as u64
        }))
    }

    async fn get_message(&self, message_id: &str) -> Result<InboxMessage, SdkError> {
        self.with_user(|user| user.message_mut(message_id).map(|m| m.clone()))
    }

    async fn click(&self, message_id: &str, tracking_id: &str) -> Result<(), SdkError> {
        self.with_user(|user| -> Result<(), SdkError> {
            user.message_mut(message_id)?;
            user.clicks
                .push((message_id.to_string(), tracking_id.to_string()));
            Ok(())
        })
    }

    async fn unread(&self, message_id: &str) -> Result<(), SdkError> {
        self.update_message(message_id, |m| m.read = false)
    }

    async fn read(&self, message_id: &str) -> Result<(), SdkError> {
        self.update_message(message_id, |m| m.read = true)
    }

    async fn open(&self, message_id: &str) -> Result<(), SdkError> {
        self.update_message(message_id, |m| m.opened = true)
    }

    async fn archive(&self, message_id: &str) -> Result<(), SdkError> {
        self.update_message(message_id, |m| m.archived = true)
    }

    async fn read_all(&self) -> Result<(), SdkError> {
        self.with_user(|user| {
            for message in user.messages.iter_mut().filter(|m| !m.archived) {
                message.read = true;
            }
        });
        Ok(())
    }
}

#[async_trait]
impl TrackingApi for MemoryClient {
    async fn post_tracking_url(&self, url: &str, event: TrackingEvent) -> Result<(), SdkError> {
        self.with_user(|user| {
            user.tracking.push(TrackingPost {
                url: url.to_string(),
                event,
            })
        });
        Ok(())
    }
}

impl NotificationClient for MemoryClient {
    fn brands(&self) -> &dyn BrandApi {
        self
    }
    fn tokens(&self) -> &dyn TokenApi {
        self
    }
    fn preferences(&self) -> &dyn PreferenceApi {
        self
    }
    fn inbox(&self) -> &dyn InboxApi {
        self
    }
    fn tracking(&self) -> &dyn TrackingApi {
        self
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Builds [`MemoryClient`]s over one shared backend.
pub struct MemoryClientFactory {
    backend: Arc<MemoryBackend>,
}

impl MemoryClientFactory {
    pub fn new(backend: Arc<MemoryBackend>) -> Self {
        Self { backend }
    }
}

impl ClientFactory for MemoryClientFactory {
    fn build(&self, options: &ClientOptions) -> Result<Arc<dyn NotificationClient>, SdkError> {
        let has_credential = [&options.jwt, &options.client_key]
            .into_iter()
            .any(|c| c.as_deref().is_some_and(|value| !value.is_empty()));
        if !has_credential {
            return Err(SdkError::Unauthorized("empty credential".to_string()));
        }
        Ok(Arc::new(MemoryClient::new(
            Arc::clone(&self.backend),
            options.user_id.clone(),
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
