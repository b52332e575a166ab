//! Collaborator traits through which the notification SDK is consumed.
//!
//! The bridge treats the SDK as an opaque asynchronous service.  Each
//! capability area is its own trait so that a handler can only reach the
//! operations of the area it belongs to, and so that test doubles can be
//! written one area at a time.
//!
//! ```text
//! NotificationClient
//!   ├── brands()       → &dyn BrandApi
//!   ├── tokens()       → &dyn TokenApi
//!   ├── preferences()  → &dyn PreferenceApi
//!   ├── inbox()        → &dyn InboxApi
//!   └── tracking()     → &dyn TrackingApi
//! ```
//!
//! A type implementing all five area traits can return `self` from every
//! accessor.
//!
//! # Errors
//!
//! Every operation fails with [`SdkError`].  The bridge never interprets the
//! cause; it relays it to the host as an `operation_failed` error.  Retry and
//! timeout policy, if any, belong to the implementation behind these traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Brand, Device, InboxMessage, InboxPage, PreferenceTopic, TopicUpdate, TrackingEvent,
    UserPreferences,
};

/// Failure reported by an SDK operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// The addressed entity (brand, message, topic) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The client's credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Brand lookup.
#[async_trait]
pub trait BrandApi: Send + Sync {
    async fn get_brand(&self, brand_id: &str) -> Result<Brand, SdkError>;
}

/// Push-token registration.
#[async_trait]
pub trait TokenApi: Send + Sync {
    async fn put_user_token(
        &self,
        token: &str,
        provider: &str,
        device: &Device,
    ) -> Result<(), SdkError>;

    async fn delete_user_token(&self, token: &str) -> Result<(), SdkError>;
}

/// Preference management.
#[async_trait]
pub trait PreferenceApi: Send + Sync {
    async fn get_user_preferences(
        &self,
        pagination_cursor: Option<&str>,
    ) -> Result<UserPreferences, SdkError>;

    async fn get_user_preference_topic(&self, topic_id: &str)
        -> Result<PreferenceTopic, SdkError>;

    async fn put_user_preference_topic(&self, update: &TopicUpdate) -> Result<(), SdkError>;
}

/// Inbox reads and state transitions.
///
/// Repeating a state transition (reading a read message) is the
/// implementation's business; callers relay whatever it returns.
#[async_trait]
pub trait InboxApi: Send + Sync {
    async fn get_messages(
        &self,
        pagination_limit: u32,
        start_cursor: Option<&str>,
    ) -> Result<InboxPage, SdkError>;

    async fn get_archived_messages(
        &self,
        pagination_limit: u32,
        start_cursor: Option<&str>,
    ) -> Result<InboxPage, SdkError>;

    async fn get_unread_message_count(&self) -> Result<u64, SdkError>;

    async fn get_message(&self, message_id: &str) -> Result<InboxMessage, SdkError>;

    async fn click(&self, message_id: &str, tracking_id: &str) -> Result<(), SdkError>;

    async fn unread(&self, message_id: &str) -> Result<(), SdkError>;

    async fn read(&self, message_id: &str) -> Result<(), SdkError>;

    async fn open(&self, message_id: &str) -> Result<(), SdkError>;

    async fn archive(&self, message_id: &str) -> Result<(), SdkError>;

    async fn read_all(&self) -> Result<(), SdkError>;
}

/// Delivery tracking.
#[async_trait]
pub trait TrackingApi: Send + Sync {
    async fn post_tracking_url(&self, url: &str, event: TrackingEvent) -> Result<(), SdkError>;
}

/// A configured SDK client, grouped by capability area.
pub trait NotificationClient: Send + Sync {
    fn brands(&self) -> &dyn BrandApi;
    fn tokens(&self) -> &dyn TokenApi;
    fn preferences(&self) -> &dyn PreferenceApi;
    fn inbox(&self) -> &dyn InboxApi;
    fn tracking(&self) -> &dyn TrackingApi;
}
