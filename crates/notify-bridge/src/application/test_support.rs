//! Recording SDK double shared by the application-layer unit tests.
//!
//! `RecordingClient` implements every capability trait, pushes one [`SdkCall`]
//! per invocation into `calls`, and answers with canned data.  Set
//! `fail_with` to make every operation fail, or `gate` to hold
//! `get_unread_message_count` until the test releases it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use notify_core::{
    Brand, BrandApi, ClientOptions, Device, InboxApi, InboxMessage, InboxPage,
    NotificationClient, Params, PreferenceApi, PreferenceStatus, PreferenceTopic, SdkError, TokenApi,
    TopicUpdate, TrackingApi, TrackingEvent, UserPreferences,
};

use super::registry::{ClientFactory, ClientSession};
use super::routes::SessionCall;
use crate::domain::BridgeConfig;

/// One recorded SDK invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkCall {
    GetBrand(String),
    PutToken { token: String, provider: String, device: Device },
    DeleteToken(String),
    GetPreferences(Option<String>),
    GetTopic(String),
    PutTopic(TopicUpdate),
    GetMessages { limit: u32, cursor: Option<String> },
    GetArchivedMessages { limit: u32, cursor: Option<String> },
    UnreadCount,
    GetMessage(String),
    Click { message_id: String, tracking_id: String },
    Unread(String),
    Read(String),
    Open(String),
    Archive(String),
    ReadAll,
    PostTracking { url: String, event: TrackingEvent },
}

/// Lets a test observe that a call started and decide when it finishes.
#[derive(Default)]
pub struct CallGate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct RecordingClient {
    pub calls: Mutex<Vec<SdkCall>>,
    pub unread_count: u64,
    pub fail_with: Option<SdkError>,
    pub gate: Option<Arc<CallGate>>,
}

impl RecordingClient {
    pub fn with_unread_count(count: u64) -> Self {
        Self {
            unread_count: count,
            ..Self::default()
        }
    }

    pub fn failing(err: SdkError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<SdkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SdkCall) -> Result<(), SdkError> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BrandApi for RecordingClient {
    async fn get_brand(&self, brand_id: &str) -> Result<Brand, SdkError> {
        self.record(SdkCall::GetBrand(brand_id.to_string()))?;
        Ok(Brand {
            id: brand_id.to_string(),
            name: Some("Acme".to_string()),
            settings: None,
        })
    }
}

#[async_trait]
impl TokenApi for RecordingClient {
    async fn put_user_token(
        &self,
        token: &str,
        provider: &str,
        device: &Device,
    ) -> Result<(), SdkError> {
        self.record(SdkCall::PutToken {
            token: token.to_string(),
            provider: provider.to_string(),
            device: device.clone(),
        })
    }

    async fn delete_user_token(&self, token: &str) -> Result<(), SdkError> {
        self.record(SdkCall::DeleteToken(token.to_string()))
    }
}

#[async_trait]
impl PreferenceApi for RecordingClient {
    async fn get_user_preferences(
        &self,
        pagination_cursor: Option<&str>,
    ) -> Result<UserPreferences, SdkError> {
        self.record(SdkCall::GetPreferences(pagination_cursor.map(str::to_string)))?;
        Ok(UserPreferences::default())
    }

    async fn get_user_preference_topic(&self, topic_id: &str) -> Result<PreferenceTopic, SdkError> {
        self.record(SdkCall::GetTopic(topic_id.to_string()))?;
        Ok(PreferenceTopic {
            topic_id: topic_id.to_string(),
            topic_name: "Marketing".to_string(),
            section_id: None,
            section_name: None,
            status: PreferenceStatus::OptedIn,
            default_status: PreferenceStatus::OptedIn,
            has_custom_routing: false,
            custom_routing: Vec::new(),
        })
    }

    async fn put_user_preference_topic(&self, update: &TopicUpdate) -> Result<(), SdkError> {
        self.record(SdkCall::PutTopic(update.clone()))
    }
}

#[async_trait]
impl InboxApi for RecordingClient {
    async fn get_messages(
        &self,
        pagination_limit: u32,
        start_cursor: Option<&str>,
    ) -> Result<InboxPage, SdkError> {
        self.record(SdkCall::GetMessages {
            limit: pagination_limit,
            cursor: start_cursor.map(str::to_string),
        })?;
        Ok(InboxPage {
            messages: vec![InboxMessage::new("m1", "Welcome")],
            total_count: 1,
            can_paginate: false,
            pagination_cursor: None,
        })
    }

    async fn get_archived_messages(
        &self,
        pagination_limit: u32,
        start_cursor: Option<&str>,
    ) -> Result<InboxPage, SdkError> {
        self.record(SdkCall::GetArchivedMessages {
            limit: pagination_limit,
            cursor: start_cursor.map(str::to_string),
        })?;
        Ok(InboxPage::default())
    }

    async fn get_unread_message_count(&self) -> Result<u64, SdkError> {
        self.record(SdkCall::UnreadCount)?;
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Ok(self.unread_count)
    }

    async fn get_message(&self, message_id: &str) -> Result<InboxMessage, SdkError> {
        self.record(SdkCall::GetMessage(message_id.to_string()))?;
        Ok(InboxMessage::new(message_id, "Welcome"))
    }

    async fn click(&self, message_id: &str, tracking_id: &str) -> Result<(), SdkError> {
        self.record(SdkCall::Click {
            message_id: message_id.to_string(),
            tracking_id: tracking_id.to_string(),
        })
    }

    async fn unread(&self, message_id: &str) -> Result<(), SdkError> {
        self.record(SdkCall::Unread(message_id.to_string()))
    }

    async fn read(&self, message_id: &str) -> Result<(), SdkError> {
        self.record(SdkCall::Read(message_id.to_string()))
    }

    async fn open(&self, message_id: &str) -> Result<(), SdkError> {
        self.record(SdkCall::Open(message_id.to_string()))
    }

    async fn archive(&self, message_id: &str) -> Result<(), SdkError> {
        self.record(SdkCall::Archive(message_id.to_string()))
    }

    async fn read_all(&self) -> Result<(), SdkError> {
        self.record(SdkCall::ReadAll)
    }
}

#[async_trait]
impl TrackingApi for RecordingClient {
    async fn post_tracking_url(&self, url: &str, event: TrackingEvent) -> Result<(), SdkError> {
        self.record(SdkCall::PostTracking {
            url: url.to_string(),
            event,
        })
    }
}

impl NotificationClient for RecordingClient {
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

/// Hands out the same `RecordingClient` for every session and counts builds.
pub struct SharedClientFactory {
    pub client: Arc<RecordingClient>,
    pub builds: AtomicUsize,
}

impl SharedClientFactory {
    pub fn new(client: RecordingClient) -> Self {
        Self {
            client: Arc::new(client),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ClientFactory for SharedClientFactory {
    fn build(&self, _options: &ClientOptions) -> Result<Arc<dyn NotificationClient>, SdkError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.client) as Arc<dyn NotificationClient>)
    }
}

/// Builds a handler input around `client` with the default configuration.
pub fn session_call(client: Arc<RecordingClient>, params: Value) -> SessionCall {
    session_call_with_config(client, params, BridgeConfig::default())
}

pub fn session_call_with_config(
    client: Arc<RecordingClient>,
    params: Value,
    config: BridgeConfig,
) -> SessionCall {
    let options = ClientOptions {
        user_id: "mike".to_string(),
        jwt: Some("token".to_string()),
        client_key: None,
        connection_id: None,
        tenant_id: None,
        show_logs: false,
    };
    let client: Arc<dyn NotificationClient> = client;
    SessionCall {
        session: Arc::new(ClientSession::new("u1", options, client)),
        params: Params::from_value(params).unwrap(),
        config: Arc::new(config),
    }
}
