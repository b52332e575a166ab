//! Inbox messages and pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A call-to-action attached to an inbox message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One message in a user's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// ISO-8601 creation timestamp as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub actions: Vec<InboxAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub opened: bool,
    #[serde(default)]
    pub archived: bool,
    /// Identifier the backend expects back when the message is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

impl InboxMessage {
    /// Creates an unread, unopened, unarchived message with only an id and a title.
    pub fn new(message_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            title: Some(title.into()),
            body: None,
            preview: None,
            created: None,
            actions: Vec::new(),
            data: None,
            read: false,
            opened: false,
            archived: false,
            tracking_id: None,
        }
    }
}

/// A page of inbox messages plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxPage {
    pub messages: Vec<InboxMessage>,
    pub total_count: u64,
    pub can_paginate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination_cursor: Option<String>,
}
