//! User preference topics, statuses, and delivery channels.
//!
//! Statuses and channels use *tolerant* conversion: any string the bridge does
//! not recognise becomes `Unknown` rather than an error.  Preference data is
//! owned by the backend and may gain new values before every host and bridge
//! build knows about them.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a user receives notifications for a topic.
///
/// Wire strings: `OPTED_IN`, `OPTED_OUT`, `REQUIRED`, `UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreferenceStatus {
    OptedIn,
    OptedOut,
    Required,
    Unknown,
}

impl PreferenceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceStatus::OptedIn => "OPTED_IN",
            PreferenceStatus::OptedOut => "OPTED_OUT",
            PreferenceStatus::Required => "REQUIRED",
            PreferenceStatus::Unknown => "UNKNOWN",
        }
    }

    /// Maps a wire string to a status; unrecognised input yields `Unknown`.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw {
            "OPTED_IN" => PreferenceStatus::OptedIn,
            "OPTED_OUT" => PreferenceStatus::OptedOut,
            "REQUIRED" => PreferenceStatus::Required,
            "UNKNOWN" => PreferenceStatus::Unknown,
            other => {
                debug!("unrecognised preference status '{other}'; treating as UNKNOWN");
                PreferenceStatus::Unknown
            }
        }
    }
}

impl From<String> for PreferenceStatus {
    fn from(raw: String) -> Self {
        Self::parse_lossy(&raw)
    }
}

impl From<PreferenceStatus> for String {
    fn from(status: PreferenceStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A delivery channel a topic can be routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreferenceChannel {
    DirectMessage,
    Inbox,
    Email,
    Push,
    Sms,
    Webhook,
    Unknown,
}

impl PreferenceChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceChannel::DirectMessage => "direct_message",
            PreferenceChannel::Inbox => "inbox",
            PreferenceChannel::Email => "email",
            PreferenceChannel::Push => "push",
            PreferenceChannel::Sms => "sms",
            PreferenceChannel::Webhook => "webhook",
            PreferenceChannel::Unknown => "unknown",
        }
    }

    /// Maps a wire string to a channel; unrecognised input yields `Unknown`.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw {
            "direct_message" => PreferenceChannel::DirectMessage,
            "inbox" => PreferenceChannel::Inbox,
            "email" => PreferenceChannel::Email,
            "push" => PreferenceChannel::Push,
            "sms" => PreferenceChannel::Sms,
            "webhook" => PreferenceChannel::Webhook,
            "unknown" => PreferenceChannel::Unknown,
            other => {
                debug!("unrecognised delivery channel '{other}'; treating as unknown");
                PreferenceChannel::Unknown
            }
        }
    }
}

impl From<String> for PreferenceChannel {
    fn from(raw: String) -> Self {
        Self::parse_lossy(&raw)
    }
}

impl From<PreferenceChannel> for String {
    fn from(channel: PreferenceChannel) -> Self {
        channel.as_str().to_string()
    }
}

/// One preference topic as stored for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceTopic {
    pub topic_id: String,
    pub topic_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
    pub status: PreferenceStatus,
    pub default_status: PreferenceStatus,
    pub has_custom_routing: bool,
    pub custom_routing: Vec<PreferenceChannel>,
}

/// Cursor information attached to a page of preference topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub more: bool,
}

/// A page of the user's preference topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub items: Vec<PreferenceTopic>,
    pub paging: Paging,
}

/// A change to one topic, as forwarded to the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicUpdate {
    pub topic_id: String,
    pub status: PreferenceStatus,
    pub has_custom_routing: bool,
    pub custom_routing: Vec<PreferenceChannel>,
}

impl TopicUpdate {
    /// Builds an update from raw host strings, mapping unknown values to
    /// `Unknown` instead of failing.
    pub fn from_raw(
        topic_id: String,
        status: &str,
        has_custom_routing: bool,
        custom_routing: &[String],
    ) -> Self {
        Self {
            topic_id,
            status: PreferenceStatus::parse_lossy(status),
            has_custom_routing,
            custom_routing: custom_routing
                .iter()
                .map(|raw| PreferenceChannel::parse_lossy(raw))
                .collect(),
        }
    }
}
