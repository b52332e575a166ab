//! Delivery-tracking events.
//!
//! Unlike preference statuses, tracking events use *strict* conversion: an
//! unrecognised name is rejected with [`UnknownTrackingEvent`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An event reported against a tracking URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingEvent {
    Clicked,
    Delivered,
    Opened,
    Read,
    Unread,
}

impl TrackingEvent {
    pub const ALL: [TrackingEvent; 5] = [
        TrackingEvent::Clicked,
        TrackingEvent::Delivered,
        TrackingEvent::Opened,
        TrackingEvent::Read,
        TrackingEvent::Unread,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackingEvent::Clicked => "clicked",
            TrackingEvent::Delivered => "delivered",
            TrackingEvent::Opened => "opened",
            TrackingEvent::Read => "read",
            TrackingEvent::Unread => "unread",
        }
    }
}

impl fmt::Display for TrackingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`TrackingEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tracking event '{0}'")]
pub struct UnknownTrackingEvent(pub String);

impl FromStr for TrackingEvent {
    type Err = UnknownTrackingEvent;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        TrackingEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == raw)
            .ok_or_else(|| UnknownTrackingEvent(raw.to_string()))
    }
}
