//! # notify-core
//!
//! Shared foundation for notify-bridge: the untyped parameter bundle and its
//! extractor, the record types exchanged with the notification SDK, and the
//! asynchronous collaborator traits the SDK is consumed through.
//!
//! This crate performs no I/O and owns no runtime.  It can be compiled and
//! tested without a network, a host application, or a real SDK.
//!
//! # Architecture overview (for beginners)
//!
//! A host application (for example a mobile UI) sends *commands* to the bridge
//! as a name plus a loosely-typed JSON map of parameters.  Before any of those
//! values reach typed code they pass through exactly one gate:
//!
//! - **`params`** – The [`Params`] bundle and the [`FromParam`] conversions.
//!   This is the only place where an untyped `serde_json::Value` becomes a
//!   `String`, `bool`, `u32`, and so on.
//!
//! - **`domain`** – Plain data types the SDK speaks: brands, devices,
//!   preference topics, inbox messages, tracking events, and the options used
//!   to configure a client.
//!
//! - **`sdk`** – The traits a notification client implements, grouped by
//!   capability area (brands, tokens, preferences, inbox, tracking), plus the
//!   opaque [`SdkError`] those operations fail with.

pub mod domain;
pub mod params;
pub mod sdk;

// Re-export the most-used types at the crate root so callers can write
// `notify_core::Params` instead of `notify_core::params::Params`.
pub use domain::{
    Brand, ClientOptions, Device, InboxMessage, InboxPage, Paging, PreferenceChannel,
    PreferenceStatus, PreferenceTopic, TopicUpdate, TrackingEvent, UserPreferences,
};
pub use params::{FromParam, ParamError, Params};
pub use sdk::{
    BrandApi, InboxApi, NotificationClient, PreferenceApi, SdkError, TokenApi, TrackingApi,
};
