//! Record types exchanged with the notification SDK.
//!
//! Everything in this module is plain data: no I/O, no async, no locks.  The
//! types serialize to camelCase JSON because that is what hosts read back.
//!
//! # Tolerant versus strict enums
//!
//! Preference statuses and channels come from user-preference data that a
//! newer host or backend may extend at any time.  Unrecognised strings map to
//! an explicit `Unknown` variant instead of failing.
//!
//! Tracking events are different: an event name the bridge does not know is a
//! caller mistake and is rejected (see [`tracking::TrackingEvent`]).

pub mod brand;
pub mod device;
pub mod inbox;
pub mod options;
pub mod preferences;
pub mod tracking;

pub use brand::{Brand, BrandSettings};
pub use device::Device;
pub use inbox::{InboxAction, InboxMessage, InboxPage};
pub use options::ClientOptions;
pub use preferences::{
    Paging, PreferenceChannel, PreferenceStatus, PreferenceTopic, TopicUpdate, UserPreferences,
};
pub use tracking::{TrackingEvent, UnknownTrackingEvent};
