//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for process-wide settings.
//! It is built once at startup (TOML file, then CLI overrides) and shared with
//! every dispatched command behind an `Arc`.
//!
//! # Example
//!
//! ```rust
//! use notify_bridge::domain::BridgeConfig;
//!
//! let cfg = BridgeConfig::default();
//! assert_eq!(cfg.inbox_pagination_limit, 32);
//! assert_eq!(cfg.page_limit_or_default(None), 32);
//! assert_eq!(cfg.page_limit_or_default(Some(10)), 10);
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when neither the config file nor the CLI sets one.
pub const DEFAULT_INBOX_PAGINATION_LIMIT: u32 = 32;

/// Smallest configurable default page size.
pub const MIN_INBOX_PAGINATION_LIMIT: u32 = 1;

/// Largest configurable default page size.  The backend refuses bigger pages.
pub const MAX_INBOX_PAGINATION_LIMIT: u32 = 100;

/// All runtime configuration for the bridge.
///
/// Every field has a serde default so a partial (or empty) TOML file is valid:
///
/// ```toml
/// inbox_pagination_limit = 24
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Default page size for `inbox.get_messages` and
    /// `inbox.get_archived_messages` when the host omits `paginationLimit`.
    #[serde(default = "default_inbox_pagination_limit")]
    pub inbox_pagination_limit: u32,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl BridgeConfig {
    /// Returns a copy with the default page size set, clamped to
    /// `MIN_INBOX_PAGINATION_LIMIT..=MAX_INBOX_PAGINATION_LIMIT`.
    pub fn with_inbox_pagination_limit(mut self, limit: u32) -> Self {
        self.inbox_pagination_limit =
            limit.clamp(MIN_INBOX_PAGINATION_LIMIT, MAX_INBOX_PAGINATION_LIMIT);
        self
    }

    /// Clamps values that may have come straight from a file.
    pub fn normalized(self) -> Self {
        let limit = self.inbox_pagination_limit;
        self.with_inbox_pagination_limit(limit)
    }

    /// Resolves the page size for an inbox request.
    ///
    /// A value supplied by the host is forwarded unchanged; the SDK owns any
    /// further validation.
    pub fn page_limit_or_default(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.inbox_pagination_limit)
    }
}

fn default_inbox_pagination_limit() -> u32 {
    DEFAULT_INBOX_PAGINATION_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            inbox_pagination_limit: default_inbox_pagination_limit(),
            log_level: default_log_level(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
