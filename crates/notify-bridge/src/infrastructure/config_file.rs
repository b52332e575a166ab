//! TOML configuration file loader.
//!
//! The bridge reads an optional TOML file at startup.  A missing file is not
//! an error (defaults apply); an unreadable or malformed one is.
//!
//! ```toml
//! # notify-bridge.toml
//! inbox_pagination_limit = 24
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::BridgeConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads the bridge configuration.
///
/// - `None` → defaults.
/// - A path that does not exist → defaults.
/// - Otherwise the file is parsed and its values normalized (the default page
///   size is clamped to its allowed range).
///
/// # Errors
///
/// [`ConfigError::Io`] if the file exists but cannot be read, and
/// [`ConfigError::Parse`] if it is not valid TOML for [`BridgeConfig`].
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("config file {} not found; using defaults", path.display());
            Ok(BridgeConfig::default())
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parses configuration from TOML text and normalizes it.
///
/// # Errors
///
/// [`ConfigError::Parse`] if `content` is not valid TOML for [`BridgeConfig`].
pub fn parse_config(content: &str) -> Result<BridgeConfig, ConfigError> {
    let cfg: BridgeConfig = toml::from_str(content)?;
    Ok(cfg.normalized())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// A unique path under the system temp directory.
    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("notify-bridge-{}.toml", Uuid::new_v4()))
    }

    #[test]
    fn test_no_path_yields_defaults() {
        assert_eq!(load_config(None).unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        // Arrange
        let path = temp_path();

        // Act
        let cfg = load_config(Some(&path)).unwrap();

        // Assert
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn test_existing_file_is_parsed() {
        // Arrange
        let path = temp_path();
        std::fs::write(&path, "inbox_pagination_limit = 24\nlog_level = \"debug\"\n").unwrap();

        // Act
        let cfg = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        // Assert
        let cfg = cfg.unwrap();
        assert_eq!(cfg.inbox_pagination_limit, 24);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let path = temp_path();
        std::fs::write(&path, "inbox_pagination_limit = \"lots\"").unwrap();

        let result = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_directory_path_is_an_io_error() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            load_config(Some(&dir)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_out_of_range_limit_is_clamped() {
        assert_eq!(parse_config("inbox_pagination_limit = 0").unwrap().inbox_pagination_limit, 1);
        assert_eq!(
            parse_config("inbox_pagination_limit = 5000").unwrap().inbox_pagination_limit,
            100
        );
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), BridgeConfig::default());
    }
}
