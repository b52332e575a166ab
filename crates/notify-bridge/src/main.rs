//! notify-bridge entry point.
//!
//! Runs the command bridge as a standalone process speaking JSON lines: one
//! request per line on stdin, one reply per line on stdout.  Logs go to
//! stderr so stdout carries nothing but replies.
//!
//! The binary serves sessions from the in-memory notification backend, which
//! makes it useful for developing and testing host integrations without a
//! hosted service.  Hosts that embed a real SDK link the library instead and
//! supply their own `ClientFactory`.
//!
//! # Usage
//!
//! ```text
//! notify-bridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>             TOML configuration file
//!   --inbox-page-limit <N>      Default inbox page size (1-100)
//!   --log-level <FILTER>        Log filter used when RUST_LOG is unset
//!   --demo-data                 Seed every new user with a demo inbox
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                  | Description                      |
//! |---------------------------|----------------------------------|
//! | `NOTIFY_BRIDGE_CONFIG`    | Path of the TOML config file     |
//! | `NOTIFY_INBOX_PAGE_LIMIT` | Default inbox page size          |
//! | `NOTIFY_LOG_LEVEL`        | Log filter when `RUST_LOG` unset |
//!
//! # Example session
//!
//! ```text
//! → {"id":1,"command":"client.add","parameters":{"clientId":"u1","userId":"mike","jwt":"t"}}
//! ← {"id":1,"status":"ok","value":"u1"}
//! → {"id":2,"command":"inbox.get_unread_message_count","parameters":{"clientId":"u1"}}
//! ← {"id":2,"status":"ok","value":3}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use notify_bridge::application::{ClientRegistry, Dispatcher};
use notify_bridge::domain::BridgeConfig;
use notify_bridge::infrastructure::{load_config, serve, MemoryBackend, MemoryClientFactory};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Command bridge between a host application and a notification SDK.
#[derive(Debug, Parser)]
#[command(
    name = "notify-bridge",
    about = "JSON-lines command bridge between a host application and a notification SDK",
    version
)]
struct Cli {
    /// TOML configuration file.  A path that does not exist yields defaults.
    #[arg(long, env = "NOTIFY_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Default page size for inbox listings when the host omits one.
    ///
    /// Overrides the config file; clamped to 1..=100.
    #[arg(long, env = "NOTIFY_INBOX_PAGE_LIMIT")]
    inbox_page_limit: Option<u32>,

    /// `tracing` filter used when `RUST_LOG` is not set.  Overrides the config
    /// file.
    #[arg(long, env = "NOTIFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Seed every new user of the in-memory backend with a demo brand,
    /// preference topics and inbox messages.
    #[arg(long)]
    demo_data: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = load_config(self.config.as_deref()).with_context(|| {
            format!(
                "failed to load configuration from {}",
                self.config
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )
        })?;

        if let Some(limit) = self.inbox_page_limit {
            config = config.with_inbox_pagination_limit(limit);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. CLI arguments are parsed and merged with the config file.
/// 2. `tracing_subscriber` is initialised, writing to stderr.  `RUST_LOG`
///    wins over the configured level.
/// 3. The dispatcher is built over the in-memory backend.
/// 4. Requests are served from stdin until end of input or Ctrl+C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let demo_data = cli.demo_data;
    let config = cli.into_bridge_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "notify-bridge starting: inbox_pagination_limit={}, demo_data={demo_data}",
        config.inbox_pagination_limit
    );

    // ── Wiring ────────────────────────────────────────────────────────────────
    let backend = if demo_data {
        MemoryBackend::with_demo_data()
    } else {
        MemoryBackend::new()
    };
    let factory = MemoryClientFactory::new(Arc::new(backend));
    let registry = Arc::new(ClientRegistry::new(Arc::new(factory)));
    let dispatcher = Arc::new(
        Dispatcher::new(Arc::clone(&registry), config).context("failed to build routing table")?,
    );

    // ── Serve until end of input or Ctrl+C ───────────────────────────────────
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = serve(stdin, stdout, dispatcher) => {
            let handled = result?;
            info!("notify-bridge stopped after {handled} requests");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("received Ctrl+C; shutting down");
        }
    }

    let open = registry.session_ids();
    if !open.is_empty() {
        info!("closing {} open sessions: {}", open.len(), open.join(", "));
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
