//! notify-bridge library crate.
//!
//! A string-keyed, asynchronous command bridge between a host application and
//! a notification SDK.  The host sends commands such as
//! `"inbox.get_unread_message_count"` with a loosely-typed JSON parameter map;
//! the bridge validates the parameters, resolves the client session the
//! command addresses, calls the SDK and sends back exactly one reply.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Host application (JSON lines over stdin/stdout, or the library API)
//!         ↕
//! [notify-bridge]
//!   ├── domain/            Pure types: Command, Reply, wire messages, BridgeConfig
//!   ├── application/       Registry, routing table, handlers, dispatcher, errors
//!   └── infrastructure/
//!         ├── config_file/ TOML configuration loader
//!         ├── line_server/ JSON-lines transport
//!         └── memory_sdk/  In-memory notification backend
//!         ↕
//! Notification SDK (notify-core traits)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `notify-core`; it never reads or
//!   writes a stream.
//! - `infrastructure` depends on all other layers plus `tokio` and `toml`.
//!
//! # Embedding
//!
//! A host that links the library directly supplies its own
//! [`ClientFactory`](application::ClientFactory) and calls
//! [`Dispatcher::dispatch`](application::Dispatcher::dispatch):
//!
//! ```rust
//! use std::sync::Arc;
//! use notify_bridge::application::{ClientRegistry, Dispatcher};
//! use notify_bridge::domain::{BridgeConfig, Command, Reply};
//! use notify_bridge::infrastructure::{MemoryBackend, MemoryClientFactory};
//!
//! # tokio_test::block_on(async {
//! let factory = MemoryClientFactory::new(Arc::new(MemoryBackend::new()));
//! let registry = Arc::new(ClientRegistry::new(Arc::new(factory)));
//! let dispatcher = Dispatcher::new(registry, BridgeConfig::default()).unwrap();
//!
//! let reply = dispatcher
//!     .dispatch(Command::new("foo.bar", serde_json::json!({})))
//!     .await;
//! assert_eq!(reply, Reply::NotImplemented);
//! # });
//! ```

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: sessions, routing and command execution.
pub mod application;

/// Infrastructure layer: configuration file, host transport, in-memory SDK.
pub mod infrastructure;
