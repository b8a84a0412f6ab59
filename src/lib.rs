//! # cloud-config-client
//!
//! Configuration-retrieval client for Spring Cloud Config style servers.
//!
//! ## Overview
//!
//! Given an application name, a deployment profile, and a target location,
//! `cloud-config-client` produces a single in-memory configuration value
//! sourced from:
//! - a local YAML file (`./{server}/{app}-{profile}.yml`), with `!env` tags
//!   substituting environment-variable values into scalars,
//! - a remote config server reached with OAuth2 client-credentials
//!   authentication, with credentials taken from platform service bindings
//!   (`VCAP_SERVICES` or `./vcap_services.json`), or
//! - a remote config server reached without authentication
//!   (`CONFIG_SERVER_URI_WHEN_SKIP_AUTH`).
//!
//! An optional interval re-fetches the configuration on a fixed period,
//! atomically replacing the held value and retaining the last good value
//! across failed refreshes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloud_config_client::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let store = ConfigStore::new();
//!
//! let handle = store
//!     .load(
//!         LoadParams::new("my-app", "prod", "my-config-server", ConfigLocation::Remote)
//!             .with_interval(60),
//!     )
//!     .await?;
//!
//! // Lock-free read of the most recent value.
//! if let Some(config) = store.current() {
//!     println!("host: {:?}", config["my-app"]["host"]);
//! }
//!
//! // Stop auto-refresh on shutdown.
//! handle.stop();
//! # Ok(())
//! # }
//! ```
//!
//! The initial load completes (or fails hard) before `load` returns;
//! subsequent refreshes run in the background, log failures, and never
//! disturb the previously loaded value.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ConfigStore, RefreshHandle};
    pub use crate::error::{ConfigError, Result};
    pub use crate::sources::{ConfigLocation, ConfigSource, LoadParams};
}
