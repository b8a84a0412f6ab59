//! Source resolution.
//!
//! Turns load parameters into exactly one [`ConfigSource`] descriptor. The
//! resolver re-reads the environment and filesystem on every call; for an
//! unchanged snapshot it always produces the same descriptor.

use crate::error::{ConfigError, Result};
use crate::sources::bindings::{self, DEFAULT_BINDINGS_PATH, ServiceBinding};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Environment variable carrying the raw service-binding JSON document.
pub const VCAP_SERVICES_VAR: &str = "VCAP_SERVICES";

/// Environment variable carrying the server base URI in skip-auth mode.
pub const SKIP_AUTH_URI_VAR: &str = "CONFIG_SERVER_URI_WHEN_SKIP_AUTH";

/// Recognized config-server service-type keys, in lookup priority order.
/// Both spellings exist across platform versions.
pub const CONFIG_SERVER_KEYS: [&str; 2] = ["p-config-server", "p.config-server"];

/// Where configuration is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLocation {
    /// A YAML file on the local filesystem.
    Local,
    /// A remote config server with OAuth2 client-credentials authentication.
    Remote,
    /// A remote config server reached without authentication.
    RemoteSkipAuth,
}

/// Parameters for a configuration load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadParams {
    /// Application name, used in the configuration file/resource name.
    pub app_name: String,
    /// Deployment profile (e.g. dev/uat/prod).
    pub profile: String,
    /// Logical name of the config-server binding (or local directory).
    pub config_server_name: String,
    /// Which kind of source to resolve.
    pub location: ConfigLocation,
    /// When set, each load additionally logs the full serialized value.
    pub log_properties: bool,
    /// Auto-refresh period in seconds. `None` or zero disables refresh.
    pub interval: Option<u64>,
}

impl LoadParams {
    /// Create load parameters with refresh disabled and property logging off.
    pub fn new(
        app_name: impl Into<String>,
        profile: impl Into<String>,
        config_server_name: impl Into<String>,
        location: ConfigLocation,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            profile: profile.into(),
            config_server_name: config_server_name.into(),
            location,
            log_properties: false,
            interval: None,
        }
    }

    /// Log the full configuration value on every load.
    pub fn with_log_properties(mut self, log_properties: bool) -> Self {
        self.log_properties = log_properties;
        self
    }

    /// Enable auto-refresh with the given period in seconds.
    pub fn with_interval(mut self, seconds: u64) -> Self {
        self.interval = Some(seconds);
        self
    }
}

/// Resolved, source-specific descriptor for exactly one configuration fetch.
///
/// An explicit sum type: each variant carries only the fields its loader
/// needs, so no descriptor can be ambiguous between sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Load from a YAML file on disk.
    Local {
        /// Path to the file, relative to the current working directory.
        path: String,
    },
    /// Load from a config server after an OAuth2 token exchange.
    Remote {
        /// Application name used in the resource path.
        app_name: String,
        /// Deployment profile used in the resource path.
        profile: String,
        /// Config-server base URI.
        uri: String,
        /// OAuth2 token endpoint.
        access_token_uri: String,
        /// OAuth2 client id.
        client_id: String,
        /// OAuth2 client secret.
        client_secret: String,
    },
    /// Load from a config server without authentication.
    RemoteNoAuth {
        /// Application name used in the resource path.
        app_name: String,
        /// Deployment profile used in the resource path.
        profile: String,
        /// Config-server base URI.
        uri: String,
    },
}

impl ConfigSource {
    /// Short label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Remote { .. } => "remote",
            Self::RemoteNoAuth { .. } => "remote-skip-auth",
        }
    }
}

/// Resolve load parameters into a single source descriptor.
pub fn resolve(params: &LoadParams) -> Result<ConfigSource> {
    match params.location {
        ConfigLocation::Local => Ok(ConfigSource::Local {
            path: format!(
                "./{}/{}-{}.yml",
                params.config_server_name, params.app_name, params.profile
            ),
        }),
        ConfigLocation::Remote => {
            let raw = std::env::var(VCAP_SERVICES_VAR).ok();
            let map = bindings::read_bindings(raw.as_deref(), Path::new(DEFAULT_BINDINGS_PATH))?;
            resolve_remote(params, &map)
        }
        ConfigLocation::RemoteSkipAuth => {
            let uri = std::env::var(SKIP_AUTH_URI_VAR).map_err(|_| {
                ConfigError::Configuration(format!("{SKIP_AUTH_URI_VAR} is not set"))
            })?;
            Ok(ConfigSource::RemoteNoAuth {
                app_name: params.app_name.clone(),
                profile: params.profile.clone(),
                uri,
            })
        }
    }
}

fn resolve_remote(params: &LoadParams, map: &Map<String, JsonValue>) -> Result<ConfigSource> {
    let list = CONFIG_SERVER_KEYS
        .iter()
        .find_map(|key| map.get(*key))
        .ok_or_else(|| {
            ConfigError::Configuration(format!(
                "no config-server binding key present; expected one of {CONFIG_SERVER_KEYS:?}"
            ))
        })?;

    let entries: Vec<ServiceBinding> = serde_json::from_value(list.clone())
        .map_err(|e| ConfigError::Parse(format!("Invalid config-server binding list: {e}")))?;

    let entry = entries
        .into_iter()
        .find(|binding| binding.name == params.config_server_name)
        .ok_or_else(|| ConfigError::NotFound(params.config_server_name.clone()))?;

    Ok(ConfigSource::Remote {
        app_name: params.app_name.clone(),
        profile: params.profile.clone(),
        uri: entry.credentials.uri,
        access_token_uri: entry.credentials.access_token_uri,
        client_id: entry.credentials.client_id,
        client_secret: entry.credentials.client_secret,
    })
}
