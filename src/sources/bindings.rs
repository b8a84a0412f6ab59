//! Service-binding reader.
//!
//! Platforms hand applications their backing-service credentials as a JSON
//! document, either through the `VCAP_SERVICES` environment variable or as a
//! file dropped next to the process. This module parses that document; it is
//! re-read on every resolution and never cached.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Fallback file consulted when no raw binding document is supplied.
pub const DEFAULT_BINDINGS_PATH: &str = "./vcap_services.json";

/// Credential fields carried by a config-server binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingCredentials {
    /// Base URI of the configuration server.
    pub uri: String,
    /// OAuth2 token endpoint for the client-credentials exchange.
    pub access_token_uri: String,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
}

/// One named backing-service binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceBinding {
    /// The binding's logical name, matched against the requested server name.
    pub name: String,
    /// Connection credentials for the bound service.
    pub credentials: BindingCredentials,
}

/// Read the service-binding document.
///
/// A non-empty `raw` string takes priority and must be valid JSON. Otherwise
/// the `fallback` path is consulted (relative paths resolve against the
/// current working directory); a missing fallback file yields an empty map
/// rather than an error.
pub fn read_bindings(raw: Option<&str>, fallback: &Path) -> Result<Map<String, JsonValue>> {
    if let Some(raw) = raw {
        if !raw.is_empty() {
            return parse_document(raw);
        }
    }

    if fallback.exists() {
        let text = std::fs::read_to_string(fallback)?;
        return parse_document(&text);
    }

    Ok(Map::new())
}

fn parse_document(text: &str) -> Result<Map<String, JsonValue>> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|e| ConfigError::Parse(format!("Invalid service-binding JSON: {e}")))?;

    match value {
        JsonValue::Object(map) => Ok(map),
        _ => Err(ConfigError::Parse(
            "Service-binding document must be a JSON object".to_string(),
        )),
    }
}
