//! Error types for cloud-config-client.

/// Result type alias for cloud-config-client operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when resolving, fetching, or parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed JSON or YAML content.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Local file missing or unreadable.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Service bindings or environment are missing something required
    /// to resolve a source.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A named config-server binding was not present in the bindings list.
    #[error("Config server binding not found: {0}")]
    NotFound(String),

    /// OAuth2 token exchange failed or produced no usable token.
    #[error("Token exchange failed: {0}")]
    Auth(String),

    /// Transport failure or bad status while fetching remote configuration.
    #[error("Failed to fetch configuration: {0}")]
    Fetch(String),
}

impl ConfigError {
    /// True when this error came out of the token-exchange step.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
