//! Remote configuration loaders.
//!
//! Fetches `{uri}/{app}-{profile}.yml` from a config server, either after an
//! OAuth2 client-credentials token exchange or unauthenticated. A single
//! failure on either network call aborts the load; there is no retry and no
//! explicit timeout beyond the HTTP client's defaults.

use crate::error::{ConfigError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Fetch configuration with OAuth2 client-credentials authentication.
///
/// Exchanges the client credentials for a bearer token at
/// `access_token_uri`, then fetches the YAML resource with
/// `authorization: bearer {token}`.
pub async fn load_authenticated(
    client: &Client,
    app_name: &str,
    profile: &str,
    uri: &str,
    access_token_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<Value> {
    let token = exchange_token(client, access_token_uri, client_id, client_secret).await?;
    fetch_yaml(client, uri, app_name, profile, Some(&token)).await
}

/// Fetch configuration without authentication.
pub async fn load_unauthenticated(
    client: &Client,
    app_name: &str,
    profile: &str,
    uri: &str,
) -> Result<Value> {
    fetch_yaml(client, uri, app_name, profile, None).await
}

async fn exchange_token(
    client: &Client,
    token_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String> {
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let response = client
        .post(token_uri)
        .form(&form)
        .send()
        .await
        .map_err(|e| ConfigError::Auth(format!("token request to {token_uri} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConfigError::Auth(format!(
            "token endpoint {token_uri} returned {status}"
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| ConfigError::Auth(format!("invalid token response: {e}")))?;

    // A response without a usable token fails here rather than producing a
    // bogus bearer header downstream.
    match body.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ConfigError::Auth(
            "token response carried no access_token".to_string(),
        )),
    }
}

async fn fetch_yaml(
    client: &Client,
    base_uri: &str,
    app_name: &str,
    profile: &str,
    token: Option<&str>,
) -> Result<Value> {
    let url = format!("{base_uri}/{app_name}-{profile}.yml");

    let mut request = client.get(&url);
    if let Some(token) = token {
        request = request.header("authorization", format!("bearer {token}"));
    }

    let response = request
        .send()
        .await
        .map_err(|e| ConfigError::Fetch(format!("GET {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConfigError::Fetch(format!("GET {url} returned {status}")));
    }

    let text = response
        .text()
        .await
        .map_err(|e| ConfigError::Fetch(format!("reading body from {url} failed: {e}")))?;

    // No !env substitution on this path; remote documents are taken as served.
    serde_yaml::from_str(&text)
        .map_err(|e| ConfigError::Parse(format!("Invalid YAML from {url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FIXTURE_YAML: &str = "test-app:\n  host: www.test.com\n  port: \"443\"\n";

    async fn mount_token_endpoint(server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=id-123"))
            .and(body_string_contains("client_secret=secret-456"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": token })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_authenticated_load_carries_bearer_token() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "1234").await;

        Mock::given(method("GET"))
            .and(path("/testApp-test.yml"))
            .and(header("authorization", "bearer 1234"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE_YAML))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let token_uri = format!("{}/oauth/token", server.uri());
        let value = load_authenticated(
            &client,
            "testApp",
            "test",
            &server.uri(),
            &token_uri,
            "id-123",
            "secret-456",
        )
        .await
        .unwrap();

        assert_eq!(
            value["test-app"]["host"],
            Value::String("www.test.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_access_token_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token_type": "bearer" })),
            )
            .mount(&server)
            .await;

        let client = Client::new();
        let token_uri = format!("{}/oauth/token", server.uri());
        let err = load_authenticated(
            &client,
            "testApp",
            "test",
            &server.uri(),
            &token_uri,
            "id-123",
            "secret-456",
        )
        .await
        .unwrap_err();

        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_token_endpoint_failure_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = Client::new();
        let token_uri = format!("{}/oauth/token", server.uri());
        let err = load_authenticated(
            &client,
            "testApp",
            "test",
            &server.uri(),
            &token_uri,
            "id-123",
            "secret-456",
        )
        .await
        .unwrap_err();

        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_unauthenticated_load() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/testApp-test.yml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE_YAML))
            .mount(&server)
            .await;

        let client = Client::new();
        let value = load_unauthenticated(&client, "testApp", "test", &server.uri())
            .await
            .unwrap();

        assert_eq!(
            value["test-app"]["port"],
            Value::String("443".to_string())
        );
    }

    #[tokio::test]
    async fn test_config_endpoint_failure_is_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/testApp-test.yml"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = load_unauthenticated(&client, "testApp", "test", &server.uri())
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_malformed_remote_yaml_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/testApp-test.yml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("key: [unclosed"))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = load_unauthenticated(&client, "testApp", "test", &server.uri())
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
