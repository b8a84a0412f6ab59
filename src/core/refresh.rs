//! Refresh driver: one initial load plus optional interval-based re-loads.
//!
//! The initial load runs to completion before [`run`] returns; its failure
//! propagates to the caller. When an interval is configured, a background task
//! repeats the load sequentially on each tick. A failed tick logs a warning
//! and skips the sink, leaving the previously delivered value authoritative.

use crate::error::Result;
use crate::sources::{ConfigSource, LoadParams, local, remote};
use reqwest::Client;
use serde_yaml::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Handle over the background refresh task.
///
/// Dropping the handle leaves the refresh running for the life of the
/// process; call [`RefreshHandle::stop`] to cancel it.
pub struct RefreshHandle {
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    fn inert() -> Self {
        Self { task: None }
    }

    fn active(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Whether a refresh task is currently running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop auto-refresh. A no-op when no interval was configured.
    pub fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Perform the initial load, deliver it to `sink`, and start auto-refresh
/// when `params.interval` is a positive number of seconds.
///
/// The sink is invoked exactly once per successful load, after the load has
/// fully completed. Refresh ticks run strictly sequentially within the
/// background task.
pub async fn run<F>(source: ConfigSource, params: &LoadParams, sink: F) -> Result<RefreshHandle>
where
    F: Fn(Value) + Send + Sync + 'static,
{
    let client = Client::new();

    let value = load_once(&client, &source).await?;
    log_loaded(&source, params, &value);

    let sink = Arc::new(sink);
    sink(value);

    let period = match params.interval {
        Some(seconds) if seconds > 0 => Duration::from_secs(seconds),
        _ => return Ok(RefreshHandle::inert()),
    };

    let params = params.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately; the initial load already ran.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match load_once(&client, &source).await {
                Ok(value) => {
                    log_loaded(&source, &params, &value);
                    sink(value);
                }
                Err(err) => {
                    warn!(
                        server = %params.config_server_name,
                        app = %params.app_name,
                        profile = %params.profile,
                        error = %err,
                        "configuration refresh failed; keeping previous value"
                    );
                }
            }
        }
    });

    Ok(RefreshHandle::active(task))
}

/// Dispatch one load to the loader matching the source descriptor.
pub(crate) async fn load_once(client: &Client, source: &ConfigSource) -> Result<Value> {
    match source {
        ConfigSource::Local { path } => local::load(path),
        ConfigSource::Remote {
            app_name,
            profile,
            uri,
            access_token_uri,
            client_id,
            client_secret,
        } => {
            remote::load_authenticated(
                client,
                app_name,
                profile,
                uri,
                access_token_uri,
                client_id,
                client_secret,
            )
            .await
        }
        ConfigSource::RemoteNoAuth {
            app_name,
            profile,
            uri,
        } => remote::load_unauthenticated(client, app_name, profile, uri).await,
    }
}

fn log_loaded(source: &ConfigSource, params: &LoadParams, value: &Value) {
    info!(
        source = source.kind(),
        server = %params.config_server_name,
        app = %params.app_name,
        profile = %params.profile,
        "configuration loaded"
    );

    if params.log_properties {
        if let Ok(rendered) = serde_yaml::to_string(value) {
            info!(
                server = %params.config_server_name,
                properties = %rendered,
                "loaded configuration properties"
            );
        }
    }
}
