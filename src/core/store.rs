//! The configuration store providing lock-free access to the current value.

use crate::core::refresh::{self, RefreshHandle};
use crate::error::Result;
use crate::sources::{self, LoadParams};
use arc_swap::ArcSwapOption;
use serde_yaml::Value;
use std::sync::Arc;

/// Holds the most recently loaded configuration.
///
/// The store is an explicit object the hosting application owns and passes
/// where needed; there is no process-wide singleton. Reads are lock-free via
/// `arc-swap`: writers replace the whole value, so readers always observe
/// either the previous or the new configuration, never a partial one. A
/// failed refresh leaves the stored value untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use cloud_config_client::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let store = ConfigStore::new();
/// let handle = store
///     .load(LoadParams::new("my-app", "prod", "config", ConfigLocation::Local).with_interval(60))
///     .await?;
///
/// if let Some(config) = store.current() {
///     println!("host: {:?}", config["my-app"]["host"]);
/// }
///
/// // On shutdown:
/// handle.stop();
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore {
    current: Arc<ArcSwapOption<Value>>,
}

impl ConfigStore {
    /// Create an empty store. [`ConfigStore::current`] returns `None` until
    /// the first successful load.
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwapOption::from(None)),
        }
    }

    /// Resolve the source for `params`, perform the initial load, and start
    /// auto-refresh when an interval is configured.
    ///
    /// Each successful load atomically replaces the stored value. The call
    /// returns once the initial load has been delivered; an initial failure
    /// propagates to the caller, while refresh failures are logged and
    /// retain the previous value.
    pub async fn load(&self, params: LoadParams) -> Result<RefreshHandle> {
        let source = sources::resolve(&params)?;
        let slot = Arc::clone(&self.current);

        refresh::run(source, &params, move |value| {
            slot.store(Some(Arc::new(value)));
        })
        .await
    }

    /// Get the most recently loaded configuration, or `None` before the
    /// first successful load. Lock-free; safe to call from any thread.
    pub fn current(&self) -> Option<Arc<Value>> {
        self.current.load_full()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}
