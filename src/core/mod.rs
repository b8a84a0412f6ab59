//! Core configuration management types.

mod refresh;
mod store;

pub use refresh::RefreshHandle;
pub use store::ConfigStore;
