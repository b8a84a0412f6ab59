//! Configuration source resolution and loaders.

pub mod bindings;
pub mod local;
pub mod remote;
mod resolver;

pub use resolver::{
    CONFIG_SERVER_KEYS, ConfigLocation, ConfigSource, LoadParams, SKIP_AUTH_URI_VAR,
    VCAP_SERVICES_VAR, resolve,
};
