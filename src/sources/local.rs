//! Local YAML loader.
//!
//! Reads a configuration file from disk and parses it as YAML. Scalars tagged
//! `!env` name an environment variable whose current value is substituted in
//! place of the scalar; an unset variable substitutes null. The substitution
//! applies only to locally loaded files — remote documents are taken as
//! served.

use crate::error::{ConfigError, Result};
use serde_yaml::Value;
use serde_yaml::value::TaggedValue;
use std::path::Path;

/// Tag marking a scalar as an environment-variable reference.
pub const ENV_TAG: &str = "env";

/// Read and parse a YAML file, applying `!env` substitution.
///
/// Relative paths resolve against the current working directory. A missing or
/// unreadable file is an [`ConfigError::Io`]; malformed YAML is a
/// [`ConfigError::Parse`].
pub fn load(path: impl AsRef<Path>) -> Result<Value> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse(&text)
}

/// Parse YAML text, applying `!env` substitution.
pub fn parse(text: &str) -> Result<Value> {
    let value: Value =
        serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(format!("Invalid YAML: {e}")))?;
    Ok(substitute_env(value))
}

fn substitute_env(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) if tagged.tag == ENV_TAG => match tagged.value {
            Value::String(name) => match std::env::var(&name) {
                Ok(val) => Value::String(val),
                Err(_) => Value::Null,
            },
            other => substitute_env(other),
        },
        Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag: tagged.tag,
            value: substitute_env(tagged.value),
        })),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, val)| (key, substitute_env(val)))
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(substitute_env).collect()),
        other => other,
    }
}
