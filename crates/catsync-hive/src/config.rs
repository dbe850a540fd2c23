//! Hook configuration.

use catsync_core::{Error, KnownObjectsCache, LogFormat, Result};
use serde::{Deserialize, Serialize};

use crate::naming::ColumnNamingRule;

/// Default cluster name used in qualified names.
pub const DEFAULT_CLUSTER_NAME: &str = "primary";

/// Default user when the event does not report one.
pub const DEFAULT_USER: &str = "hive";

/// Default source tag on emitted notifications.
pub const DEFAULT_SOURCE: &str = "catsync-hive";

/// Default capacity of the known-objects cache.
pub const DEFAULT_KNOWN_OBJECTS_CAPACITY: usize = 10_000;

/// Configuration for the Hive rename hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Cluster name appended to qualified names (`db.table@{cluster}`).
    pub cluster_name: String,

    /// User recorded on notifications when the event has none.
    pub default_user: String,

    /// Source tag recorded on notifications.
    pub source: String,

    /// Maximum number of names the known-objects cache remembers.
    pub known_objects_capacity: usize,

    /// Rule deriving column qualified names from table qualified names.
    pub column_naming: ColumnNamingRule,

    /// Log output format for hosts calling [`catsync_core::init_logging`].
    pub log_format: LogFormat,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            default_user: DEFAULT_USER.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            known_objects_capacity: DEFAULT_KNOWN_OBJECTS_CAPACITY,
            column_naming: ColumnNamingRule::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl HookConfig {
    /// Loads configuration from environment variables.
    ///
    /// Unset or blank variables keep their defaults:
    ///
    /// - `CATSYNC_CLUSTER_NAME`
    /// - `CATSYNC_DEFAULT_USER`
    /// - `CATSYNC_SOURCE`
    /// - `CATSYNC_KNOWN_OBJECTS_CAPACITY`
    /// - `CATSYNC_COLUMN_NAMING` (`append` | `cluster`)
    /// - `CATSYNC_LOG_FORMAT` (`pretty` | `json`)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or the result fails
    /// [`HookConfig::validate`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, with the semantics of
    /// [`HookConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if a value is malformed or the result fails validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |name: &str| trimmed(lookup(name));
        let mut config = Self::default();

        if let Some(cluster) = env("CATSYNC_CLUSTER_NAME") {
            config.cluster_name = cluster;
        }
        if let Some(user) = env("CATSYNC_DEFAULT_USER") {
            config.default_user = user;
        }
        if let Some(source) = env("CATSYNC_SOURCE") {
            config.source = source;
        }
        if let Some(capacity) = env("CATSYNC_KNOWN_OBJECTS_CAPACITY") {
            config.known_objects_capacity = parse_usize("CATSYNC_KNOWN_OBJECTS_CAPACITY", &capacity)?;
        }
        if let Some(rule) = env("CATSYNC_COLUMN_NAMING") {
            config.column_naming = ColumnNamingRule::parse(&rule).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "CATSYNC_COLUMN_NAMING must be one of: append, cluster (got {rule})"
                ))
            })?;
        }
        if let Some(format) = env("CATSYNC_LOG_FORMAT") {
            config.log_format = LogFormat::parse(&format).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "CATSYNC_LOG_FORMAT must be one of: pretty, json (got {format})"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is blank or the cache capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_name.trim().is_empty() {
            return Err(Error::InvalidInput("cluster_name must be non-empty".into()));
        }
        if self.cluster_name.contains('@') {
            return Err(Error::InvalidInput(
                "cluster_name must not contain '@'".into(),
            ));
        }
        if self.default_user.trim().is_empty() {
            return Err(Error::InvalidInput("default_user must be non-empty".into()));
        }
        if self.source.trim().is_empty() {
            return Err(Error::InvalidInput("source must be non-empty".into()));
        }
        if self.known_objects_capacity == 0 {
            return Err(Error::InvalidInput(
                "known_objects_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Builds an empty known-objects cache sized by this configuration.
    #[must_use]
    pub fn known_objects_cache(&self) -> KnownObjectsCache {
        KnownObjectsCache::new(self.known_objects_capacity)
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|e| Error::InvalidInput(format!("{name} must be a usize: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = HookConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HookConfig::default());
        assert_eq!(config.cluster_name, "primary");
        assert_eq!(config.known_objects_capacity, 10_000);
    }

    #[test]
    fn variables_override_defaults() {
        let config = HookConfig::from_lookup(lookup(&[
            ("CATSYNC_CLUSTER_NAME", " prod "),
            ("CATSYNC_DEFAULT_USER", "etl"),
            ("CATSYNC_KNOWN_OBJECTS_CAPACITY", "64"),
            ("CATSYNC_COLUMN_NAMING", "cluster"),
            ("CATSYNC_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.cluster_name, "prod");
        assert_eq!(config.default_user, "etl");
        assert_eq!(config.known_objects_capacity, 64);
        assert_eq!(config.column_naming, ColumnNamingRule::Cluster);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_variables_are_unset() {
        let config = HookConfig::from_lookup(lookup(&[("CATSYNC_CLUSTER_NAME", "   ")])).unwrap();
        assert_eq!(config.cluster_name, DEFAULT_CLUSTER_NAME);
    }

    #[test]
    fn malformed_values_are_rejected() {
        for vars in [
            [("CATSYNC_KNOWN_OBJECTS_CAPACITY", "lots")],
            [("CATSYNC_KNOWN_OBJECTS_CAPACITY", "0")],
            [("CATSYNC_COLUMN_NAMING", "dotted")],
            [("CATSYNC_LOG_FORMAT", "xml")],
            [("CATSYNC_CLUSTER_NAME", "a@b")],
        ] {
            let result = HookConfig::from_lookup(lookup(&vars));
            assert!(
                matches!(result, Err(Error::InvalidInput(_))),
                "{vars:?} accepted"
            );
        }
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: HookConfig =
            serde_json::from_str(r#"{"cluster_name": "dr", "column_naming": "cluster"}"#).unwrap();
        assert_eq!(config.cluster_name, "dr");
        assert_eq!(config.column_naming, ColumnNamingRule::Cluster);
        assert_eq!(config.default_user, DEFAULT_USER);
        config.validate().unwrap();
    }
}
