//! Runtime configuration, read from the environment once at startup
//!
//! | variable | default |
//! |----------|---------|
//! | `QMETRIC_PLUGIN_NAME` | `metric` |
//! | `QMETRIC_LOG_LEVEL` | `info` |
//! | `QMETRIC_LOG_FORMAT` | `pretty` |
//! | `QMETRIC_CHANNEL_CAPACITY` | `1024` |
//! | `QMETRIC_SINK_FORMAT` | `json` |
//! | `QMETRIC_FILTER_<OPTION>` | |

use qmetric_core::LogLevel;
use qmetric_filter::PluginOptions;
use qmetric_filter::host::DEFAULT_CHANNEL_CAPACITY;
use qmetric_filter::runner::PLUGIN_PKG;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of filter option variables
pub const FILTER_OPTION_PREFIX: &str = "QMETRIC_FILTER_";

const ENV_PLUGIN_NAME: &str = "QMETRIC_PLUGIN_NAME";
const ENV_LOG_LEVEL: &str = "QMETRIC_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "QMETRIC_LOG_FORMAT";
const ENV_CHANNEL_CAPACITY: &str = "QMETRIC_CHANNEL_CAPACITY";
const ENV_SINK_FORMAT: &str = "QMETRIC_SINK_FORMAT";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Metric output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SinkFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Boxed, human-readable blocks
    Pretty,
}

impl FromStr for SinkFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("expected 'json' or 'pretty', got '{other}'")),
        }
    }
}

/// Process-level settings
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Plugin instance name, stamped on every metric
    pub plugin_name: String,
    /// Tracing directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Bound for the inbound and outbound channels
    pub channel_capacity: usize,
    /// Metric output format
    pub sink_format: SinkFormat,
    /// Filter options from `QMETRIC_FILTER_*`
    pub options: PluginOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            plugin_name: PLUGIN_PKG.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            sink_format: SinkFormat::default(),
            options: PluginOptions::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load from `(name, value)` pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let mut config = Self::default();

        if let Some(name) = vars.get(ENV_PLUGIN_NAME).filter(|n| !n.is_empty()) {
            config.plugin_name = name.clone();
        }
        if let Some(level) = vars.get(ENV_LOG_LEVEL).filter(|l| !l.is_empty()) {
            config.log_level = level.clone();
        }
        if let Some(raw) = vars.get(ENV_LOG_FORMAT) {
            config.log_format = parse_var(ENV_LOG_FORMAT, raw)?;
        }
        if let Some(raw) = vars.get(ENV_CHANNEL_CAPACITY) {
            let capacity: usize = raw.parse().map_err(|e: std::num::ParseIntError| {
                invalid(ENV_CHANNEL_CAPACITY, raw, e.to_string())
            })?;
            if capacity == 0 {
                return Err(invalid(ENV_CHANNEL_CAPACITY, raw, "must be at least 1".into()));
            }
            config.channel_capacity = capacity;
        }
        if let Some(raw) = vars.get(ENV_SINK_FORMAT) {
            config.sink_format = parse_var(ENV_SINK_FORMAT, raw)?;
        }

        config.options = PluginOptions::from_vars(FILTER_OPTION_PREFIX, vars);
        Ok(config)
    }

    /// `log_level` as a tracing filter directive
    ///
    /// Plugin level names (`notice`, `warning`, ...) map to the matching
    /// tracing level. Anything else, such as `qmetric_filter=debug`, is
    /// passed through as-is.
    pub fn filter_directive(&self) -> String {
        match self.log_level.parse::<LogLevel>() {
            Ok(LogLevel::Notice) => "info".to_string(),
            Ok(level) => level.as_str().to_string(),
            Err(_) => self.log_level.clone(),
        }
    }
}

fn parse_var<T: FromStr<Err = String>>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|reason| invalid(var, raw, reason))
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config.plugin_name, "metric");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.channel_capacity, 1024);
        assert_eq!(config.sink_format, SinkFormat::Json);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::from_vars(vars(&[
            ("QMETRIC_PLUGIN_NAME", "metric-2"),
            ("QMETRIC_LOG_LEVEL", "debug"),
            ("QMETRIC_LOG_FORMAT", "JSON"),
            ("QMETRIC_CHANNEL_CAPACITY", "16"),
            ("QMETRIC_SINK_FORMAT", "pretty"),
            ("QMETRIC_FILTER_LIMIT_DIMENSIONS", "cluster"),
        ]))
        .unwrap();

        assert_eq!(config.plugin_name, "metric-2");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.channel_capacity, 16);
        assert_eq!(config.sink_format, SinkFormat::Pretty);
        assert_eq!(config.options.get("limit-dimensions"), Some("cluster"));
    }

    #[test]
    fn test_runtime_vars_are_not_filter_options() {
        let config =
            RuntimeConfig::from_vars(vars(&[("QMETRIC_PLUGIN_NAME", "x")])).unwrap();
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_bad_capacity() {
        let err = RuntimeConfig::from_vars(vars(&[("QMETRIC_CHANNEL_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("QMETRIC_CHANNEL_CAPACITY"));

        let err =
            RuntimeConfig::from_vars(vars(&[("QMETRIC_CHANNEL_CAPACITY", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_filter_directive() {
        let directive = |level: &str| {
            RuntimeConfig::from_vars(vars(&[("QMETRIC_LOG_LEVEL", level)]))
                .unwrap()
                .filter_directive()
        };

        assert_eq!(directive("notice"), "info");
        assert_eq!(directive("WARNING"), "warn");
        assert_eq!(directive("trace"), "trace");
        assert_eq!(directive("qmetric_filter=debug,info"), "qmetric_filter=debug,info");
        assert_eq!(RuntimeConfig::default().filter_directive(), "info");
    }

    #[test]
    fn test_bad_format() {
        let err = RuntimeConfig::from_vars(vars(&[("QMETRIC_SINK_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { var: "QMETRIC_SINK_FORMAT", .. }
        ));
    }
}
