//! Filter configuration
//!
//! Two layers:
//!
//! - [`PluginOptions`] is the raw string option store a host serves
//!   `cfg_string_or` / `cfg_bool_or` from. It is usually filled from
//!   environment variables.
//! - [`FilterConfig`] is the typed, immutable view the filter builds once at
//!   startup and shares with the transform pipeline.
//!
//! | option | default | effect |
//! |--------|---------|--------|
//! | `rewrite-dimensions` | `""` | `old:new` key renames, comma-separated |
//! | `limit-dimensions` | `""` | allowed keys, comma-separated (empty = all) |
//! | `ignore-container-events` | `true` | stay quiet about unhandled records |
//! | `inputs` | `""` | only accept messages whose last source is listed |

use crate::dimensions::{LimitKeys, RewriteRules};
use qmetric_core::{Host, LogLevel};
use std::collections::HashMap;

/// Option key for dimension key renames
pub const OPT_REWRITE_DIMENSIONS: &str = "rewrite-dimensions";

/// Option key for the dimension allow-list
pub const OPT_LIMIT_DIMENSIONS: &str = "limit-dimensions";

/// Option key that silences the unhandled-record trace line
pub const OPT_IGNORE_CONTAINER_EVENTS: &str = "ignore-container-events";

/// Option key listing accepted upstream plugins
pub const OPT_INPUTS: &str = "inputs";

/// Raw plugin options
///
/// # Example
///
/// ```
/// use qmetric_filter::config::PluginOptions;
///
/// let vars = vec![(
///     "QMETRIC_FILTER_REWRITE_DIMENSIONS".to_string(),
///     "engine_name:cluster".to_string(),
/// )];
/// let opts = PluginOptions::from_vars("QMETRIC_FILTER_", vars);
/// assert_eq!(opts.string_or("rewrite-dimensions", ""), "engine_name:cluster");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginOptions {
    values: HashMap<String, String>,
}

impl PluginOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from environment variables starting with `prefix`
    ///
    /// See [`PluginOptions::from_vars`] for the key mapping.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Load options from `(name, value)` pairs starting with `prefix`
    ///
    /// The prefix is stripped, the rest lowercased and `_` replaced by `-`:
    /// `QMETRIC_FILTER_LIMIT_DIMENSIONS` becomes `limit-dimensions`.
    pub fn from_vars<I>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let values = vars
            .into_iter()
            .filter_map(|(name, value)| {
                let key = name.strip_prefix(prefix)?;
                (!key.is_empty()).then(|| (key.to_ascii_lowercase().replace('_', "-"), value))
            })
            .collect();
        Self { values }
    }

    /// Set an option
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw option value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// String option with fallback
    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Boolean option with fallback
    ///
    /// Accepts `1 t T TRUE true True 0 f F FALSE false False`; anything else
    /// yields `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some("1" | "t" | "T" | "TRUE" | "true" | "True") => true,
            Some("0" | "f" | "F" | "FALSE" | "false" | "False") => false,
            _ => default,
        }
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no options are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Typed filter configuration, built once per plugin instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Dimension key renames (container messages only)
    pub rewrite: RewriteRules,
    /// Dimension allow-list (container messages only)
    pub limit: LimitKeys,
    /// Skip unhandled records without logging
    pub ignore_container_events: bool,
    /// Accepted upstream plugins (empty = any)
    pub inputs: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            rewrite: RewriteRules::default(),
            limit: LimitKeys::default(),
            ignore_container_events: true,
            inputs: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Read the filter options from the host
    ///
    /// Malformed rewrite entries are logged at warn level and skipped.
    pub fn from_host<H: Host + ?Sized>(host: &H) -> Self {
        let (rewrite, malformed) =
            RewriteRules::parse(&host.cfg_string_or(OPT_REWRITE_DIMENSIONS, ""));
        for entry in &malformed {
            host.log(
                LogLevel::Warn,
                &format!("Could not split rewrite rule '{entry}' by ':'"),
            );
        }

        let inputs = host
            .cfg_string_or(OPT_INPUTS, "")
            .split(',')
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            rewrite,
            limit: LimitKeys::parse(&host.cfg_string_or(OPT_LIMIT_DIMENSIONS, "")),
            ignore_container_events: host.cfg_bool_or(OPT_IGNORE_CONTAINER_EVENTS, true),
            inputs,
        }
    }

    /// Replace the rewrite rules
    pub fn with_rewrite(mut self, rewrite: RewriteRules) -> Self {
        self.rewrite = rewrite;
        self
    }

    /// Replace the allow-list
    pub fn with_limit(mut self, limit: LimitKeys) -> Self {
        self.limit = limit;
        self
    }

    /// Set whether unhandled records are skipped silently
    pub fn ignore_container_events(mut self, ignore: bool) -> Self {
        self.ignore_container_events = ignore;
        self
    }

    /// Replace the accepted inputs
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }
}
