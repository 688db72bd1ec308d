//! Dimension key rewriting

use qmetric_core::Dimensions;
use std::collections::HashMap;

/// Rename rules for dimension keys, `old -> new`
///
/// Parsed once from a `old:new,old2:new2` option string.
///
/// # Collisions
///
/// Rules are applied to each source key on its own. When two source keys
/// end up under the same key (two rules share a target, or a target equals
/// a key that was not rewritten), whichever entry is visited last wins.
/// Map iteration order is unspecified, so the surviving value is too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteRules {
    rules: HashMap<String, String>,
}

impl RewriteRules {
    /// Parse `old:new` pairs separated by commas
    ///
    /// Returns the rules and every entry that did not split into exactly two
    /// parts on `:`. Empty entries (an empty option, a trailing comma) are
    /// skipped without being reported.
    pub fn parse(raw: &str) -> (Self, Vec<String>) {
        let mut rules = HashMap::new();
        let mut malformed = Vec::new();

        for entry in raw.split(',').filter(|e| !e.is_empty()) {
            let mut parts = entry.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(old), Some(new), None) => {
                    rules.insert(old.to_string(), new.to_string());
                }
                _ => malformed.push(entry.to_string()),
            }
        }

        (Self { rules }, malformed)
    }

    /// Add a single rule
    pub fn rule(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.rules.insert(old.into(), new.into());
        self
    }

    /// Replacement key for `key`, if a rule exists
    pub fn target(&self, key: &str) -> Option<&str> {
        self.rules.get(key).map(String::as_str)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Produce a new map with every key renamed per the rules
    pub fn apply(&self, dims: &Dimensions) -> Dimensions {
        let mut res = Dimensions::with_capacity(dims.len());
        for (key, value) in dims {
            let key = self.target(key).unwrap_or(key.as_str());
            res.insert(key.to_string(), value.clone());
        }
        res
    }
}
