//! Dimension allow-list

use qmetric_core::Dimensions;

/// Dimension keys allowed through to the emitted metric
///
/// An empty list disables filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitKeys {
    keys: Vec<String>,
}

impl LimitKeys {
    /// Parse a comma-separated key list; empty entries are ignored
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(',').filter(|k| !k.is_empty()))
    }

    /// Build from an explicit key list
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Allowed keys in configuration order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Check if filtering is disabled
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check whether `key` may pass
    ///
    /// Always `true` when the list is empty.
    pub fn allows(&self, key: &str) -> bool {
        self.keys.is_empty() || self.keys.iter().any(|k| k == key)
    }

    /// Keep only the allowed entries of `dims`
    pub fn apply(&self, dims: Dimensions) -> Dimensions {
        if self.keys.is_empty() {
            return dims;
        }
        dims.into_iter().filter(|(k, _)| self.allows(k)).collect()
    }
}
