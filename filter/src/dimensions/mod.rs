//! Dimension stages
//!
//! Each stage takes a dimension map and returns a fresh one:
//!
//! ```text
//! descriptors ──► assemble ──► RewriteRules ──► (+ source, inline tags) ──► LimitKeys
//! ```

mod assemble;
mod limit;
mod rewrite;

pub use assemble::{assemble, container_dimensions, service_slot, task_slot, with_engine_dimensions};
pub use limit::LimitKeys;
pub use rewrite::RewriteRules;

/// Split an inline `key=value` list on `delimiter`
///
/// Items that do not split into exactly two parts on `=` are skipped.
pub fn inline_pairs(raw: &str, delimiter: char) -> impl Iterator<Item = (&str, &str)> {
    raw.split(delimiter).filter_map(|item| {
        let mut parts = item.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => Some((key, value)),
            _ => None,
        }
    })
}
