//! Layout warnings for configuration that is accepted but only partially honored.
//!
//! Provides deduplication so that a value used on every relayout (for example
//! a baseline cross-axis alignment) is reported once, not once per frame.
//! Messages are forwarded to `tracing` at `WARN` level.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emits once per unique message).
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// message had already been reported.
///
/// # Example
/// ```
/// use floatcol_common::warning::warn_once;
///
/// let message = "baseline alignment treated as start";
/// assert!(warn_once("column", message));
/// assert!(!warn_once("column", message));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        let message = "dedup-check: unique message for this test";
        let first = warn_once("test", message);
        let second = warn_once("test", message);
        assert!(first, "first report of a message should be emitted");
        assert!(!second, "repeated report should be suppressed");
    }

    #[test]
    fn test_component_is_part_of_the_key() {
        let message = "component-check: same text, different component";
        assert!(warn_once("a", message));
        assert!(warn_once("b", message));
    }
}
