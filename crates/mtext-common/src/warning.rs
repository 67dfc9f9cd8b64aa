//! Deduplicated layout warnings.
//!
//! A drawing with thousands of MText entities that all reference the same
//! missing font would otherwise emit the same warning thousands of times.
//! Warnings are forwarded to the `log` facade once per unique message.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already logged (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Log a warning once per unique `(component, message)` pair.
///
/// # Example
/// ```
/// mtext_common::warning::warn_once("Font", "font 'romans' not found, using 'simplex'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_log {
        log::warn!(target: "mtext", "[{component}] {message}");
    }
}

/// Check whether a warning has already been logged.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}
