//! Deduplicated warnings with colored terminal output.
//!
//! Used by the CSS and language subsystems to report unsupported features
//! and recoverable error conditions without spamming the same message for
//! every node or pattern that triggers it.

use std::collections::HashSet;
use std::sync::Mutex;

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable condition, printing the message only the first
/// time this exact `(component, message)` pair is seen.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[vellum {component}] warning: {message}{RESET}");
    }
}

/// Clear all recorded warnings. Call when starting a new document so that
/// warnings relevant to it are not suppressed by an earlier document.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
