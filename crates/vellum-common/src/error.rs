//! Crate-wide error type.
//!
//! Per the error handling design (spec §7), almost nothing inside style
//! computation itself is fallible from the caller's point of view: lexical,
//! declaration, and selector errors are recovered from internally and never
//! surface here. [`StyleError`] only covers the handful of conditions that
//! genuinely propagate to a caller: a host-provided loader failing, or a
//! hyphenation dictionary that cannot be parsed even as a fallback.

use thiserror::Error;

/// Errors that can propagate out of the style and language subsystems.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The host's stylesheet loader (§6.2) failed to resolve or fetch an
    /// `@import` target.
    #[error("failed to load stylesheet '{url}': {reason}")]
    StylesheetLoad {
        /// The `@import` URL that could not be loaded.
        url: String,
        /// The host-reported failure reason.
        reason: String,
    },

    /// The host's hyphenation dictionary loader (§6.3) failed, and no
    /// further fallback (the fixed default dictionary) was available either.
    #[error("failed to load hyphenation dictionary '{id}': {reason}")]
    DictionaryLoad {
        /// The dictionary identifier that could not be loaded.
        id: String,
        /// The host-reported failure reason.
        reason: String,
    },

    /// A hyphenation dictionary's on-disk representation is structurally
    /// invalid (bad magic, truncated directory, unreadable pattern entry)
    /// rather than merely containing patterns that are too long.
    #[error("malformed hyphenation dictionary '{id}': {reason}")]
    MalformedDictionary {
        /// The dictionary identifier.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}
