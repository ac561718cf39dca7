//! Shared configuration, errors, and logging for the Vellum style engine.
//!
//! This crate has no CSS- or language-specific logic; it exists so that
//! [`vellum-css`](../vellum_css/index.html) and
//! [`vellum-lang`](../vellum_lang/index.html) can share one error type,
//! one configuration value, and one warning sink instead of duplicating
//! them.

/// Engine-wide configuration threaded through style computation (§6.5).
pub mod config;
/// The crate-wide error type for host-facing fallible operations (§7).
pub mod error;
/// Deduplicated, colorized warning logging.
pub mod warning;

pub use config::EngineConfig;
pub use error::StyleError;
