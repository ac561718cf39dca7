//! The document-tree interface consumed by the Vellum style engine.
//!
//! `vellum-css` is written generically over [`StyleTree`] rather than any
//! concrete DOM, so a host can plug in its own node representation. This
//! crate also ships [`refimpl::RefTree`], a small arena-based tree used to
//! exercise the style engine in tests without a real host document.

/// Interned element/attribute name identifiers, shared by every node.
pub mod names;
/// A minimal reference `StyleTree` implementation for tests.
pub mod refimpl;
/// The `StyleTree` trait itself, plus its small supporting types.
pub mod tree;

pub use names::{NameId, NameTable};
pub use refimpl::{NodeId as RefNodeId, RefTree};
pub use tree::{DocumentFormat, PseudoClassCache, StyleTree};
