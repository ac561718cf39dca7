//! The node/document interface the style engine consumes (spec §6.1).
//!
//! The style engine never assumes a concrete DOM implementation. It is
//! written against [`StyleTree`], a trait any host document tree can
//! implement. [`crate::refimpl::RefTree`] is a minimal arena-based
//! implementation used by this crate's own tests and by `vellum-css`'s and
//! `vellum-lang`'s test suites.

use std::cell::Cell;

use crate::names::NameId;

/// The ingestion format the document was parsed from. A handful of CSS
/// behaviours key off this (spec §4.4: `html {}` targets the fragment root
/// instead of a synthetic outer `<html>` for EPUB/CHM-like formats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// EPUB or CHM-like multi-file formats with per-fragment synthetic roots.
    FragmentedContainer,
    /// Any other format (single-file HTML, FB2, plain text, ...).
    Flat,
}

/// The synthetic element name a selector's `html` type selector is rewritten
/// to target when [`DocumentFormat::FragmentedContainer`] is in effect (spec
/// §4.4): each spine item gets its own fragment root rather than sharing one
/// synthetic outer `<html>`, so an authored `html { ... }` rule should style
/// every fragment root, not an element that doesn't exist in that item's tree.
pub const FRAGMENT_ROOT_TAG: &str = "-cr-fragment-root";

/// Per-node cache for expensive structural pseudo-class results (spec §4.7).
///
/// The source reuses otherwise-idle layout-rect fields on the node for this;
/// here it is simply its own side-table-shaped value, which the Design Notes
/// call out as an equally valid port of the same idea. `0` means
/// "not yet computed" for every field. Boolean fields store `1` for false
/// and `2` for true; ordinal fields store the 1-based ordinal directly
/// (an ordinal of `0` never occurs, so it doubles as "uncomputed").
#[derive(Debug, Clone, Copy, Default)]
pub struct PseudoClassCache {
    /// `:first-child`
    pub first_child: u16,
    /// `:last-child`
    pub last_child: u16,
    /// `:first-of-type`
    pub first_of_type: u16,
    /// `:last-of-type`
    pub last_of_type: u16,
    /// `:only-child`
    pub only_child: u16,
    /// `:only-of-type`
    pub only_of_type: u16,
    /// `:empty`
    pub empty: u16,
    /// 1-based ordinal among element siblings, for `:nth-child`.
    pub nth_child_ordinal: u16,
    /// 1-based ordinal among same-type element siblings, for `:nth-of-type`.
    pub nth_of_type_ordinal: u16,
}

impl PseudoClassCache {
    /// Pack a boolean result into the cache encoding (`1` = false, `2` = true).
    #[must_use]
    pub const fn encode_bool(value: bool) -> u16 {
        if value { 2 } else { 1 }
    }

    /// Decode a cache slot previously written by [`Self::encode_bool`].
    /// Returns `None` if the slot has not been computed yet.
    #[must_use]
    pub const fn decode_bool(slot: u16) -> Option<bool> {
        match slot {
            1 => Some(false),
            2 => Some(true),
            _ => None,
        }
    }
}

/// The node/document abstraction consumed by selector matching and cascade
/// application (spec §6.1). `Node` is an opaque, `Copy`-able handle — an
/// arena index, a pointer, whatever the host tree uses internally.
pub trait StyleTree {
    /// An opaque handle to a node within this tree.
    type Node: Copy + Eq + std::hash::Hash;

    /// The tree's root node (the document, or the outermost fragment root).
    fn root(&self) -> Self::Node;

    /// The interned element name id of `node`, or [`NameId::NONE`] if `node`
    /// is not an element (e.g. a text node).
    fn element_name_id(&self, node: Self::Node) -> NameId;
    /// Whether `node` is a text node.
    fn is_text(&self, node: Self::Node) -> bool;
    /// Whether `node` is the document/fragment root (`:root`).
    fn is_root(&self, node: Self::Node) -> bool;
    /// Whether `node` is an engine-synthesized boxing wrapper (anonymous
    /// table/float/inline-block/ruby/math box) rather than an authored
    /// element (spec §4.7 "Boxing transparency").
    fn is_boxing_wrapper(&self, node: Self::Node) -> bool;

    /// The value of attribute `name` on `node`, if present.
    fn attribute(&self, node: Self::Node, name: NameId) -> Option<&str>;
    /// Whether `node` carries attribute `name` at all.
    fn has_attribute(&self, node: Self::Node, name: NameId) -> bool {
        self.attribute(node, name).is_some()
    }

    /// The nearest ancestor of `node`, skipping boxing wrappers, unless
    /// `except` names a boxing wrapper's element name — in which case
    /// traversal stops there instead of skipping past it (a selector that
    /// explicitly targets a boxing wrapper by name must be able to match it).
    fn unboxed_parent(&self, node: Self::Node, except: Option<NameId>) -> Option<Self::Node>;
    /// The nearest preceding sibling of `node`, skipping boxing wrappers and
    /// (if `skip_text`) text nodes, with the same `except` behaviour as
    /// [`Self::unboxed_parent`].
    fn unboxed_prev_sibling(
        &self,
        node: Self::Node,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<Self::Node>;
    /// The nearest following sibling of `node`, mirroring
    /// [`Self::unboxed_prev_sibling`].
    fn unboxed_next_sibling(
        &self,
        node: Self::Node,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<Self::Node>;
    /// The first child of `node`, mirroring [`Self::unboxed_prev_sibling`].
    fn unboxed_first_child(
        &self,
        node: Self::Node,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<Self::Node>;

    /// The structural pseudo-class cache side-channel for `node` (spec §4.7).
    fn pseudo_class_cache(&self, node: Self::Node) -> &Cell<PseudoClassCache>;

    /// Intern an element or attribute name, assigning it an id if new.
    fn intern_name(&mut self, name: &str) -> NameId;
    /// Look up an already-interned name's id without creating one.
    fn lookup_name(&self, name: &str) -> Option<NameId>;
    /// Resolve an id back to its textual name.
    fn name_text(&self, id: NameId) -> Option<&str>;

    /// The ingestion format, used by the `html` element-name alias (§4.4).
    fn format(&self) -> DocumentFormat;
    /// Configured viewport width in CSS pixels, for `@media (width: …)`.
    fn viewport_width(&self) -> u32;
    /// Configured viewport height in CSS pixels.
    fn viewport_height(&self) -> u32;
    /// Physical screen width in device pixels, for `@media (device-width: …)`.
    fn screen_width(&self) -> u32;
    /// Physical screen height in device pixels.
    fn screen_height(&self) -> u32;
    /// Configured rendering DPI, for `@media (resolution: …)`.
    fn render_dpi(&self) -> u32;
    /// Root element font size in CSS pixels, used to resolve `rem`.
    fn root_font_size_px(&self) -> u32;
    /// Host-defined bitset consulted by `-cr-only-if` guards.
    fn block_rendering_flags(&self) -> u32;
    /// A monotonically increasing version, bumped whenever the document's
    /// DOM shape changes; used by `-cr-ignore-if-dom-version-greater-or-equal`.
    fn dom_version(&self) -> u32;
}
