//! A minimal arena-based tree implementing [`StyleTree`], used by this
//! crate's own tests and shared (as a dev-dependency) by `vellum-css` and
//! `vellum-lang`'s test suites. Not part of the engine's render-critical
//! path — a real host brings its own document tree.

use std::cell::Cell;
use std::collections::HashMap;

use crate::names::{NameId, NameTable};
use crate::tree::{DocumentFormat, PseudoClassCache, StyleTree};

/// An index into [`RefTree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        name_id: NameId,
        attrs: HashMap<NameId, String>,
        is_boxing_wrapper: bool,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct RefNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pseudo_cache: Cell<PseudoClassCache>,
}

/// A small, in-memory reference document tree for exercising the style
/// engine without a real host DOM.
#[derive(Debug, Clone)]
pub struct RefTree {
    nodes: Vec<RefNode>,
    names: NameTable,
    root: NodeId,
    format: DocumentFormat,
    viewport_width: u32,
    viewport_height: u32,
    screen_width: u32,
    screen_height: u32,
    render_dpi: u32,
    root_font_size_px: u32,
    block_rendering_flags: u32,
    dom_version: u32,
}

impl RefTree {
    /// Create a tree whose root element has tag name `root_tag`.
    #[must_use]
    pub fn new(root_tag: &str, format: DocumentFormat) -> Self {
        let mut names = NameTable::new();
        let name_id = names.intern(root_tag);
        let root_node = RefNode {
            kind: NodeKind::Element {
                name_id,
                attrs: HashMap::new(),
                is_boxing_wrapper: false,
            },
            parent: None,
            children: Vec::new(),
            pseudo_cache: Cell::new(PseudoClassCache::default()),
        };
        Self {
            nodes: vec![root_node],
            names,
            root: NodeId(0),
            format,
            viewport_width: 800,
            viewport_height: 600,
            screen_width: 800,
            screen_height: 600,
            render_dpi: 96,
            root_font_size_px: 16,
            block_rendering_flags: 0,
            dom_version: 0,
        }
    }

    /// Append a new element child named `tag` under `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.add_element_inner(parent, tag, false)
    }

    /// Append a new synthetic boxing-wrapper child under `parent`.
    pub fn add_boxing_wrapper(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.add_element_inner(parent, tag, true)
    }

    fn add_element_inner(&mut self, parent: NodeId, tag: &str, is_boxing_wrapper: bool) -> NodeId {
        let name_id = self.names.intern(tag);
        let id = NodeId(self.nodes.len());
        self.nodes.push(RefNode {
            kind: NodeKind::Element {
                name_id,
                attrs: HashMap::new(),
                is_boxing_wrapper,
            },
            parent: Some(parent),
            children: Vec::new(),
            pseudo_cache: Cell::new(PseudoClassCache::default()),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a text node under `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(RefNode {
            kind: NodeKind::Text(text.to_string()),
            parent: Some(parent),
            children: Vec::new(),
            pseudo_cache: Cell::new(PseudoClassCache::default()),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Set an attribute (interning its name) on an element node.
    pub fn set_attr(&mut self, node: NodeId, attr: &str, value: &str) {
        let attr_id = self.names.intern(attr);
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            let _ = attrs.insert(attr_id, value.to_string());
        }
    }

    /// Override the configured viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Override the configured render DPI.
    pub fn set_render_dpi(&mut self, dpi: u32) {
        self.render_dpi = dpi;
    }

    /// Borrow this tree's name table mutably, for test code that compiles a
    /// stylesheet against the same interning table the tree itself uses
    /// (selectors and the tree must agree on element-name ids to match).
    pub fn names_mut_for_test(&mut self) -> &mut NameTable {
        &mut self.names
    }

    fn children_of(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn element_matches_except(&self, node: NodeId, except: Option<NameId>) -> bool {
        let Some(except_id) = except else {
            return false;
        };
        self.element_name_id(node) == except_id
    }

    fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(node).iter().copied()
    }
}

impl StyleTree for RefTree {
    type Node = NodeId;

    fn root(&self) -> Self::Node {
        self.root
    }

    fn element_name_id(&self, node: Self::Node) -> NameId {
        match &self.nodes[node.0].kind {
            NodeKind::Element { name_id, .. } => *name_id,
            NodeKind::Text(_) => NameId::NONE,
        }
    }

    fn is_text(&self, node: Self::Node) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Text(_))
    }

    fn is_root(&self, node: Self::Node) -> bool {
        node == self.root
    }

    fn is_boxing_wrapper(&self, node: Self::Node) -> bool {
        matches!(
            self.nodes[node.0].kind,
            NodeKind::Element { is_boxing_wrapper: true, .. }
        )
    }

    fn attribute(&self, node: Self::Node, name: NameId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs.get(&name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    fn unboxed_parent(&self, node: Self::Node, except: Option<NameId>) -> Option<Self::Node> {
        let mut current = self.nodes[node.0].parent?;
        loop {
            if self.is_boxing_wrapper(current) && !self.element_matches_except(current, except) {
                current = self.nodes[current.0].parent?;
                continue;
            }
            return Some(current);
        }
    }

    fn unboxed_prev_sibling(
        &self,
        node: Self::Node,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<Self::Node> {
        let parent = self.nodes[node.0].parent?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&n| n == node)?;
        for &candidate in siblings[..pos].iter().rev() {
            if skip_text && self.is_text(candidate) {
                continue;
            }
            if self.is_boxing_wrapper(candidate) && !self.element_matches_except(candidate, except)
            {
                if let Some(inner) =
                    self.last_unboxed_descendant(candidate, skip_text, except)
                {
                    return Some(inner);
                }
                continue;
            }
            return Some(candidate);
        }
        None
    }

    fn unboxed_next_sibling(
        &self,
        node: Self::Node,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<Self::Node> {
        let parent = self.nodes[node.0].parent?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&n| n == node)?;
        for &candidate in &siblings[pos + 1..] {
            if skip_text && self.is_text(candidate) {
                continue;
            }
            if self.is_boxing_wrapper(candidate) && !self.element_matches_except(candidate, except)
            {
                if let Some(inner) =
                    self.first_unboxed_descendant(candidate, skip_text, except)
                {
                    return Some(inner);
                }
                continue;
            }
            return Some(candidate);
        }
        None
    }

    fn unboxed_first_child(
        &self,
        node: Self::Node,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<Self::Node> {
        self.first_unboxed_descendant(node, skip_text, except)
    }

    fn pseudo_class_cache(&self, node: Self::Node) -> &Cell<PseudoClassCache> {
        &self.nodes[node.0].pseudo_cache
    }

    fn intern_name(&mut self, name: &str) -> NameId {
        self.names.intern(name)
    }

    fn lookup_name(&self, name: &str) -> Option<NameId> {
        self.names.lookup(name)
    }

    fn name_text(&self, id: NameId) -> Option<&str> {
        self.names.name(id)
    }

    fn format(&self) -> DocumentFormat {
        self.format
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    fn screen_width(&self) -> u32 {
        self.screen_width
    }

    fn screen_height(&self) -> u32 {
        self.screen_height
    }

    fn render_dpi(&self) -> u32 {
        self.render_dpi
    }

    fn root_font_size_px(&self) -> u32 {
        self.root_font_size_px
    }

    fn block_rendering_flags(&self) -> u32 {
        self.block_rendering_flags
    }

    fn dom_version(&self) -> u32 {
        self.dom_version
    }
}

impl RefTree {
    fn first_unboxed_descendant(
        &self,
        node: NodeId,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<NodeId> {
        for candidate in self.element_children(node) {
            if skip_text && self.is_text(candidate) {
                continue;
            }
            if self.is_boxing_wrapper(candidate) && !self.element_matches_except(candidate, except)
            {
                if let Some(inner) = self.first_unboxed_descendant(candidate, skip_text, except) {
                    return Some(inner);
                }
                continue;
            }
            return Some(candidate);
        }
        None
    }

    fn last_unboxed_descendant(
        &self,
        node: NodeId,
        skip_text: bool,
        except: Option<NameId>,
    ) -> Option<NodeId> {
        for candidate in self.element_children(node).collect::<Vec<_>>().into_iter().rev() {
            if skip_text && self.is_text(candidate) {
                continue;
            }
            if self.is_boxing_wrapper(candidate) && !self.element_matches_except(candidate, except)
            {
                if let Some(inner) = self.last_unboxed_descendant(candidate, skip_text, except) {
                    return Some(inner);
                }
                continue;
            }
            return Some(candidate);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxing_wrapper_is_transparent_to_parent_traversal() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let body = tree.add_element(tree.root(), "body");
        let wrapper = tree.add_boxing_wrapper(body, "tabularBox");
        let cell = tree.add_element(wrapper, "p");

        assert_eq!(tree.unboxed_parent(cell, None), Some(body));
    }

    #[test]
    fn except_id_stops_unboxing_at_named_wrapper() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let body = tree.add_element(tree.root(), "body");
        let wrapper = tree.add_boxing_wrapper(body, "tabularbox");
        let cell = tree.add_element(wrapper, "p");
        let wrapper_name = tree.lookup_name("tabularbox").unwrap();

        assert_eq!(tree.unboxed_parent(cell, Some(wrapper_name)), Some(wrapper));
    }
}
