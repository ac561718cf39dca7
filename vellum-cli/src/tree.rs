//! A small, fixed demo document used by the `style` subcommand so the CLI
//! can exercise stylesheet cascading without a host HTML parser on hand.
//!
//! Mirrors what a real host would build from a parsed document: a chain of
//! elements with a couple of attributes set, fed through the same
//! [`vellum_dom::StyleTree`] surface the engine itself consumes.

use vellum_dom::{DocumentFormat, RefNodeId, RefTree};

/// `<body class="page" lang="en"><section><p class="lead">…</p></section></body>`,
/// kept alongside the element chain in document order for the `style`
/// subcommand to cascade down.
pub struct DemoTree {
    /// The backing reference tree.
    pub tree: RefTree,
    /// Each element's display tag and node handle, outermost first.
    pub chain: Vec<(&'static str, RefNodeId)>,
}

impl DemoTree {
    /// Build the demo document at the given viewport size.
    #[must_use]
    pub fn build(viewport_width: u32, viewport_height: u32) -> Self {
        let mut tree = RefTree::new("body", DocumentFormat::Flat);
        tree.set_viewport(viewport_width, viewport_height);
        let body = tree.root();
        tree.set_attr(body, "class", "page");
        tree.set_attr(body, "lang", "en");

        let section = tree.add_element(body, "section");
        let para = tree.add_element(section, "p");
        tree.set_attr(para, "class", "lead");
        let _text = tree.add_text(para, "Example paragraph text.");

        Self { tree, chain: vec![("body", body), ("section", section), ("p", para)] }
    }

    /// The innermost element in the chain (the `<p>`).
    #[must_use]
    pub fn deepest(&self) -> (&'static str, RefNodeId) {
        self.chain[self.chain.len() - 1]
    }
}
