//! Engine-specific `-cr-*` declarations (spec §4.3 "Engine-specific
//! properties"), ported from crengine's `CSS_CR_HINT_*` bitmask and the
//! `-cr-only-if`/`-cr-ignore-if-dom-version-greater-or-equal` guards.

use bitflags::bitflags;

use crate::tokenizer::{CSSToken, TokenCursor};
use vellum_dom::DocumentFormat;

bitflags! {
    /// `-cr-hint` flags. Bit layout ported exactly from `cssdef.h`'s
    /// `CSS_CR_HINT_*` macros so the two can be diffed side by side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CrHint: u32 {
        /// `none` — reset any previously set hint and don't inherit.
        const NONE_NO_INHERIT = 0x0000_0001;
        /// `strut-confined` (inheritable).
        const STRUT_CONFINED = 0x0000_0002;
        /// `fit-glyphs` (inheritable).
        const FIT_GLYPHS = 0x0000_0004;
        /// `cjk-tailored` (inheritable).
        const CJK_TAILORED = 0x0000_0008;
        /// `no-presentational` — also reduces the owning selector's specificity.
        const NO_PRESENTATIONAL_CSS = 0x0000_0010;
        /// `toc-level1`
        const TOC_LEVEL1 = 0x0000_0100;
        /// `toc-level2`
        const TOC_LEVEL2 = 0x0000_0200;
        /// `toc-level3`
        const TOC_LEVEL3 = 0x0000_0400;
        /// `toc-level4`
        const TOC_LEVEL4 = 0x0000_0800;
        /// `toc-level5`
        const TOC_LEVEL5 = 0x0000_1000;
        /// `toc-level6`
        const TOC_LEVEL6 = 0x0000_2000;
        /// `toc-ignore`
        const TOC_IGNORE = 0x0000_4000;
        /// `text-selection-inline`
        const TEXT_SELECTION_INLINE = 0x0001_0000;
        /// `text-selection-block`
        const TEXT_SELECTION_BLOCK = 0x0002_0000;
        /// `text-selection-skip`
        const TEXT_SELECTION_SKIP = 0x0004_0000;
        /// `non-linear`
        const NON_LINEAR = 0x0010_0000;
        /// `non-linear-combining` (includes [`Self::NON_LINEAR`]).
        const NON_LINEAR_COMBINING = 0x0030_0000;
        /// `footnote-inpage`
        const FOOTNOTE_INPAGE = 0x0040_0000;
        /// Internal: set by [`Self::FOOTNOTE_INPAGE`] and inherited early.
        const INSIDE_FOOTNOTE_INPAGE = 0x0080_0000;
        /// `noteref`
        const NOTEREF = 0x0100_0000;
        /// `noteref-ignore`
        const NOTEREF_IGNORE = 0x0200_0000;
        /// `footnote`
        const FOOTNOTE = 0x0400_0000;
        /// `footnote-ignore`
        const FOOTNOTE_IGNORE = 0x0800_0000;
        /// `extend-footnote-inpage`
        const EXTEND_FOOTNOTE_INPAGE = 0x1000_0000;
        /// The `late` hint raises the owning selector's specificity
        /// "extra weight" bit instead of accumulating here; it carries no
        /// bitmask bit of its own.
        const _ = !0;
    }
}

impl CrHint {
    /// Hints that propagate through inheritance (`CSS_CR_HINT_INHERITABLE_MASK`).
    pub const INHERITABLE_MASK: Self = Self::from_bits_truncate(0x0000_000E);
    /// Hints inherited before stylesheets are applied
    /// (`CSS_CR_HINT_INHERITABLE_EARLY_MASK`).
    pub const INHERITABLE_EARLY_MASK: Self = Self::from_bits_truncate(0x0080_0000);
}

/// A keyword in a `-cr-hint` value, resolved into either a bitmask flag or
/// the specificity-affecting `late` directive (spec §4.3).
pub enum CrHintKeyword {
    /// Accumulate this flag into the hint bitmap via bitwise OR.
    Flag(CrHint),
    /// `none` — reset the bitmap and suppress inheritance.
    Reset,
    /// `late` — bump the owning selector's specificity instead of the bitmap.
    Late,
}

fn cr_hint_keyword(word: &str) -> Option<CrHintKeyword> {
    Some(match word {
        "none" => CrHintKeyword::Reset,
        "late" => CrHintKeyword::Late,
        "strut-confined" => CrHintKeyword::Flag(CrHint::STRUT_CONFINED),
        "fit-glyphs" => CrHintKeyword::Flag(CrHint::FIT_GLYPHS),
        "cjk-tailored" => CrHintKeyword::Flag(CrHint::CJK_TAILORED),
        "no-presentational" => CrHintKeyword::Flag(CrHint::NO_PRESENTATIONAL_CSS),
        "toc-level1" => CrHintKeyword::Flag(CrHint::TOC_LEVEL1),
        "toc-level2" => CrHintKeyword::Flag(CrHint::TOC_LEVEL2),
        "toc-level3" => CrHintKeyword::Flag(CrHint::TOC_LEVEL3),
        "toc-level4" => CrHintKeyword::Flag(CrHint::TOC_LEVEL4),
        "toc-level5" => CrHintKeyword::Flag(CrHint::TOC_LEVEL5),
        "toc-level6" => CrHintKeyword::Flag(CrHint::TOC_LEVEL6),
        "toc-ignore" => CrHintKeyword::Flag(CrHint::TOC_IGNORE),
        "text-selection-inline" => CrHintKeyword::Flag(CrHint::TEXT_SELECTION_INLINE),
        "text-selection-block" => CrHintKeyword::Flag(CrHint::TEXT_SELECTION_BLOCK),
        "text-selection-skip" => CrHintKeyword::Flag(CrHint::TEXT_SELECTION_SKIP),
        "non-linear" => CrHintKeyword::Flag(CrHint::NON_LINEAR),
        "non-linear-combining" => CrHintKeyword::Flag(CrHint::NON_LINEAR_COMBINING),
        "footnote-inpage" => CrHintKeyword::Flag(CrHint::FOOTNOTE_INPAGE),
        "noteref" => CrHintKeyword::Flag(CrHint::NOTEREF),
        "noteref-ignore" => CrHintKeyword::Flag(CrHint::NOTEREF_IGNORE),
        "footnote" => CrHintKeyword::Flag(CrHint::FOOTNOTE),
        "footnote-ignore" => CrHintKeyword::Flag(CrHint::FOOTNOTE_IGNORE),
        "extend-footnote-inpage" => CrHintKeyword::Flag(CrHint::EXTEND_FOOTNOTE_INPAGE),
        _ => return None,
    })
}

/// The result of parsing a `-cr-hint:` value: the accumulated flag bitmap,
/// whether `none` reset it (so inheritance should stop), and whether `late`
/// was present (the caller bumps the owning selector's specificity).
#[derive(Debug, Clone, Copy, Default)]
pub struct CrHintValue {
    /// Bitwise-OR of every recognised flag keyword.
    pub flags: CrHint,
    /// `none` was present: reset and suppress inheritance.
    pub reset: bool,
    /// `late` was present: caller should raise the selector's specificity.
    pub late: bool,
}

/// Parse a space-separated `-cr-hint` keyword list up to `;`/`}`.
#[must_use]
pub fn parse_cr_hint(cursor: &mut TokenCursor) -> CrHintValue {
    let mut result = CrHintValue::default();
    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::Ident(word) => {
                let _ = cursor.advance();
                match cr_hint_keyword(&word.to_ascii_lowercase()) {
                    Some(CrHintKeyword::Flag(flag)) => result.flags |= flag,
                    Some(CrHintKeyword::Reset) => {
                        result.reset = true;
                        result.flags = CrHint::empty();
                    }
                    Some(CrHintKeyword::Late) => result.late = true,
                    None => {}
                }
            }
            _ => break,
        }
    }
    result
}

/// A `-cr-only-if` guard keyword (spec §4.3), split into those that are
/// decidable at compile time and those that must be re-checked against the
/// node's in-progress style during application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlyIfGuard {
    /// Document was parsed from an EPUB/CHM-like container.
    FragmentedContainer(bool),
    /// Dynamic: the node is currently being styled as `inline`.
    Inline(bool),
    /// Dynamic: the node is an in-page footnote block.
    InpageFootnote(bool),
    /// Dynamic: the node is nested inside an in-page footnote.
    InsideInpageFootnote(bool),
}

impl OnlyIfGuard {
    /// Whether this guard can be decided once, at compile time, rather than
    /// re-checked per node during application.
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self, OnlyIfGuard::FragmentedContainer(_))
    }
}

fn only_if_keyword(word: &str) -> Option<OnlyIfGuard> {
    let (word, negate) = word.strip_prefix("not-").map_or((word, false), |w| (w, true));
    Some(match word {
        "fragmented-container" => OnlyIfGuard::FragmentedContainer(!negate),
        "inline" => OnlyIfGuard::Inline(!negate),
        "inpage-footnote" => OnlyIfGuard::InpageFootnote(!negate),
        "inside-inpage-footnote" => OnlyIfGuard::InsideInpageFootnote(!negate),
        _ => return None,
    })
}

/// Parse a `-cr-only-if` keyword list. Returns `None` if any static guard
/// already fails, per spec §4.3 ("the entire declaration is discarded").
#[must_use]
pub fn parse_cr_only_if(
    cursor: &mut TokenCursor,
    format: DocumentFormat,
) -> Option<Vec<OnlyIfGuard>> {
    let mut dynamic_guards = Vec::new();
    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::Ident(word) => {
                let _ = cursor.advance();
                let Some(guard) = only_if_keyword(&word.to_ascii_lowercase()) else {
                    continue;
                };
                if guard.is_static() {
                    if !static_guard_holds(guard, format) {
                        return None;
                    }
                } else {
                    dynamic_guards.push(guard);
                }
            }
            _ => break,
        }
    }
    Some(dynamic_guards)
}

fn static_guard_holds(guard: OnlyIfGuard, format: DocumentFormat) -> bool {
    match guard {
        OnlyIfGuard::FragmentedContainer(expected) => {
            matches!(format, DocumentFormat::FragmentedContainer) == expected
        }
        _ => true,
    }
}

/// Parse `-cr-ignore-if-dom-version-greater-or-equal N`, returning the
/// threshold `N`.
#[must_use]
pub fn parse_ignore_if_dom_version_gte(cursor: &mut TokenCursor) -> Option<u32> {
    cursor.skip_whitespace();
    match cursor.peek().clone() {
        CSSToken::Number {
            int_value: Some(n), ..
        } if n >= 0 => {
            let _ = cursor.advance();
            #[allow(clippy::cast_sign_loss)]
            Some(n as u32)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn cursor_for(src: &str) -> TokenCursor {
        TokenCursor::new(CSSTokenizer::new(src).tokenize_all())
    }

    #[test]
    fn multiple_hints_accumulate_via_or() {
        let mut cursor = cursor_for("footnote-inpage noteref");
        let value = parse_cr_hint(&mut cursor);
        assert!(value.flags.contains(CrHint::FOOTNOTE_INPAGE));
        assert!(value.flags.contains(CrHint::NOTEREF));
    }

    #[test]
    fn none_resets_and_marks_reset() {
        let mut cursor = cursor_for("footnote none");
        // "footnote" alone isn't a recognised keyword (only "footnote-inpage"
        // and friends are); confirm "none" still resets whatever came before.
        let value = parse_cr_hint(&mut cursor);
        assert!(value.reset);
        assert!(value.flags.is_empty());
    }

    #[test]
    fn not_prefix_negates_dynamic_guard() {
        let mut cursor = cursor_for("not-inline");
        let guards = parse_cr_only_if(&mut cursor, DocumentFormat::Flat).unwrap();
        assert_eq!(guards, vec![OnlyIfGuard::Inline(false)]);
    }

    #[test]
    fn failing_static_guard_discards_declaration() {
        let mut cursor = cursor_for("fragmented-container");
        assert!(parse_cr_only_if(&mut cursor, DocumentFormat::Flat).is_none());
    }
}
