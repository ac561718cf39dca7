//! Process-wide configuration, threaded explicitly.
//!
//! The source engine keeps these knobs as static globals (render DPI, root
//! font size, hyphenation mode flags, hyphen minimums, the hyphenation
//! dictionary registry). Per the design notes, this port groups them into a
//! single value and threads it through the style API instead, so that two
//! documents open at once (or a test suite running in parallel) don't
//! fight over shared mutable state.

/// Default DPI used by most e-ink/e-reader targets when none is configured.
pub const DEFAULT_RENDER_DPI: u32 = 96;

/// Default root font size in CSS pixels, used to resolve `rem`.
pub const DEFAULT_ROOT_FONT_SIZE_PX: u32 = 16;

/// Default left/right hyphen minimums (characters kept un-hyphenated at the
/// start/end of a hyphenated word), matching `HYPH_DEFAULT_HYPHEN_MIN`.
pub const DEFAULT_HYPHEN_MIN: u8 = 2;

/// Bitset of block-rendering features, consulted only by `-cr-only-if`
/// guards (spec §4.3, §6.5). The specific bit meanings are host-defined;
/// the engine only tests membership.
pub type BlockRenderingFlags = u32;

/// Engine-wide configuration, threaded through style computation and
/// language resolution instead of living in process globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scales all CSS pixels to device pixels. `0` disables absolute-unit
    /// conversion (lengths resolve as if DPI were 96).
    pub render_dpi: u32,
    /// Whether font sizes also scale with `render_dpi`, or only non-font
    /// lengths do.
    pub scale_font_with_dpi: bool,
    /// Root element font size in CSS pixels, used to resolve `rem`.
    pub root_font_size_px: u32,
    /// When `false`, every node resolves to the main document language
    /// regardless of its `lang` attribute.
    pub embedded_langs_enabled: bool,
    /// Master hyphenation on/off switch.
    pub hyphenation_enabled: bool,
    /// Force soft-hyphen-only hyphenation regardless of per-language dictionary.
    pub hyphenation_soft_hyphens_only: bool,
    /// Force the algorithmic fallback hyphenator regardless of per-language dictionary.
    pub hyphenation_force_algorithmic: bool,
    /// Treat embedded U+00AD as authoritative break points.
    pub trust_soft_hyphens: bool,
    /// Minimum characters before a hyphenation break. `0` means "use the
    /// dictionary's own default".
    pub left_hyphen_min: u8,
    /// Minimum characters after a hyphenation break. `0` means "use the
    /// dictionary's own default".
    pub right_hyphen_min: u8,
    /// Host-defined bitset consulted by `-cr-only-if` guards.
    pub block_rendering_flags: BlockRenderingFlags,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_dpi: DEFAULT_RENDER_DPI,
            scale_font_with_dpi: false,
            root_font_size_px: DEFAULT_ROOT_FONT_SIZE_PX,
            embedded_langs_enabled: false,
            hyphenation_enabled: true,
            hyphenation_soft_hyphens_only: false,
            hyphenation_force_algorithmic: false,
            trust_soft_hyphens: true,
            left_hyphen_min: 0,
            right_hyphen_min: 0,
            block_rendering_flags: 0,
        }
    }
}

impl EngineConfig {
    /// Resolve the effective left-hyphen-min: the config override if set,
    /// otherwise the dictionary's own default.
    #[must_use]
    pub fn effective_left_hyphen_min(&self, dictionary_default: u8) -> u8 {
        if self.left_hyphen_min == 0 {
            dictionary_default
        } else {
            self.left_hyphen_min
        }
    }

    /// Resolve the effective right-hyphen-min, same rule as
    /// [`Self::effective_left_hyphen_min`].
    #[must_use]
    pub fn effective_right_hyphen_min(&self, dictionary_default: u8) -> u8 {
        if self.right_hyphen_min == 0 {
            dictionary_default
        } else {
            self.right_hyphen_min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_source_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.render_dpi, 96);
        assert!(!cfg.embedded_langs_enabled);
        assert!(cfg.hyphenation_enabled);
    }

    #[test]
    fn hyphen_min_override_wins_over_dictionary_default() {
        let mut cfg = EngineConfig::default();
        assert_eq!(cfg.effective_left_hyphen_min(2), 2);
        cfg.left_hyphen_min = 3;
        assert_eq!(cfg.effective_left_hyphen_min(2), 3);
    }
}
