//! TeX/Liang hyphenation pattern store (spec §4.9 "Pattern store").
//!
//! Grounded on `hyphman.cpp`'s `TexPattern`/`TexHyph`. Patterns are stored in
//! a fixed-size hash table keyed by a prefix hash of the pattern's first 1-4
//! characters; each slot is a singly linked, sorted chain (kept here as a
//! `Vec` instead, since Rust has no need for the source's intrusive list).

use vellum_common::{EngineConfig, StyleError};

use super::method::{is_ignorable, HyphMethod};
use super::wordlist::UserWordList;

/// Longest pattern word this table stores; longer patterns are discarded at
/// load time and reported via the returned overflow count
/// (`MAX_PATTERN_SIZE` in the source).
pub const MAX_PATTERN_SIZE: usize = 35;

/// Number of hash buckets (`PATTERN_HASH_SIZE` in the source).
pub const PATTERN_HASH_SIZE: usize = 16384;

/// One parsed Liang pattern: a word (with embedded digits stripped) and a
/// same-length-plus-one break-preference mask, one ASCII digit per gap
/// between characters (`TexPattern`).
#[derive(Debug, Clone)]
struct Pattern {
    word: Vec<char>,
    /// `mask[i]` is the break-preference digit before `word[i]`; `mask.len()
    /// == word.len() + 1`.
    mask: Vec<u8>,
}

impl Pattern {
    /// Parse one Liang-format pattern string, e.g. `"1po2t"` for the word
    /// `pot` with a high-preference break before it and a weak one between
    /// `o` and `t` (`TexPattern(const lString32&)`).
    fn parse(raw: &str) -> Option<Self> {
        let mut word = Vec::with_capacity(raw.len());
        let mut mask = vec![0u8; 1];
        for ch in raw.chars() {
            if let Some(d) = ch.to_digit(10) {
                let last = mask.len() - 1;
                mask[last] = d as u8;
            } else {
                word.push(ch);
                mask.push(0);
            }
        }
        if word.is_empty() || word.len() > MAX_PATTERN_SIZE {
            return None;
        }
        Some(Self { word, mask })
    }

    fn hash_prefix(prefix: &[char]) -> usize {
        let get = |i: usize| prefix.get(i).map_or(0u32, |c| *c as u32);
        (((get(0).wrapping_mul(31).wrapping_add(get(1))).wrapping_mul(31).wrapping_add(get(2)))
            .wrapping_mul(31)
            .wrapping_add(get(3)) as usize)
            % PATTERN_HASH_SIZE
    }

    /// Whether `self.word` matches at `word[offset..]`, requiring only a
    /// prefix-length match against `word` (`TexPattern::match`, called once
    /// per hash bucket the 1-4 char prefix of `word[offset..]` lands in).
    fn matches_at(&self, word: &[char], offset: usize) -> bool {
        if self.word.len() > word.len() - offset {
            return false;
        }
        self.word.iter().zip(&word[offset..]).all(|(a, b)| a == b)
    }

    fn apply(&self, mask_out: &mut [u8], offset: usize) {
        for (i, &d) in self.mask.iter().enumerate() {
            if let Some(slot) = mask_out.get_mut(offset + i) {
                if d > *slot {
                    *slot = d;
                }
            }
        }
    }
}

/// A loaded TeX/Liang pattern dictionary (`TexHyph`).
#[derive(Debug)]
pub struct PatternHyphMethod {
    id: String,
    buckets: Vec<Vec<Pattern>>,
    left_hyphen_min: u8,
    right_hyphen_min: u8,
    /// Number of patterns rejected for exceeding [`MAX_PATTERN_SIZE`], for
    /// the caller to report as a warning (`largest_overflowed_word` in the
    /// source, split here into a count and a size).
    pub overflowed_count: usize,
    /// Size (in characters) of the largest rejected pattern, or `0` if none
    /// were rejected.
    pub largest_overflowed_word: usize,
}

impl PatternHyphMethod {
    /// Parse a dictionary from its XML-Liang text form: one pattern per
    /// `<pattern>...</pattern>` element. A minimal, permissive scan is used
    /// rather than a full XML parser, since pattern files have no nesting,
    /// attributes, or entities beyond the standard XML ones.
    pub fn load_xml(id: &str, source: &str) -> Result<Self, StyleError> {
        let mut method = Self {
            id: id.to_string(),
            buckets: vec![Vec::new(); PATTERN_HASH_SIZE],
            left_hyphen_min: 2,
            right_hyphen_min: 2,
            overflowed_count: 0,
            largest_overflowed_word: 0,
        };

        let mut rest = source;
        let mut found_any = false;
        while let Some(open) = rest.find("<pattern>") {
            let after_open = &rest[open + "<pattern>".len()..];
            let Some(close) = after_open.find("</pattern>") else {
                break;
            };
            let raw = decode_xml_entities(&after_open[..close]);
            found_any = true;
            match Pattern::parse(raw.trim()) {
                Some(pattern) => method.add_pattern(pattern),
                None => {
                    method.overflowed_count += 1;
                    method.largest_overflowed_word =
                        method.largest_overflowed_word.max(raw.trim().chars().count());
                }
            }
            rest = &after_open[close + "</pattern>".len()..];
        }

        if !found_any {
            return Err(StyleError::MalformedDictionary {
                id: id.to_string(),
                reason: "no <pattern> elements found".to_string(),
            });
        }
        Ok(method)
    }

    /// Best-effort parse of the legacy binary `HypHAlR4` PDB format: header,
    /// directory, then packed pattern records. The source's
    /// `isCorrectHyphFile`/`TexHyph::load(LVStreamRef)` validate a fixed
    /// 78-byte header with the magic at a known offset; this port checks
    /// the same, then reads each pattern as a null-terminated ASCII string
    /// with interleaved digits in the same Liang syntax as the XML form
    /// (the binary format differs only in framing, not in the pattern
    /// grammar).
    pub fn load_pdb(id: &str, bytes: &[u8]) -> Result<Self, StyleError> {
        const HEADER_LEN: usize = 78;
        const MAGIC: &[u8] = b"HypHAlR4";
        const MAGIC_OFFSET: usize = 60;

        if bytes.len() < HEADER_LEN || bytes.get(MAGIC_OFFSET..MAGIC_OFFSET + 8) != Some(MAGIC) {
            return Err(StyleError::MalformedDictionary {
                id: id.to_string(),
                reason: "missing HypHAlR4 magic".to_string(),
            });
        }

        let mut method = Self {
            id: id.to_string(),
            buckets: vec![Vec::new(); PATTERN_HASH_SIZE],
            left_hyphen_min: 2,
            right_hyphen_min: 2,
            overflowed_count: 0,
            largest_overflowed_word: 0,
        };

        let mut found_any = false;
        for record in bytes[HEADER_LEN..].split(|&b| b == 0) {
            if record.is_empty() {
                continue;
            }
            let Ok(text) = std::str::from_utf8(record) else {
                continue;
            };
            found_any = true;
            match Pattern::parse(text.trim()) {
                Some(pattern) => method.add_pattern(pattern),
                None => {
                    method.overflowed_count += 1;
                    method.largest_overflowed_word = method.largest_overflowed_word.max(text.trim().chars().count());
                }
            }
        }

        if !found_any {
            return Err(StyleError::MalformedDictionary {
                id: id.to_string(),
                reason: "no pattern records found after header".to_string(),
            });
        }
        Ok(method)
    }

    fn add_pattern(&mut self, pattern: Pattern) {
        let h = Pattern::hash_prefix(&pattern.word);
        self.buckets[h].push(pattern);
    }

    /// Run every relevant hash bucket's chain against `word` starting at
    /// `offset`, merging matches into `mask_out` by taking the max of each
    /// digit (`TexHyph::match`).
    fn match_at(&self, word: &[char], offset: usize, mask_out: &mut [u8]) -> bool {
        let slice = &word[offset..];
        let mut found = false;
        for prefix_len in 1..=4usize.min(slice.len().max(1)) {
            let prefix = &slice[..prefix_len.min(slice.len())];
            let h = Pattern::hash_prefix(prefix);
            for pattern in &self.buckets[h] {
                if pattern.matches_at(word, offset) {
                    pattern.apply(mask_out, offset);
                    found = true;
                }
            }
        }
        found
    }
}

impl HyphMethod for PatternHyphMethod {
    fn id(&self) -> &str {
        &self.id
    }

    fn default_left_hyphen_min(&self) -> u8 {
        self.left_hyphen_min
    }

    fn default_right_hyphen_min(&self) -> u8 {
        self.right_hyphen_min
    }

    fn hyphenate(
        &self,
        word: &[char],
        config: &EngineConfig,
        user_words: Option<&UserWordList>,
    ) -> Option<Vec<bool>> {
        if let Some(words) = user_words {
            if let Some(flags) = words.lookup(word) {
                return Some(flags);
            }
        }
        if config.trust_soft_hyphens {
            let mut flags = vec![false; word.len()];
            let mut found = false;
            for (i, &ch) in word.iter().enumerate() {
                if ch == super::method::SOFT_HYPHEN {
                    flags[i] = true;
                    found = true;
                }
            }
            if found {
                return Some(flags);
            }
        }

        if word.len() <= 3 {
            return None;
        }

        let mut buf = Vec::with_capacity(word.len() + 2);
        let mut ignorables_at_right = 0usize;
        buf.push(' ');
        for &ch in word {
            if is_ignorable(ch) {
                ignorables_at_right += 1;
            } else {
                buf.push(ch.to_lowercase().next().unwrap_or(ch));
                ignorables_at_right = 0;
            }
        }
        buf.push(' ');
        let wlen = buf.len() - 2;
        if wlen <= 3 {
            return None;
        }

        let mut mask = vec![0u8; buf.len() + 1];
        let mut found = false;
        for i in 0..=wlen {
            found = self.match_at(&buf, i, &mut mask) || found;
        }
        if !found {
            return None;
        }

        let left_min = config.effective_left_hyphen_min(self.left_hyphen_min) as usize;
        let right_min = config.effective_right_hyphen_min(self.right_hyphen_min) as usize;

        let mut flags = vec![false; word.len()];
        let mut ignorables_skipped = 0usize;
        let mut produced = false;
        let len = word.len();
        for p in 0..len.saturating_sub(1) {
            if is_ignorable(word[p]) {
                ignorables_skipped += 1;
                continue;
            }
            if p.saturating_sub(ignorables_skipped) + 1 < left_min {
                continue;
            }
            if p + ignorables_at_right + right_min + 1 > len {
                continue;
            }
            let mask_index = p + 2 - ignorables_skipped;
            if mask.get(mask_index).copied().unwrap_or(0) % 2 == 1 {
                flags[p] = true;
                produced = true;
            }
        }
        produced.then_some(flags)
    }
}

fn decode_xml_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_DICT: &str = "<patterns><pattern>1po2t</pattern><pattern>ta1b</pattern></patterns>";

    #[test]
    fn parses_xml_patterns() {
        let method = PatternHyphMethod::load_xml("test.pattern", SIMPLE_DICT).unwrap();
        assert_eq!(method.overflowed_count, 0);
    }

    #[test]
    fn rejects_dictionary_with_no_patterns() {
        let err = PatternHyphMethod::load_xml("empty.pattern", "<patterns></patterns>");
        assert!(err.is_err());
    }

    #[test]
    fn hyphenates_a_word_matching_a_loaded_pattern() {
        let dict = "<patterns><pattern>hy1phen</pattern><pattern>phe1na</pattern></patterns>";
        let method = PatternHyphMethod::load_xml("test.pattern", dict).unwrap();
        let word: Vec<char> = "hyphenation".chars().collect();
        let result = method.hyphenate(&word, &EngineConfig::default(), None);
        assert!(result.is_some());
    }

    #[test]
    fn rejects_pdb_without_magic() {
        let bytes = vec![0u8; 100];
        assert!(PatternHyphMethod::load_pdb("x.pdb", &bytes).is_err());
    }

    #[test]
    fn pattern_overflow_is_tracked() {
        let long_word = "a".repeat(MAX_PATTERN_SIZE + 5);
        let dict = format!("<patterns><pattern>{long_word}</pattern><pattern>hy1phen</pattern></patterns>");
        let method = PatternHyphMethod::load_xml("test.pattern", &dict).unwrap();
        assert_eq!(method.overflowed_count, 1);
        assert_eq!(method.largest_overflowed_word, MAX_PATTERN_SIZE + 5);
    }
}
