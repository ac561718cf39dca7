//! User-supplied hyphenation word list, binary-searched ahead of pattern
//! matching (spec §4.9 "A user-supplied word list... short-circuits pattern
//! matching").
//!
//! Grounded on `hyphman.cpp`'s `UserHyphDict`. The source stores a flat,
//! alphabetically sorted `lString32[]`/`char*[]` pair and binary-searches
//! them; this port keeps a `Vec<(String, Vec<bool>)>` sorted the same way.

/// One entry: a lowercased word and its explicit break-after mask, `true` at
/// index `i` meaning "break allowed after character `i`".
#[derive(Debug, Clone)]
struct Entry {
    word: String,
    mask: Vec<bool>,
}

/// A word list overriding pattern-based hyphenation for specific words
/// (`UserHyphDict`). Construct via [`UserWordList::parse`], which validates
/// the file's alphabetical order the same way the source's loader does.
#[derive(Debug, Default, Clone)]
pub struct UserWordList {
    entries: Vec<Entry>,
}

/// One malformed-line or ordering problem found while parsing a word-list
/// file (spec §6.3's dictionary-malformed error category, specialised to
/// this format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWordListError {
    /// A line did not have a hyphenation mask the same length as its word.
    MaskLengthMismatch {
        /// 1-based line number of the offending entry.
        line: usize,
        /// The word that failed to parse.
        word: String,
    },
    /// Word `line` sorts before a word that appeared earlier in the file;
    /// the list must be pre-sorted since lookup is a binary search.
    NotSorted {
        /// 1-based line number of the out-of-order entry.
        line: usize,
        /// The word that broke the sort order.
        word: String,
    },
}

impl UserWordList {
    /// Parse the word-list text format: one `word;h-y-p-h-e-n-a-t-i-o-n`
    /// pair per line, where the second field is the word spelled out with a
    /// `-` marking each allowed break (`UserHyphDict::load`'s on-disk
    /// format, simplified from its semicolon/newline buffer scan into a
    /// line-oriented one).
    pub fn parse(source: &str) -> Result<Self, UserWordListError> {
        let mut entries = Vec::new();
        for (line_no, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((word, hyphenated)) = line.split_once(';') else {
                continue;
            };
            let word = word.trim().to_lowercase();
            let hyphenated = hyphenated.trim();

            let mut mask = Vec::with_capacity(word.chars().count());
            let mut chars = hyphenated.chars().peekable();
            while let Some(ch) = chars.next() {
                if ch == '-' {
                    continue;
                }
                let breaks_after = chars.peek() == Some(&'-');
                mask.push(breaks_after);
            }
            if mask.len() != word.chars().count() {
                return Err(UserWordListError::MaskLengthMismatch { line: line_no + 1, word });
            }
            if let Some(last) = entries.last() {
                let last: &Entry = last;
                if word < last.word {
                    return Err(UserWordListError::NotSorted { line: line_no + 1, word });
                }
            }
            entries.push(Entry { word, mask });
        }
        Ok(Self { entries })
    }

    /// Whether the list has any entries (`UserHyphDict::hasWords`).
    #[must_use]
    pub fn has_words(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Binary-search for `word` (already split off punctuation by the
    /// caller) and return its explicit mask if present
    /// (`UserHyphDict::getMask`).
    #[must_use]
    pub fn lookup(&self, word: &[char]) -> Option<Vec<bool>> {
        let lowered: String = word.iter().flat_map(|c| c.to_lowercase()).collect();
        self.entries
            .binary_search_by(|e| e.word.as_str().cmp(lowered.as_str()))
            .ok()
            .map(|idx| self.entries[idx].mask.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sorted_entries() {
        let list = UserWordList::parse("danger;dan-ger\nhyphen;hy-phen\n").unwrap();
        assert!(list.has_words());
        let word: Vec<char> = "danger".chars().collect();
        let mask = list.lookup(&word).unwrap();
        assert_eq!(mask, vec![false, false, true, false, false, false]);
    }

    #[test]
    fn rejects_unsorted_file() {
        let err = UserWordList::parse("zebra;ze-bra\napple;ap-ple\n");
        assert!(matches!(err, Err(UserWordListError::NotSorted { .. })));
    }

    #[test]
    fn lookup_misses_return_none() {
        let list = UserWordList::parse("danger;dan-ger\n").unwrap();
        let word: Vec<char> = "unrelated".chars().collect();
        assert_eq!(list.lookup(&word), None);
    }
}
