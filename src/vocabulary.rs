// This file is part of Ravenfoot.
//
// Copyright (c) 2025  The Ravenfoot developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;

pub const FALLBACK_WORDS: [&str; 3] = ["error", "missing", "words"];
pub const FALLBACK_SPECIAL: &str = "!";
pub const FALLBACK_NUMBER: &str = "1";

/// Where vocabulary bytes come from. `Ok(None)` means the source does not
/// exist; `Err` means it exists but could not be read.
pub trait SourceReader {
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>>;
}

/// Sources held in memory, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    sources: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.sources.insert(id.into(), bytes.into());
        self
    }
}

impl SourceReader for MemorySource {
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.sources.get(id).cloned())
    }
}

/// Ordered tokens loaded from one source. Order and duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VocabularySet {
    tokens: Vec<String>,
}

impl VocabularySet {
    /// Keeps the non-empty entries, trimmed.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(decode_skipping_invalid(bytes).lines())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    fn or_placeholder(self, placeholder: &[&str]) -> (Self, bool) {
        if self.is_empty() {
            (Self::new(placeholder), true)
        } else {
            (self, false)
        }
    }
}

/// Decodes UTF-8, dropping any byte sequence that is not valid.
fn decode_skipping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(skip) => bytes = &rest[skip..],
                    None => return out,
                }
            }
        }
    }
}

/// Reads one source. Missing and unreadable sources both yield an empty set;
/// the read error, if any, is handed back so the caller can report it.
pub fn load<R: SourceReader + ?Sized>(
    reader: &R,
    id: &str,
) -> (VocabularySet, Option<LoadWarning>) {
    match reader.read(id) {
        Ok(Some(bytes)) => (VocabularySet::from_bytes(&bytes), None),
        Ok(None) => (VocabularySet::default(), None),
        Err(e) => (
            VocabularySet::default(),
            Some(LoadWarning::Unreadable {
                source: id.to_string(),
                reason: format!("{:#}", e),
            }),
        ),
    }
}

/// Names of the sources a collection is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceManifest {
    pub word_lists: Vec<String>,
    pub specials: String,
    pub numbers: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    Unreadable { source: String, reason: String },
    EmptyWordList { source: String },
    NoWordLists,
    NoSpecials { source: String },
    NoNumbers { source: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { source, reason } => {
                write!(f, "Could not read \"{}\": {}", source, reason)
            }
            Self::EmptyWordList { source } => {
                write!(f, "Word list \"{}\" is missing or empty, skipped", source)
            }
            Self::NoWordLists => write!(
                f,
                "No word lists found, using placeholder list ({})",
                FALLBACK_WORDS.join(", ")
            ),
            Self::NoSpecials { source } => write!(
                f,
                "Specials \"{}\" missing or empty, using \"{}\"",
                source, FALLBACK_SPECIAL
            ),
            Self::NoNumbers { source } => write!(
                f,
                "Numbers \"{}\" missing or empty, using \"{}\"",
                source, FALLBACK_NUMBER
            ),
        }
    }
}

/// Immutable vocabulary shared by generation and entropy estimation.
///
/// Always holds at least one non-empty word list and non-empty specials and
/// numbers; absent sources are replaced by fixed placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyCollection {
    word_lists: Vec<VocabularySet>,
    specials: VocabularySet,
    numbers: VocabularySet,
    fallback_words: bool,
    fallback_specials: bool,
    fallback_numbers: bool,
}

impl VocabularyCollection {
    /// Empty word lists are dropped before the placeholder check.
    pub fn new(
        word_lists: Vec<VocabularySet>,
        specials: VocabularySet,
        numbers: VocabularySet,
    ) -> Self {
        let mut word_lists: Vec<VocabularySet> =
            word_lists.into_iter().filter(|l| !l.is_empty()).collect();

        let fallback_words = word_lists.is_empty();
        if fallback_words {
            word_lists.push(VocabularySet::new(FALLBACK_WORDS));
        }

        let (specials, fallback_specials) = specials.or_placeholder(&[FALLBACK_SPECIAL]);
        let (numbers, fallback_numbers) = numbers.or_placeholder(&[FALLBACK_NUMBER]);

        Self {
            word_lists,
            specials,
            numbers,
            fallback_words,
            fallback_specials,
            fallback_numbers,
        }
    }

    /// Resolves every source named in `manifest`. Never fails: problems are
    /// returned as warnings alongside a usable collection.
    pub fn load<R: SourceReader + ?Sized>(
        reader: &R,
        manifest: &SourceManifest,
    ) -> (Self, Vec<LoadWarning>) {
        let mut warnings = Vec::new();

        let mut word_lists = Vec::with_capacity(manifest.word_lists.len());
        for id in &manifest.word_lists {
            let (set, warning) = load(reader, id);
            warnings.extend(warning);
            if set.is_empty() {
                warnings.push(LoadWarning::EmptyWordList { source: id.clone() });
            } else {
                word_lists.push(set);
            }
        }

        let (specials, warning) = load(reader, &manifest.specials);
        warnings.extend(warning);
        let (numbers, warning) = load(reader, &manifest.numbers);
        warnings.extend(warning);

        let collection = Self::new(word_lists, specials, numbers);

        if collection.fallback_words {
            warnings.push(LoadWarning::NoWordLists);
        }
        if collection.fallback_specials {
            warnings.push(LoadWarning::NoSpecials {
                source: manifest.specials.clone(),
            });
        }
        if collection.fallback_numbers {
            warnings.push(LoadWarning::NoNumbers {
                source: manifest.numbers.clone(),
            });
        }

        (collection, warnings)
    }

    pub fn word_lists(&self) -> &[VocabularySet] {
        &self.word_lists
    }

    pub fn specials(&self) -> &VocabularySet {
        &self.specials
    }

    pub fn numbers(&self) -> &VocabularySet {
        &self.numbers
    }

    pub fn average_word_list_len(&self) -> f64 {
        let total: usize = self.word_lists.iter().map(VocabularySet::len).sum();
        total as f64 / self.word_lists.len().max(1) as f64
    }

    pub fn is_fallback_words(&self) -> bool {
        self.fallback_words
    }

    pub fn is_fallback_specials(&self) -> bool {
        self.fallback_specials
    }

    pub fn is_fallback_numbers(&self) -> bool {
        self.fallback_numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl SourceReader for Broken {
        fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
            anyhow::bail!("permission denied: {}", id)
        }
    }

    fn manifest(words: &[&str]) -> SourceManifest {
        SourceManifest {
            word_lists: words.iter().map(|w| w.to_string()).collect(),
            specials: "special_characters.txt".to_string(),
            numbers: "numbers.txt".to_string(),
        }
    }

    #[test]
    fn test_lines_trimmed_and_blank_skipped() {
        let set = VocabularySet::from_bytes(b"  apple \n\n\tberry\r\n   \ncherry");
        assert_eq!(set.tokens(), &["apple", "berry", "cherry"]);
    }

    #[test]
    fn test_order_and_duplicates_kept() {
        let set = VocabularySet::from_bytes(b"zeta\nalpha\nzeta\n");
        assert_eq!(set.tokens(), &["zeta", "alpha", "zeta"]);
    }

    #[test]
    fn test_invalid_utf8_bytes_dropped() {
        let set = VocabularySet::from_bytes(b"ap\xffple\n\xc3\n\xe2\x82berry\nna\xc3\xafve\n");
        assert_eq!(set.tokens(), &["apple", "berry", "naïve"]);
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        let set = VocabularySet::from_bytes(b"word\n\xe2\x82");
        assert_eq!(set.tokens(), &["word"]);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (set, warning) = load(&MemorySource::new(), "nope.txt");
        assert!(set.is_empty());
        assert!(warning.is_none());
    }

    #[test]
    fn test_load_unreadable_warns() {
        let (set, warning) = load(&Broken, "words.txt");
        assert!(set.is_empty());
        match warning {
            Some(LoadWarning::Unreadable { source, reason }) => {
                assert_eq!(source, "words.txt");
                assert!(reason.contains("permission denied"));
            }
            other => panic!("Unexpected warning: {:?}", other),
        }
    }

    #[test]
    fn test_collection_all_sources_present() {
        let reader = MemorySource::new()
            .with("en_words_clean.txt", "apple\nberry\n")
            .with("de_words_clean.txt", "apfel\nbeere\nkirsche\n")
            .with("special_characters.txt", "!\n@\n#\n")
            .with("numbers.txt", "0\n1\n2\n3\n");

        let (vocab, warnings) = VocabularyCollection::load(
            &reader,
            &manifest(&["de_words_clean.txt", "en_words_clean.txt"]),
        );

        assert!(warnings.is_empty(), "Unexpected warnings: {:?}", warnings);
        assert_eq!(vocab.word_lists().len(), 2);
        assert_eq!(vocab.word_lists()[0].tokens(), &["apfel", "beere", "kirsche"]);
        assert_eq!(vocab.specials().len(), 3);
        assert_eq!(vocab.numbers().len(), 4);
        assert!((vocab.average_word_list_len() - 2.5).abs() < 1e-12);
        assert!(!vocab.is_fallback_words());
    }

    #[test]
    fn test_collection_placeholders() {
        let (vocab, warnings) =
            VocabularyCollection::load(&MemorySource::new(), &manifest(&["en_words_clean.txt"]));

        assert_eq!(vocab.word_lists().len(), 1);
        assert_eq!(vocab.word_lists()[0].tokens(), &FALLBACK_WORDS);
        assert_eq!(vocab.specials().tokens(), &[FALLBACK_SPECIAL]);
        assert_eq!(vocab.numbers().tokens(), &[FALLBACK_NUMBER]);
        assert!(vocab.is_fallback_words());
        assert!(vocab.is_fallback_specials());
        assert!(vocab.is_fallback_numbers());

        assert_eq!(
            warnings,
            vec![
                LoadWarning::EmptyWordList {
                    source: "en_words_clean.txt".to_string()
                },
                LoadWarning::NoWordLists,
                LoadWarning::NoSpecials {
                    source: "special_characters.txt".to_string()
                },
                LoadWarning::NoNumbers {
                    source: "numbers.txt".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_collection_skips_blank_list() {
        let reader = MemorySource::new()
            .with("a_words_clean.txt", "\n  \n")
            .with("b_words_clean.txt", "solo\n");

        let (vocab, _) = VocabularyCollection::load(
            &reader,
            &manifest(&["a_words_clean.txt", "b_words_clean.txt"]),
        );

        assert_eq!(vocab.word_lists().len(), 1);
        assert_eq!(vocab.word_lists()[0].tokens(), &["solo"]);
        assert!(!vocab.is_fallback_words());
    }

    #[test]
    fn test_collection_empty_word_lists() {
        let vocab = VocabularyCollection::new(
            vec![],
            VocabularySet::new(["$"]),
            VocabularySet::new(["7"]),
        );
        assert_eq!(vocab.word_lists().len(), 1);
        assert_eq!(vocab.word_lists()[0].len(), 3);
        assert!(!vocab.is_fallback_specials());
    }

    #[test]
    fn test_unreadable_source_falls_back() {
        let (vocab, warnings) =
            VocabularyCollection::load(&Broken, &manifest(&["x_words_clean.txt"]));

        assert!(vocab.is_fallback_words());
        assert_eq!(
            warnings
                .iter()
                .filter(|w| matches!(w, LoadWarning::Unreadable { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_warning_messages() {
        let msg = LoadWarning::NoSpecials {
            source: "special_characters.txt".to_string(),
        }
        .to_string();
        assert_eq!(
            msg,
            "Specials \"special_characters.txt\" missing or empty, using \"!\""
        );
        assert!(LoadWarning::NoWordLists.to_string().contains("error, missing, words"));
    }
}
