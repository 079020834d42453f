use crate::vocabulary::{SourceManifest, SourceReader};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const WORD_LIST_SUFFIX: &str = "_words_clean.txt";
pub const SPECIALS_FILE: &str = "special_characters.txt";
pub const NUMBERS_FILE: &str = "numbers.txt";

const BUNDLED: &[(&str, &str)] = &[
    (
        "english_words_clean.txt",
        include_str!("../library/english_words_clean.txt"),
    ),
    (
        "german_words_clean.txt",
        include_str!("../library/german_words_clean.txt"),
    ),
    (SPECIALS_FILE, include_str!("../library/special_characters.txt")),
    (NUMBERS_FILE, include_str!("../library/numbers.txt")),
];

/// The library compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl BundledSource {
    pub fn manifest(&self) -> SourceManifest {
        SourceManifest {
            word_lists: BUNDLED
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| name.ends_with(WORD_LIST_SUFFIX))
                .map(str::to_string)
                .collect(),
            specials: SPECIALS_FILE.to_string(),
            numbers: NUMBERS_FILE.to_string(),
        }
    }
}

impl SourceReader for BundledSource {
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(BUNDLED
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, data)| data.as_bytes().to_vec()))
    }
}

/// A library directory on disk, one file per source.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every `*_words_clean.txt` in the directory, sorted by file name, plus
    /// the fixed specials and numbers files. A missing directory yields no
    /// word lists.
    pub fn manifest(&self) -> Result<SourceManifest> {
        let mut word_lists = Vec::new();

        match fs::read_dir(&self.root) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry.with_context(|| {
                        format!("Failed to list library directory {}", self.root.display())
                    })?;
                    let name = entry.file_name();
                    let Some(name) = name.to_str() else {
                        continue;
                    };
                    if name.ends_with(WORD_LIST_SUFFIX) && entry.path().is_file() {
                        word_lists.push(name.to_string());
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open library directory {}", self.root.display())
                });
            }
        }

        word_lists.sort();

        Ok(SourceManifest {
            word_lists,
            specials: SPECIALS_FILE.to_string(),
            numbers: NUMBERS_FILE.to_string(),
        })
    }
}

impl SourceReader for DirectorySource {
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let path = self.root.join(id);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{LoadWarning, VocabularyCollection};
    use sha2::{Digest, Sha256};

    const EXPECTED_SHA256: &[(&str, &str)] = &[
        (
            "english_words_clean.txt",
            "f0a68fdde0cf4d907e397e2d895889d3a52497cd4d63496a65063693d7ebe185",
        ),
        (
            "german_words_clean.txt",
            "1e6966c16b828c0e5f7fad848533902a57956a31cfa228840608ac5225f3fb28",
        ),
        (
            "special_characters.txt",
            "e68b99af38b52e3d8be9c2c0d429e35e26de14cb62c9ed865d42fe6d059f4dc2",
        ),
        (
            "numbers.txt",
            "7427877c40fb0361401248f9c96abe6117396bc6ab16811b5b1706274c02443e",
        ),
    ];

    #[test]
    fn test_bundled_sha256() {
        for (name, expected) in EXPECTED_SHA256 {
            let bytes = BundledSource
                .read(name)
                .unwrap()
                .unwrap_or_else(|| panic!("{} not bundled", name));

            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            let result = format!("{:x}", hasher.finalize());

            assert_eq!(
                &result, expected,
                "{} SHA-256 mismatch; file may be corrupted",
                name
            );
        }
    }

    #[test]
    fn test_bundled_manifest() {
        let manifest = BundledSource.manifest();
        assert_eq!(
            manifest.word_lists,
            vec!["english_words_clean.txt", "german_words_clean.txt"]
        );
        assert_eq!(manifest.specials, SPECIALS_FILE);
        assert_eq!(manifest.numbers, NUMBERS_FILE);
    }

    #[test]
    fn test_bundled_collection() {
        let (vocab, warnings) =
            VocabularyCollection::load(&BundledSource, &BundledSource.manifest());

        assert!(warnings.is_empty(), "Unexpected warnings: {:?}", warnings);
        assert_eq!(vocab.word_lists().len(), 2);
        assert_eq!(vocab.word_lists()[0].len(), 531);
        assert_eq!(vocab.word_lists()[1].len(), 271);
        assert_eq!(vocab.specials().len(), 16);
        assert_eq!(vocab.numbers().len(), 10);
    }

    #[test]
    fn test_bundled_word_integrity() {
        let (vocab, _) = VocabularyCollection::load(&BundledSource, &BundledSource.manifest());
        let english = &vocab.word_lists()[0];
        let german = &vocab.word_lists()[1];

        assert_eq!(english.get(0), Some("able"));
        assert_eq!(english.get(530), Some("zone"));
        assert_eq!(english.get(367), Some("raven"));
        assert_eq!(german.get(0), Some("abend"));
        assert_eq!(german.get(270), Some("würfel"));

        for (i, word) in english.tokens().iter().enumerate() {
            assert!(
                word.chars().all(|c| c.is_ascii_lowercase()),
                "English word at index {} (\"{}\") contains invalid characters",
                i,
                word
            );
        }

        for set in vocab.word_lists() {
            let unique: std::collections::HashSet<_> = set.tokens().iter().collect();
            assert_eq!(unique.len(), set.len(), "Word list contains duplicates");
        }
    }

    #[test]
    fn test_directory_discovery_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zulu_words_clean.txt"), "zebra\n").unwrap();
        fs::write(dir.path().join("alpha_words_clean.txt"), "aardvark\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();
        fs::create_dir(dir.path().join("nested_words_clean.txt")).unwrap();

        let source = DirectorySource::new(dir.path());
        let manifest = source.manifest().unwrap();

        assert_eq!(
            manifest.word_lists,
            vec!["alpha_words_clean.txt", "zulu_words_clean.txt"]
        );
    }

    #[test]
    fn test_directory_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en_words_clean.txt"), "apple\r\nberry\r\n").unwrap();
        fs::write(dir.path().join(SPECIALS_FILE), "!\n@\n").unwrap();
        fs::write(dir.path().join(NUMBERS_FILE), b"1\n\xff2\n").unwrap();

        let source = DirectorySource::new(dir.path());
        let manifest = source.manifest().unwrap();
        let (vocab, warnings) = VocabularyCollection::load(&source, &manifest);

        assert!(warnings.is_empty(), "Unexpected warnings: {:?}", warnings);
        assert_eq!(vocab.word_lists()[0].tokens(), &["apple", "berry"]);
        assert_eq!(vocab.numbers().tokens(), &["1", "2"]);
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("absent"));

        let manifest = source.manifest().unwrap();
        assert!(manifest.word_lists.is_empty());

        let (vocab, warnings) = VocabularyCollection::load(&source, &manifest);
        assert!(vocab.is_fallback_words());
        assert!(vocab.is_fallback_specials());
        assert!(vocab.is_fallback_numbers());
        assert!(warnings.contains(&LoadWarning::NoWordLists));
    }

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        assert!(source.read("numbers.txt").unwrap().is_none());
    }
}
