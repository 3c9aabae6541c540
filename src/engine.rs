//! The conversion engine: greedy longest-match segmentation over the
//! word trie with single-character fallback.
//!
//! `PinyinEngine` owns shared snapshots of its tables. Readers clone an
//! `Arc` to the current vocabulary snapshot and run against it
//! unlocked; vocabulary extension builds a replacement off to the side
//! and installs it with a single swap, so a rebuild never blocks or
//! tears a running transcription.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::{debug, debug_span};

use crate::chinese::ChineseMap;
use crate::dict::{self, CharTable, CompiledTables, DictError, WordTable};
use crate::tone::{format_pinyin, PinyinFormat};
use crate::trie::DoubleArray;
use crate::unicode;

/// A recognized ideograph with no pronunciation entry in any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert character '{0}' to pinyin")]
pub struct ConvertError(pub char);

/// Immutable view of the word vocabulary: rank-indexed parallel word and
/// reading lists plus the trie built over the words.
struct VocabSnapshot {
    words: Vec<String>,
    readings: Vec<String>,
    trie: DoubleArray,
}

impl VocabSnapshot {
    fn build(table: &WordTable) -> Self {
        let words: Vec<String> = table.keys().cloned().collect();
        let readings: Vec<String> = table.values().cloned().collect();
        let trie = DoubleArray::build(&words);
        Self {
            words,
            readings,
            trie,
        }
    }
}

pub struct PinyinEngine {
    chars: RwLock<CharTable>,
    /// Master copy of the word table. Its write lock serializes
    /// vocabulary extensions; readers only ever touch `snapshot`.
    words: RwLock<WordTable>,
    snapshot: RwLock<Arc<VocabSnapshot>>,
    chinese: ChineseMap,
}

impl PinyinEngine {
    /// Engine over the embedded default tables.
    pub fn new() -> Self {
        let chars = dict::parse_char_table(dict::DEFAULT_CHAR_DICT)
            .expect("embedded pinyin.dict must be well-formed");
        let words = dict::parse_word_table(dict::DEFAULT_WORD_DICT)
            .expect("embedded word_pinyin.dict must be well-formed");
        Self::from_tables(chars, words)
    }

    /// Engine over caller-supplied tables.
    pub fn from_tables(chars: CharTable, words: WordTable) -> Self {
        let snapshot = Arc::new(VocabSnapshot::build(&words));
        Self {
            chars: RwLock::new(chars),
            words: RwLock::new(words),
            snapshot: RwLock::new(snapshot),
            chinese: ChineseMap::new(),
        }
    }

    /// Open an engine from a compiled snapshot file.
    pub fn open_compiled(path: &Path) -> Result<Self, DictError> {
        let compiled = CompiledTables::open(path)?;
        let chars: CharTable = compiled.chars.into_iter().collect();
        let mut words = Vec::with_capacity(compiled.words.len());
        let mut readings = Vec::with_capacity(compiled.words.len());
        for (word, reading) in &compiled.words {
            words.push(word.clone());
            readings.push(reading.clone());
        }
        let snapshot = Arc::new(VocabSnapshot {
            words,
            readings,
            trie: compiled.trie,
        });
        Ok(Self {
            chars: RwLock::new(chars),
            words: RwLock::new(compiled.words.into_iter().collect()),
            snapshot: RwLock::new(snapshot),
            chinese: ChineseMap::new(),
        })
    }

    /// Write the current tables to a compiled snapshot file.
    pub fn save_compiled(&self, path: &Path) -> Result<(), DictError> {
        let mut chars: Vec<(char, String)> = {
            let table = self.chars.read().unwrap();
            table.iter().map(|(&c, p)| (c, p.clone())).collect()
        };
        chars.sort_by_key(|&(c, _)| c);
        let words: Vec<(String, String)> = {
            let table = self.words.read().unwrap();
            table.iter().map(|(w, p)| (w.clone(), p.clone())).collect()
        };
        let trie = self.snapshot.read().unwrap().trie.clone();
        CompiledTables { chars, words, trie }.save(path)
    }

    /// The traditional/simplified map the engine normalizes input with.
    pub fn chinese(&self) -> &ChineseMap {
        &self.chinese
    }

    /// Transcribe `text` to pinyin, joining emitted syllables with
    /// `separator`.
    ///
    /// Multi-character vocabulary words win over single-character
    /// readings, longest match first; an uncovered ideograph falls back
    /// to the primary reading from the single-character table; anything
    /// else is copied through as its own unit. Fails on an ideograph
    /// with no entry anywhere.
    pub fn transcribe(
        &self,
        text: &str,
        separator: &str,
        format: PinyinFormat,
    ) -> Result<String, ConvertError> {
        let text = self.chinese.to_simplified(text);
        let positions: Vec<(usize, char)> = text.char_indices().collect();
        let _span = debug_span!("transcribe", chars = positions.len()).entered();

        let snapshot = self.snapshot.read().unwrap().clone();
        let chars = self.chars.read().unwrap();

        let mut units: Vec<String> = Vec::new();
        let mut i = 0;
        while i < positions.len() {
            let (offset, c) = positions[i];
            let matches = snapshot.trie.common_prefix_search(&text[offset..]);
            if let Some(&rank) = matches.last() {
                units.extend(format_pinyin(&snapshot.readings[rank], format));
                i += snapshot.words[rank].chars().count();
            } else {
                if unicode::is_ideograph(c) {
                    let reading = chars.get(&c).ok_or(ConvertError(c))?;
                    let formatted = format_pinyin(reading, format);
                    match formatted.into_iter().next() {
                        Some(primary) => units.push(primary),
                        None => return Err(ConvertError(c)),
                    }
                } else {
                    units.push(c.to_string());
                }
                i += 1;
            }
        }
        Ok(units.join(separator))
    }

    /// First letters of each syllable for every contiguous ideograph
    /// run; other characters are copied through verbatim.
    pub fn short_form(&self, text: &str) -> Result<String, ConvertError> {
        let mut out = String::new();
        let mut run = String::new();
        for c in text.chars() {
            if unicode::is_ideograph(c) {
                run.push(c);
            } else {
                self.flush_short_run(&mut run, &mut out)?;
                out.push(c);
            }
        }
        self.flush_short_run(&mut run, &mut out)?;
        Ok(out)
    }

    fn flush_short_run(&self, run: &mut String, out: &mut String) -> Result<(), ConvertError> {
        if run.is_empty() {
            return Ok(());
        }
        // '#' cannot occur inside an ideograph run, so it is a safe
        // internal separator.
        let pinyin = self.transcribe(run, "#", PinyinFormat::WithoutTone)?;
        for syllable in pinyin.split('#') {
            if let Some(first) = syllable.chars().next() {
                out.push(first);
            }
        }
        run.clear();
        Ok(())
    }

    /// Candidate pronunciations of one character in the requested
    /// notation, primary reading first. Empty if the character has no
    /// entry.
    pub fn pronunciations_of(&self, c: char, format: PinyinFormat) -> Vec<String> {
        let chars = self.chars.read().unwrap();
        match chars.get(&c) {
            Some(reading) => format_pinyin(reading, format),
            None => Vec::new(),
        }
    }

    /// True iff the character has more than one candidate reading.
    pub fn is_polyphonic(&self, c: char) -> bool {
        self.pronunciations_of(c, PinyinFormat::WithToneMark).len() > 1
    }

    /// Merge single-character entries. Existing entries are replaced; no
    /// rebuild is needed.
    pub fn extend_char_table(&self, entries: impl IntoIterator<Item = (char, String)>) {
        self.chars.write().unwrap().extend(entries);
    }

    /// Merge multi-character entries, rebuild the trie off to the side,
    /// and install the new snapshot atomically. Concurrent readers keep
    /// the old snapshot until the swap.
    pub fn extend_vocabulary(&self, entries: impl IntoIterator<Item = (String, String)>) {
        let mut words = self.words.write().unwrap();
        words.extend(entries);
        let next = Arc::new(VocabSnapshot::build(&words));
        debug!(words = next.words.len(), "vocabulary rebuilt");
        *self.snapshot.write().unwrap() = next;
    }

    /// Load a single-character dictionary file and merge it.
    pub fn add_char_dict(&self, path: &Path) -> Result<(), DictError> {
        let text = fs::read_to_string(path)?;
        let table = dict::parse_char_table(&text)?;
        self.extend_char_table(table);
        Ok(())
    }

    /// Load a word dictionary file, merge it, and rebuild the trie.
    pub fn add_word_dict(&self, path: &Path) -> Result<(), DictError> {
        let text = fs::read_to_string(path)?;
        let table = dict::parse_word_table(&text)?;
        self.extend_vocabulary(table);
        Ok(())
    }
}

impl Default for PinyinEngine {
    fn default() -> Self {
        Self::new()
    }
}
