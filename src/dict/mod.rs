//! Pronunciation tables: text record parsing, embedded defaults, and the
//! compiled binary snapshot.
//!
//! The text format is one `key=value` record per line. The key is a
//! single character or a multi-character word; the value is the
//! comma-joined syllable list in diacritic notation (or, for the
//! traditional map, the simplified form). Values are stored verbatim:
//! the ordering of a polyphonic character's candidates is authored in
//! the dictionary and must survive loading untouched.

mod io;

pub use io::CompiledTables;

use std::collections::{BTreeMap, HashMap};
use std::io::Error as IoError;

/// Single-character pronunciations, primary reading first.
pub type CharTable = HashMap<char, String>;

/// Multi-character word pronunciations. `BTreeMap` keeps the keys in
/// code-point order, which the trie builder requires.
pub type WordTable = BTreeMap<String, String>;

/// Embedded default tables, compiled into the library so an engine can
/// be constructed without touching the filesystem.
pub(crate) const DEFAULT_CHAR_DICT: &str = include_str!("../../data/pinyin.dict");
pub(crate) const DEFAULT_WORD_DICT: &str = include_str!("../../data/word_pinyin.dict");
pub(crate) const DEFAULT_CHINESE_DICT: &str = include_str!("../../data/chinese.dict");

/// Errors from dictionary loading and the compiled-snapshot format.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("malformed record on line {line}: {text:?}")]
    Parse { line: usize, text: String },

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected PYDC)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}

/// Parse `key=value` records. Blank lines are skipped; a line without a
/// separator or with an empty key is an error carrying its line number.
pub fn parse_records(text: &str) -> Result<Vec<(String, String)>, DictError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(DictError::Parse {
                line: idx + 1,
                text: line.to_string(),
            });
        };
        if key.is_empty() {
            return Err(DictError::Parse {
                line: idx + 1,
                text: line.to_string(),
            });
        }
        records.push((key.to_string(), value.to_string()));
    }
    Ok(records)
}

/// Parse a single-character table. Every key must be exactly one
/// character.
pub fn parse_char_table(text: &str) -> Result<CharTable, DictError> {
    let mut table = CharTable::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = line.split_once('=').and_then(|(key, value)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some((c, value)),
                _ => None,
            }
        });
        let Some((c, value)) = parsed else {
            return Err(DictError::Parse {
                line: idx + 1,
                text: line.to_string(),
            });
        };
        table.insert(c, value.to_string());
    }
    Ok(table)
}

/// Parse a multi-character word table into code-point order.
pub fn parse_word_table(text: &str) -> Result<WordTable, DictError> {
    Ok(parse_records(text)?.into_iter().collect())
}
