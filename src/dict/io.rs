//! Compiled binary snapshot of the pronunciation tables.
//!
//! Layout: 4-byte magic, 1-byte version, bincode body. The body carries
//! both tables in sorted order plus the trie already built over the word
//! keys, so opening a snapshot needs no rebuild.

use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use serde::{Deserialize, Serialize};

use super::DictError;
use crate::trie::DoubleArray;

const MAGIC: &[u8; 4] = b"PYDC";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5;

/// The serialized form of an engine's tables.
#[derive(Serialize, Deserialize)]
pub struct CompiledTables {
    /// Single-character table, sorted by character for a stable output.
    pub chars: Vec<(char, String)>,
    /// Word table in code-point order, ranks matching the trie.
    pub words: Vec<(String, String)>,
    /// Trie built over the word keys.
    pub trie: DoubleArray,
}

impl CompiledTables {
    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let body = bincode::serialize(self).map_err(DictError::Serialize)?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        bincode::deserialize(&data[HEADER_SIZE..]).map_err(DictError::Deserialize)
    }

    /// Open a snapshot file, using mmap to avoid doubling peak memory.
    ///
    /// The tables are deserialized from the mapped region, then the
    /// mapping is dropped.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is
        // immutable. The Mmap is dropped after deserialization completes.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompiledTables {
        let words = vec![
            ("世界".to_string(), "shì,jiè".to_string()),
            ("你好".to_string(), "nǐ,hǎo".to_string()),
        ];
        let keys: Vec<String> = words.iter().map(|(w, _)| w.clone()).collect();
        CompiledTables {
            chars: vec![('一', "yī".to_string()), ('为', "wèi,wéi".to_string())],
            words,
            trie: DoubleArray::build(&keys),
        }
    }

    #[test]
    fn test_roundtrip() {
        let tables = sample();
        let bytes = tables.to_bytes().unwrap();
        let tables2 = CompiledTables::from_bytes(&bytes).unwrap();
        assert_eq!(tables2.chars.len(), 2);
        assert_eq!(tables2.words, tables.words);
        assert_eq!(
            tables2.trie.common_prefix_search("你好"),
            tables.trie.common_prefix_search("你好")
        );
    }

    #[test]
    fn test_invalid_magic() {
        let result = CompiledTables::from_bytes(b"XXXX\x01data");
        assert!(matches!(result, Err(DictError::InvalidMagic)));
    }

    #[test]
    fn test_header_too_short() {
        let result = CompiledTables::from_bytes(b"PYD");
        assert!(matches!(result, Err(DictError::InvalidHeader)));
    }

    #[test]
    fn test_unsupported_version() {
        let result = CompiledTables::from_bytes(b"PYDC\x99body");
        assert!(matches!(result, Err(DictError::UnsupportedVersion(0x99))));
    }

    #[test]
    fn test_save_and_open() {
        let tables = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.pydc");
        tables.save(&path).unwrap();

        let tables2 = CompiledTables::open(&path).unwrap();
        assert_eq!(tables2.words, tables.words);
        assert!(tables2.trie.contains("世界"));
    }
}
