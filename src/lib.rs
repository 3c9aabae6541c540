//! Chinese-to-pinyin conversion.
//!
//! Text is segmented left-to-right with greedy longest match against a
//! word vocabulary held in a double-array trie; characters not covered
//! by a word fall back to the primary reading from a single-character
//! table. Syllables are stored in diacritic-mark notation and converted
//! to the other notations on output.

pub mod chinese;
pub mod dict;
pub mod engine;
pub mod tone;
pub mod trie;
pub mod unicode;

pub use engine::{ConvertError, PinyinEngine};
pub use tone::PinyinFormat;
