//! Traditional/simplified character mapping.
//!
//! The map is loaded once from the `traditional=simplified` record table
//! and never mutated; both directions are kept so conversion is a plain
//! per-character lookup with unmapped characters passed through.

use std::collections::HashMap;

use crate::dict::{self, DictError};

pub struct ChineseMap {
    to_simp: HashMap<char, char>,
    to_trad: HashMap<char, char>,
}

impl ChineseMap {
    /// Build from `(traditional, simplified)` record pairs. Records
    /// whose key or value is not exactly one character are rejected.
    pub fn from_records(records: &[(String, String)]) -> Result<Self, DictError> {
        let mut to_simp = HashMap::with_capacity(records.len());
        let mut to_trad = HashMap::with_capacity(records.len());
        for (idx, (key, value)) in records.iter().enumerate() {
            let (trad, simp) = match (single_char(key), single_char(value)) {
                (Some(t), Some(s)) => (t, s),
                _ => {
                    return Err(DictError::Parse {
                        line: idx + 1,
                        text: format!("{key}={value}"),
                    })
                }
            };
            to_simp.insert(trad, simp);
            to_trad.insert(simp, trad);
        }
        Ok(Self { to_simp, to_trad })
    }

    /// The embedded default map.
    pub fn new() -> Self {
        let records = dict::parse_records(dict::DEFAULT_CHINESE_DICT)
            .expect("embedded chinese.dict must be well-formed");
        Self::from_records(&records).expect("embedded chinese.dict must be well-formed")
    }

    pub fn simplify_char(&self, c: char) -> char {
        self.to_simp.get(&c).copied().unwrap_or(c)
    }

    pub fn traditionalize_char(&self, c: char) -> char {
        self.to_trad.get(&c).copied().unwrap_or(c)
    }

    pub fn to_simplified(&self, s: &str) -> String {
        s.chars().map(|c| self.simplify_char(c)).collect()
    }

    pub fn to_traditional(&self, s: &str) -> String {
        s.chars().map(|c| self.traditionalize_char(c)).collect()
    }

    /// True if the character has a traditional-map entry, i.e. it is a
    /// traditional form with a distinct simplified counterpart.
    pub fn is_traditional(&self, c: char) -> bool {
        self.to_simp.contains_key(&c)
    }
}

impl Default for ChineseMap {
    fn default() -> Self {
        Self::new()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
