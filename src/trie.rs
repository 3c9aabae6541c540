//! Double-array trie over a sorted word vocabulary.
//!
//! Parallel `base`/`check` arrays give O(1) per-character state
//! transitions. Word ends are zero-code leaf cells whose base stores the
//! negated rank of the vocabulary entry, so a prefix walk recovers entry
//! indices without a separate values table.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Transition code for a character. Code 0 is reserved for word ends.
fn code(c: char) -> usize {
    c as usize + 1
}

/// An immutable double-array trie. State 0 is the root; the arrays are
/// never mutated after [`DoubleArray::build`] returns, so a built trie is
/// safe to share across reader threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleArray {
    base: Vec<i32>,
    check: Vec<i32>,
}

impl Default for DoubleArray {
    /// The empty trie, matching nothing.
    fn default() -> Self {
        Self {
            base: vec![1, 0],
            check: vec![0, 0],
        }
    }
}

impl DoubleArray {
    /// Build a trie from a sorted, deduplicated word list.
    ///
    /// Ordering and dedup are the caller's responsibility; the builder
    /// itself has no failure path. An empty list yields a valid trie
    /// matching nothing.
    pub fn build(words: &[String]) -> Self {
        let keys: Vec<Vec<char>> = words.iter().map(|w| w.chars().collect()).collect();
        let mut builder = Builder::new(&keys);
        builder.base[0] = 1;
        if !keys.is_empty() {
            let root = Node {
                code: 0,
                depth: 0,
                left: 0,
                right: keys.len(),
            };
            let mut siblings = Vec::new();
            builder.fetch(&root, &mut siblings);
            let begin = builder.place(&siblings);
            builder.base[0] = begin as i32;
        }

        let size = builder.size.max(2);
        builder.base.truncate(size);
        builder.check.truncate(size);
        debug!(words = words.len(), states = size, "double-array trie built");
        Self {
            base: builder.base,
            check: builder.check,
        }
    }

    /// Ranks of every vocabulary word that is a prefix of `text`,
    /// shortest first. The walk starts at the beginning of `text`
    /// (callers pass the remaining slice) and stops at the first dead
    /// end. The last element of a non-empty result is always the longest
    /// match.
    pub fn common_prefix_search(&self, text: &str) -> Vec<usize> {
        let mut out = Vec::new();
        let mut b = self.base[0];
        for c in text.chars() {
            if let Some(rank) = self.leaf_rank(b) {
                out.push(rank);
            }
            let p = b as usize + code(c);
            if p < self.check.len() && self.check[p] == b {
                b = self.base[p];
            } else {
                return out;
            }
        }
        if let Some(rank) = self.leaf_rank(b) {
            out.push(rank);
        }
        out
    }

    /// True if `word` is in the vocabulary.
    pub fn contains(&self, word: &str) -> bool {
        let mut b = self.base[0];
        for c in word.chars() {
            let p = b as usize + code(c);
            if p < self.check.len() && self.check[p] == b {
                b = self.base[p];
            } else {
                return false;
            }
        }
        self.leaf_rank(b).is_some()
    }

    /// Reset to the empty trie. [`DoubleArray::build`] reconstructs
    /// from scratch after a vocabulary change.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of array cells, for diagnostics.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// True if the trie matches nothing.
    pub fn is_empty(&self) -> bool {
        // A populated trie always places at least the root's children.
        self.base.len() <= 2
    }

    /// Rank stored on the zero-code leaf under the state whose base is
    /// `b`, if that state ends a word.
    fn leaf_rank(&self, b: i32) -> Option<usize> {
        let p = b as usize;
        if p < self.check.len() && self.check[p] == b && self.base[p] < 0 {
            Some((-self.base[p] - 1) as usize)
        } else {
            None
        }
    }
}

/// One batch member during construction: the subtree of keys
/// `left..right` that share a parent state and continue with `code`.
struct Node {
    code: usize,
    depth: usize,
    left: usize,
    right: usize,
}

struct Builder<'a> {
    keys: &'a [Vec<char>],
    base: Vec<i32>,
    check: Vec<i32>,
    used: Vec<bool>,
    size: usize,
    next_check_pos: usize,
}

impl<'a> Builder<'a> {
    fn new(keys: &'a [Vec<char>]) -> Self {
        Self {
            keys,
            base: vec![0; 512],
            check: vec![0; 512],
            used: vec![false; 512],
            size: 1,
            next_check_pos: 0,
        }
    }

    fn ensure(&mut self, len: usize) {
        if self.base.len() < len {
            self.base.resize(len, 0);
            self.check.resize(len, 0);
            self.used.resize(len, false);
        }
    }

    /// Collect the sibling batch under `parent`: one node per distinct
    /// continuation code in `parent.left..parent.right`, in code order.
    /// Keys ending exactly at `parent.depth` contribute the reserved
    /// code 0.
    fn fetch(&self, parent: &Node, siblings: &mut Vec<Node>) {
        let mut prev = 0usize;
        for i in parent.left..parent.right {
            let key = &self.keys[i];
            if key.len() < parent.depth {
                continue;
            }
            let cur = if key.len() > parent.depth {
                code(key[parent.depth])
            } else {
                0
            };
            debug_assert!(prev <= cur, "vocabulary must be sorted and deduplicated");
            if cur != prev || siblings.is_empty() {
                if let Some(last) = siblings.last_mut() {
                    last.right = i;
                }
                siblings.push(Node {
                    code: cur,
                    depth: parent.depth + 1,
                    left: i,
                    right: parent.right,
                });
            }
            prev = cur;
        }
    }

    /// Place a sibling batch at the smallest base offset where every
    /// child cell is free and the offset has not served as a base yet,
    /// then recurse into each child's subtree. Cells taken by previously
    /// placed subtrees are skipped, never disturbed. Returns the chosen
    /// base.
    fn place(&mut self, siblings: &[Node]) -> usize {
        let first_code = siblings[0].code;
        let last_code = siblings[siblings.len() - 1].code;

        let mut pos = self.next_check_pos.max(first_code + 1) - 1;
        let mut nonzero = 0usize;
        let mut first_free_seen = false;
        let begin = loop {
            pos += 1;
            self.ensure(pos + 1);
            if self.check[pos] != 0 {
                nonzero += 1;
                continue;
            }
            if !first_free_seen {
                self.next_check_pos = pos;
                first_free_seen = true;
            }
            let begin = pos - first_code;
            self.ensure(begin + last_code + 1);
            if self.used[begin] {
                continue;
            }
            if siblings.iter().all(|s| self.check[begin + s.code] == 0) {
                break begin;
            }
        };

        // If the scanned stretch is almost entirely occupied, start
        // future scans after it instead of rescanning the same cells.
        if nonzero as f64 / (pos - self.next_check_pos + 1) as f64 >= 0.95 {
            self.next_check_pos = pos;
        }

        self.used[begin] = true;
        self.size = self.size.max(begin + last_code + 1);
        for s in siblings {
            self.check[begin + s.code] = begin as i32;
        }
        for s in siblings {
            let mut children = Vec::new();
            self.fetch(s, &mut children);
            if children.is_empty() {
                // Word end: the leaf records the vocabulary rank.
                self.base[begin + s.code] = -(s.left as i32) - 1;
            } else {
                let child_base = self.place(&children);
                self.base[begin + s.code] = child_base as i32;
            }
        }
        begin
    }
}
