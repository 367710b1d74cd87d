//! # Prefix Index
//!
//! A plain character trie over identifier strings. Exact lookup and
//! prefix scan are the only operations the engine needs; keys map to
//! the canonical name that owns them.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Canonical name owning the identifier that ends at this node.
    value: Option<String>,
}

/// Trie mapping identifier strings to owned values.
///
/// Inserting the same key twice replaces the value: last insert wins.
#[derive(Clone, Debug, Default)]
pub struct PrefixIndex {
    root: TrieNode,
    len: usize,
}

impl PrefixIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key` mapping to `value`, replacing any previous mapping.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let mut node = &mut self.root;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }
        if node.value.is_none() {
            self.len += 1;
        }
        node.value = Some(value.into());
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = &self.root;
        for ch in key.chars() {
            node = node.children.get(&ch)?;
        }
        node.value.as_deref()
    }

    /// Values of every key starting with `prefix`, in key order.
    ///
    /// Values repeat when several matching keys map to the same one;
    /// callers that want canonical names deduplicate on top.
    pub fn scan(&self, prefix: &str) -> Vec<&str> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            match node.children.get(&ch) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        collect(node, &mut out);
        out
    }
}

fn collect<'a>(node: &'a TrieNode, out: &mut Vec<&'a str>) {
    if let Some(value) = node.value.as_deref() {
        out.push(value);
    }
    for child in node.children.values() {
        collect(child, out);
    }
}
