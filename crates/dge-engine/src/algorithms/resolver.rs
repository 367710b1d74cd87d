//! # Name Resolver
//!
//! Canonicalization index over every identifier the project knows:
//! each canonical name maps to itself, each alias maps to its owning
//! canonical name. Built once per project load, read-only afterwards.

use std::collections::HashMap;

use super::trie::PrefixIndex;

/// Maps any known identifier to its canonical form and supports prefix
/// search for interactive autocomplete.
///
/// Alias uniqueness is a caller contract: when the same alias string is
/// claimed by two canonical names, the one inserted last wins.
#[derive(Clone, Debug, Default)]
pub struct NameResolver {
    index: PrefixIndex,
}

impl NameResolver {
    /// Build the index from canonical names plus the alias table.
    pub fn build(canonical_names: &[String], aliases: &HashMap<String, Vec<String>>) -> Self {
        let mut index = PrefixIndex::new();
        for name in canonical_names {
            index.insert(name, name.clone());
        }
        for (canonical, alias_list) in aliases {
            for alias in alias_list {
                index.insert(alias, canonical.clone());
            }
        }
        Self { index }
    }

    /// Exact-match lookup of the canonical form of `query`.
    ///
    /// Idempotent: resolving an already-canonical name returns itself.
    pub fn canonical_label(&self, query: &str) -> Option<&str> {
        self.index.get(query)
    }

    /// Canonical form of `raw`, or `raw` itself when unknown.
    ///
    /// Comparison rows with identifiers outside the index are kept
    /// under their literal identifier rather than dropped.
    pub fn resolve_or_fallback(&self, raw: &str) -> String {
        match self.index.get(raw) {
            Some(canonical) => canonical.to_string(),
            None => raw.to_string(),
        }
    }

    /// Canonical names whose indexed identifiers start with `prefix`,
    /// deduplicated in trie match order.
    pub fn search(&self, prefix: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for value in self.index.scan(prefix) {
            if !seen.iter().any(|s| s == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }

    /// Number of indexed identifiers (canonical names plus aliases).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
