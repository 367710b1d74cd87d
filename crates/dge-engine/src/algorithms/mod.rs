//! # Algorithms Module
//!
//! Pure building blocks of the engine: the identifier trie, canonical
//! name resolution, comparison table parsing, and the sort/filter
//! pipeline.

pub mod parse;
pub mod resolver;
pub mod sort_filter;
pub mod trie;

pub use parse::{mean, median, parse_comparison_table};
pub use resolver::NameResolver;
pub use sort_filter::{alpha_sort, displayed_records, sorted_records};
pub use trie::PrefixIndex;
