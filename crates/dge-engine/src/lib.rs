//! # DGE Engine
//!
//! Data engine for interactive differential gene expression exploration.
//!
//! A project carries a set of treatments and the transcript identifiers
//! measured across them. The engine loads pairwise comparison tables on
//! demand, canonicalizes transcript identifiers through an alias-aware
//! prefix index, caches each ordered treatment pair, and maintains the
//! sorted and displayed record sequences the view layer renders.
//!
//! ## Module Structure
//!
//! ```text
//! dge-engine/
//! ├── domain/          # Core types: records, comparisons, selection state, errors
//! ├── algorithms/      # Name resolution, table parsing, sorting and filtering
//! ├── ports/           # API trait (inbound) + collaborator traits (outbound)
//! ├── application/     # ComparisonService orchestrating everything
//! └── config.rs        # EngineConfig
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dge_engine::{
//!     ComparisonEngineApi, ComparisonService, EngineConfig, ProjectManifest,
//! };
//! use dge_engine::ports::{InMemoryAbundanceStore, InMemoryStore, StaticResourceRetriever};
//!
//! # async fn run() -> Result<(), dge_engine::EngineError> {
//! let service = ComparisonService::new(
//!     EngineConfig::default(),
//!     Arc::new(StaticResourceRetriever::new()),
//!     Arc::new(InMemoryAbundanceStore::new()),
//!     Arc::new(InMemoryStore::new()),
//! );
//! service.load_project(ProjectManifest::new("demo")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{
    alpha_sort, displayed_records, mean, median, parse_comparison_table, sorted_records,
    NameResolver, PrefixIndex,
};
pub use application::ComparisonService;
pub use config::EngineConfig;
pub use domain::{
    BrushedArea, EngineError, ImportReport, PairwiseComparison, ProjectManifest, SelectionState,
    SortOrder, SortPath, TranscriptRecord, Treatment, TreatmentKey,
    DEFAULT_MIN_P_VALUE, DEFAULT_PAIRWISE_TEMPLATE, DEFAULT_P_VALUE_THRESHOLD,
};
pub use ports::{
    AbundanceStore, ComparisonEngineApi, FetchOutcome, PersistentStore, ResourceRetriever,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
