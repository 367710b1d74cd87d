//! # Outbound Ports
//!
//! Dependencies the engine requires its host to implement: resource
//! retrieval, per-treatment abundance measurements, and client-local
//! persistent storage. In-memory adapters for tests live alongside the
//! traits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::EngineError;

/// Result of fetching a single resource location.
///
/// The engine only needs to distinguish "exists, here is the text" from
/// "does not exist"; adapters report transport failures as `Absent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The resource exists; `body` is its raw text content.
    Found {
        /// Raw text content of the resource.
        body: String,
    },
    /// The resource does not exist (or could not be retrieved).
    Absent,
}

impl FetchOutcome {
    /// Wrap a body in a `Found` outcome.
    pub fn found(body: impl Into<String>) -> Self {
        FetchOutcome::Found { body: body.into() }
    }

    /// Whether the resource exists.
    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found { .. })
    }
}

/// Resource retrieval - outbound port.
#[async_trait]
pub trait ResourceRetriever: Send + Sync {
    /// Retrieve the resource at `location`.
    async fn fetch(&self, location: &str) -> FetchOutcome;
}

/// Per-treatment, per-transcript replicate abundances - outbound port.
pub trait AbundanceStore: Send + Sync {
    /// Replicate abundance series for `(treatment, canonical name)`,
    /// or `None` when the project carries no measurements for the pair.
    fn abundances(&self, treatment_key: &str, transcript: &str) -> Option<Vec<f64>>;
}

/// Persistent client-local storage - outbound port.
///
/// Used to persist the watched/saved-transcript set across sessions,
/// keyed by project identity.
pub trait PersistentStore: Send + Sync {
    /// Read a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), EngineError>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production adapters live in the host application; the in-memory
// implementations below back the unit and integration tests.
// =============================================================================

/// In-memory resource map with per-location call counting.
#[derive(Default)]
pub struct StaticResourceRetriever {
    resources: HashMap<String, String>,
    fetches: AtomicUsize,
    per_location: Mutex<HashMap<String, usize>>,
}

impl StaticResourceRetriever {
    /// Create an empty retriever; every fetch is `Absent`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource body under a location.
    pub fn with_resource(mut self, location: impl Into<String>, body: impl Into<String>) -> Self {
        self.resources.insert(location.into(), body.into());
        self
    }

    /// Total number of fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of fetches issued against one location.
    pub fn fetch_count_for(&self, location: &str) -> usize {
        self.per_location
            .lock()
            .expect("fetch counter lock poisoned")
            .get(location)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ResourceRetriever for StaticResourceRetriever {
    async fn fetch(&self, location: &str) -> FetchOutcome {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self
            .per_location
            .lock()
            .expect("fetch counter lock poisoned")
            .entry(location.to_string())
            .or_insert(0) += 1;
        match self.resources.get(location) {
            Some(body) => FetchOutcome::found(body.clone()),
            None => FetchOutcome::Absent,
        }
    }
}

/// In-memory abundance table keyed by `(treatment, transcript)`.
#[derive(Default)]
pub struct InMemoryAbundanceStore {
    values: HashMap<(String, String), Vec<f64>>,
}

impl InMemoryAbundanceStore {
    /// Create an empty store; every lookup is `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a replicate series.
    pub fn with_series(
        mut self,
        treatment_key: impl Into<String>,
        transcript: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        self.values
            .insert((treatment_key.into(), transcript.into()), values);
        self
    }
}

impl AbundanceStore for InMemoryAbundanceStore {
    fn abundances(&self, treatment_key: &str, transcript: &str) -> Option<Vec<f64>> {
        self.values
            .get(&(treatment_key.to_string(), transcript.to_string()))
            .cloned()
    }
}

/// In-memory key-value storage standing in for the browser's
/// client-local store.
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        self.data
            .lock()
            .map_err(|e| EngineError::Storage {
                message: e.to_string(),
            })?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
