//! # Domain Errors
//!
//! Error taxonomy for the comparison engine.
//!
//! Hard failures abort the requested operation and surface to the
//! caller; partial-data conditions (malformed rows, unresolved
//! identifiers, missing abundance measurements) are deliberately *not*
//! errors and are handled inline by the loaders.

use thiserror::Error;

/// Comparison engine error types.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Requested treatment key is absent from the project's treatment table.
    #[error("No such treatment: {key}")]
    UnknownTreatment {
        /// The key that failed to resolve.
        key: String,
    },

    /// Neither directional comparison resource exists.
    #[error("Could not retrieve pairwise comparison from {url_a} or {url_b}")]
    ComparisonUnavailable {
        /// Forward candidate location.
        url_a: String,
        /// Reverse candidate location.
        url_b: String,
    },

    /// Operation requires a loaded project.
    #[error("No active view: load a project first")]
    NoActiveView,

    /// Operation requires a loaded pairwise comparison.
    #[error("No active comparison: load a pairwise comparison first")]
    NoActiveComparison,

    /// The project changed while a comparison load was in flight; the
    /// result was discarded rather than applied to the new session.
    #[error("Project changed while a comparison load was in flight")]
    StaleProject,

    /// `default_comparison` needs at least two treatments to pick from.
    #[error("Project defines {found} treatment(s); at least 2 are required")]
    NotEnoughTreatments {
        /// Number of treatments the manifest defines.
        found: usize,
    },

    /// Persistent client-local storage failure.
    #[error("Storage failure: {message}")]
    Storage {
        /// Adapter-provided description.
        message: String,
    },
}
