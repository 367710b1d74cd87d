//! # Inbound Ports
//!
//! API trait defining what the comparison engine offers the view layer.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{
    BrushedArea, EngineError, ImportReport, PairwiseComparison, ProjectManifest, SortOrder,
    SortPath, TranscriptRecord, TreatmentKey,
};

/// Comparison engine API - inbound port.
///
/// One controller object owns all mutable state (cache, view,
/// selection); the view layer drives it exclusively through this trait.
#[async_trait]
pub trait ComparisonEngineApi: Send + Sync {
    /// Load a project, replacing any previous session.
    ///
    /// Builds the name-resolution index, restores the persisted
    /// saved-transcript set, and invalidates the comparison cache.
    async fn load_project(&self, manifest: ProjectManifest) -> Result<(), EngineError>;

    /// Load (or return from cache) the comparison for an ordered
    /// treatment pair, with directional sign correction.
    async fn set_pairwise_comparison(
        &self,
        treatment_a_key: &str,
        treatment_b_key: &str,
    ) -> Result<Arc<PairwiseComparison>, EngineError>;

    /// The first two treatments in manifest order.
    async fn default_comparison(&self) -> Result<(TreatmentKey, TreatmentKey), EngineError>;

    /// Re-sort the active comparison. `None` keeps the current value
    /// for that argument. Returns the new globally sorted sequence.
    async fn update_sort(
        &self,
        sort_path: Option<SortPath>,
        order: Option<SortOrder>,
    ) -> Result<Vec<TranscriptRecord>, EngineError>;

    /// Recompute and return the displayed sequence for the current
    /// selection state.
    async fn update_displayed(&self) -> Result<Vec<TranscriptRecord>, EngineError>;

    /// Replace the saved/watched set and persist it.
    async fn set_saved_transcripts(&self, names: Vec<String>) -> Result<(), EngineError>;

    /// Merge a tab-separated saved-transcript table into the saved set.
    async fn import_saved_transcripts(&self, text: &str) -> Result<ImportReport, EngineError>;

    /// Serialize the displayed sequence as a tab-separated table.
    async fn export_displayed_transcripts(&self) -> Result<String, EngineError>;

    /// Set the p-value threshold used by brushed filtering.
    async fn set_p_value_threshold(&self, threshold: f64) -> Result<(), EngineError>;

    /// Set or clear the brushed plot region.
    async fn set_brushed_area(&self, area: Option<BrushedArea>) -> Result<(), EngineError>;

    /// Set or clear the hovered-bin membership.
    async fn set_hovered_bin_transcripts(
        &self,
        names: Option<HashSet<String>>,
    ) -> Result<(), EngineError>;

    /// Set or clear the selected-bin membership.
    async fn set_selected_bin_transcripts(
        &self,
        names: Option<HashSet<String>>,
    ) -> Result<(), EngineError>;

    /// Prefix search over every known identifier, for autocomplete.
    async fn search_transcripts(&self, prefix: &str) -> Result<Vec<String>, EngineError>;
}
