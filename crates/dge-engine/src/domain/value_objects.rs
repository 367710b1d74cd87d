//! # Domain Value Objects
//!
//! Immutable value types: sort descriptors, the brushed plot region,
//! transient selection state, and the import report.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::entities::TranscriptName;
use super::invariants::DEFAULT_P_VALUE_THRESHOLD;

/// Field a transcript table can be sorted on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortPath {
    /// Canonical name, compared case-insensitively.
    Name,
    /// Significance.
    PValue,
    /// Log fold-change.
    LogFc,
    /// Log average abundance.
    LogAta,
    /// Treatment A mean abundance.
    TreatmentAAbundanceMean,
    /// Treatment A median abundance.
    TreatmentAAbundanceMedian,
    /// Treatment B mean abundance.
    TreatmentBAbundanceMean,
    /// Treatment B median abundance.
    TreatmentBAbundanceMedian,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// User-drawn rectangle in (logATA, logFC) space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BrushedArea {
    /// Lower abundance bound.
    pub min_log_ata: f64,
    /// Upper abundance bound.
    pub max_log_ata: f64,
    /// Lower fold-change bound.
    pub min_log_fc: f64,
    /// Upper fold-change bound.
    pub max_log_fc: f64,
}

impl BrushedArea {
    /// Build a region from its four bounds.
    pub fn new(min_log_ata: f64, max_log_ata: f64, min_log_fc: f64, max_log_fc: f64) -> Self {
        Self {
            min_log_ata,
            max_log_ata,
            min_log_fc,
            max_log_fc,
        }
    }
}

/// Transient UI selection state read by the sort/filter pipeline.
///
/// Mutated only through the explicit view-layer setters; the pipeline
/// treats it as read-only input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionState {
    /// Records with a p-value above this are excluded from brushed filtering.
    pub p_value_threshold: f64,
    /// Active brushed plot region, if any.
    pub brushed_area: Option<BrushedArea>,
    /// Watched transcripts, persisted across sessions.
    pub saved_transcripts: BTreeSet<TranscriptName>,
    /// Members of the plot bin currently under the cursor.
    pub hovered_bin_transcripts: Option<HashSet<TranscriptName>>,
    /// Members of the clicked plot bin.
    pub selected_bin_transcripts: Option<HashSet<TranscriptName>>,
    /// Active sort field.
    pub sort_path: SortPath,
    /// Active sort direction.
    pub order: SortOrder,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            p_value_threshold: DEFAULT_P_VALUE_THRESHOLD,
            brushed_area: None,
            saved_transcripts: BTreeSet::new(),
            hovered_bin_transcripts: None,
            selected_bin_transcripts: None,
            sort_path: SortPath::PValue,
            order: SortOrder::Asc,
        }
    }
}

/// Outcome of importing a saved-transcript table.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportReport {
    /// `(as written in the file, canonical name)` for each resolved row.
    pub imported: Vec<(String, TranscriptName)>,
    /// Identifiers that resolved to nothing and were not imported.
    pub skipped: Vec<String>,
}
