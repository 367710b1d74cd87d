//! # Domain Entities
//!
//! Core entities of the comparison engine: treatments, the project
//! manifest handed over by the bootstrap layer, per-transcript
//! differential-expression records, and the assembled pairwise
//! comparison.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Treatment table key.
pub type TreatmentKey = String;

/// Canonical transcript (or gene) name.
pub type TranscriptName = String;

/// A named experimental condition with one or more replicate samples.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Treatment {
    /// Identifier used throughout the engine and the UI.
    pub key: TreatmentKey,
    /// Human-readable display label.
    pub label: String,
    /// Ordered replicate sample identifiers.
    pub replicates: Vec<String>,
    /// Alternate key used in comparison filenames, when the files were
    /// produced under a different naming scheme than the treatment table.
    #[serde(default)]
    pub file_key: Option<String>,
}

impl Treatment {
    /// Create a treatment with no replicates and no file key.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            replicates: Vec::new(),
            file_key: None,
        }
    }

    /// Attach replicate identifiers.
    pub fn with_replicates(mut self, replicates: Vec<String>) -> Self {
        self.replicates = replicates;
        self
    }

    /// Attach an alternate comparison-filename key.
    pub fn with_file_key(mut self, file_key: impl Into<String>) -> Self {
        self.file_key = Some(file_key.into());
        self
    }

    /// Key substituted into the comparison location template.
    pub fn comparison_key(&self) -> &str {
        self.file_key.as_deref().unwrap_or(&self.key)
    }
}

/// Project description supplied by the manifest/bootstrap collaborator.
///
/// Treatments are kept as an ordered list: the manifest's own ordering
/// decides the default comparison pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Project identity; also keys the persisted saved-transcript set.
    pub id: String,
    /// Ordered treatment table.
    pub treatments: Vec<Treatment>,
    /// All canonical transcript names known to the project.
    pub transcript_names: Vec<TranscriptName>,
    /// Alias table: canonical name to the aliases that resolve to it.
    #[serde(default)]
    pub aliases: HashMap<TranscriptName, Vec<String>>,
    /// Location template for pairwise comparison resources, containing
    /// `%A`/`%B` placeholders. Falls back to the engine default.
    #[serde(default)]
    pub pairwise_template: Option<String>,
}

impl ProjectManifest {
    /// Create an empty manifest for the given project identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            treatments: Vec::new(),
            transcript_names: Vec::new(),
            aliases: HashMap::new(),
            pairwise_template: None,
        }
    }

    /// Look up a treatment by key.
    pub fn treatment(&self, key: &str) -> Option<&Treatment> {
        self.treatments.iter().find(|t| t.key == key)
    }
}

/// Statistical comparison result for one transcript between two treatments.
///
/// Numeric fields are `None` only in placeholder records for transcripts
/// that were never tested; a loaded row always carries `Some`, possibly
/// `Some(NaN)` when the source field was unparseable.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TranscriptRecord {
    /// Canonical transcript name (post alias resolution).
    pub name: TranscriptName,
    /// Significance of the differential expression.
    pub p_value: Option<f64>,
    /// Log fold-change of treatment A over treatment B.
    pub log_fc: Option<f64>,
    /// Log average abundance (the scatter plot's intensity axis).
    pub log_ata: Option<f64>,
    /// Mean replicate abundance under treatment A.
    pub treatment_a_abundance_mean: Option<f64>,
    /// Median replicate abundance under treatment A.
    pub treatment_a_abundance_median: Option<f64>,
    /// Mean replicate abundance under treatment B.
    pub treatment_b_abundance_mean: Option<f64>,
    /// Median replicate abundance under treatment B.
    pub treatment_b_abundance_median: Option<f64>,
}

impl TranscriptRecord {
    /// Placeholder for a listed transcript absent from the loaded
    /// comparison (never tested / no data).
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            p_value: None,
            log_fc: None,
            log_ata: None,
            treatment_a_abundance_mean: None,
            treatment_a_abundance_median: None,
            treatment_b_abundance_mean: None,
            treatment_b_abundance_median: None,
        }
    }
}

/// A fully loaded, sign-corrected pairwise comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairwiseComparison {
    /// One record per canonical name.
    pub records: HashMap<TranscriptName, TranscriptRecord>,
    /// Smallest strictly-positive, non-NaN p-value across all records;
    /// 1.0 when none qualify.
    pub min_p_value: f64,
    /// Records ordered by ascending log fold-change.
    pub by_log_fc: Vec<TranscriptRecord>,
    /// Records ordered by ascending log average abundance.
    pub by_log_ata: Vec<TranscriptRecord>,
}

impl PairwiseComparison {
    /// Look up a record by canonical name.
    pub fn get(&self, name: &str) -> Option<&TranscriptRecord> {
        self.records.get(name)
    }

    /// Whether a canonical name was tested in this comparison.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the comparison holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
