//! # Sort/Filter Pipeline
//!
//! Pure functions deriving the two user-facing sequences from a loaded
//! comparison and the current selection state:
//!
//! - `sorted_records` — the globally ordered sequence;
//! - `displayed_records` — the filtered, ordered sequence for the
//!   current view.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{
    within_bounds, PairwiseComparison, SelectionState, SortOrder, SortPath, TranscriptName,
    TranscriptRecord,
};

/// Numeric field accessor for every sort path except `Name`.
fn numeric_key(record: &TranscriptRecord, path: SortPath) -> Option<f64> {
    match path {
        SortPath::Name => None,
        SortPath::PValue => record.p_value,
        SortPath::LogFc => record.log_fc,
        SortPath::LogAta => record.log_ata,
        SortPath::TreatmentAAbundanceMean => record.treatment_a_abundance_mean,
        SortPath::TreatmentAAbundanceMedian => record.treatment_a_abundance_median,
        SortPath::TreatmentBAbundanceMean => record.treatment_b_abundance_mean,
        SortPath::TreatmentBAbundanceMedian => record.treatment_b_abundance_median,
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Sort records by `path` in `order`.
///
/// An absent value sorts after a present one regardless of direction;
/// present values compare by `total_cmp` (numeric paths) or
/// case-insensitively (the `Name` path). The sort is stable.
pub fn sorted_records(
    mut records: Vec<TranscriptRecord>,
    path: SortPath,
    order: SortOrder,
) -> Vec<TranscriptRecord> {
    if path == SortPath::Name {
        alpha_sort(&mut records, order);
        return records;
    }
    records.sort_by(|a, b| match (numeric_key(a, path), numeric_key(b, path)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => directed(x.total_cmp(&y), order),
    });
    records
}

/// Case-insensitive alphabetical sort on canonical name, direction-aware.
pub fn alpha_sort(records: &mut [TranscriptRecord], order: SortOrder) {
    records.sort_by(|a, b| {
        directed(
            a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            order,
        )
    });
}

/// Names currently "listed": the first selected source wins, and the
/// sources are mutually exclusive.
///
/// 1. brushed plot region (filters the comparison by p-value threshold
///    and the region's bounds);
/// 2. selected-bin membership, verbatim;
/// 3. hovered-bin membership, verbatim;
/// 4. the saved/watched set.
fn listed_transcripts(
    pairwise: &PairwiseComparison,
    selection: &SelectionState,
) -> HashSet<TranscriptName> {
    if let Some(area) = selection.brushed_area {
        return pairwise
            .records
            .values()
            .filter(|de| {
                within_bounds(0.0, selection.p_value_threshold, de.p_value)
                    && within_bounds(area.min_log_ata, area.max_log_ata, de.log_ata)
                    && within_bounds(area.min_log_fc, area.max_log_fc, de.log_fc)
            })
            .map(|de| de.name.clone())
            .collect();
    }
    if let Some(selected) = &selection.selected_bin_transcripts {
        return selected.clone();
    }
    if let Some(hovered) = &selection.hovered_bin_transcripts {
        return hovered.clone();
    }
    selection.saved_transcripts.iter().cloned().collect()
}

/// Derive the displayed sequence for the current view.
///
/// Members of the listed set keep their position from `sorted`; listed
/// names the comparison never tested are appended as placeholder
/// records in alphabetical order. When sorting on the name itself the
/// whole concatenation is re-sorted alphabetically to remove the
/// two-group seam.
pub fn displayed_records(
    sorted: &[TranscriptRecord],
    pairwise: &PairwiseComparison,
    selection: &SelectionState,
    resolve: impl Fn(&str) -> String,
) -> Vec<TranscriptRecord> {
    let listed = listed_transcripts(pairwise, selection);

    let mut displayed: Vec<TranscriptRecord> = sorted
        .iter()
        .filter(|record| listed.contains(&record.name))
        .cloned()
        .collect();

    let mut extras: Vec<TranscriptRecord> = listed
        .iter()
        .filter(|name| !pairwise.contains(name))
        .map(|name| TranscriptRecord::placeholder(resolve(name)))
        .collect();
    alpha_sort(&mut extras, selection.order);

    displayed.extend(extras);

    if selection.sort_path == SortPath::Name {
        alpha_sort(&mut displayed, selection.order);
    }

    displayed
}
