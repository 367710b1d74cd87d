//! # Comparison Table Parsing
//!
//! Parses the tab-separated output of a pairwise differential-expression
//! test into a [`PairwiseComparison`], applying directional sign
//! correction, canonical name resolution, and per-treatment abundance
//! enrichment.
//!
//! A malformed numeric field becomes NaN; a single bad row never loses
//! the rest of the table.

use std::collections::HashMap;

use crate::domain::{
    fold_min_p_value, PairwiseComparison, TranscriptRecord, DEFAULT_MIN_P_VALUE,
};

/// Arithmetic mean, ignoring NaN entries. `None` when nothing remains.
pub fn mean(values: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.iter().filter(|v| !v.is_nan()) {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Median, ignoring NaN entries; the middle two are averaged for even
/// counts. `None` when nothing remains.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut kept: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if kept.is_empty() {
        return None;
    }
    kept.sort_by(f64::total_cmp);
    let mid = kept.len() / 2;
    if kept.len() % 2 == 1 {
        Some(kept[mid])
    } else {
        Some((kept[mid - 1] + kept[mid]) / 2.0)
    }
}

/// Mean and median of an optional replicate series.
fn summarize(values: Option<Vec<f64>>) -> (Option<f64>, Option<f64>) {
    match values {
        Some(v) => (mean(&v), median(&v)),
        None => (None, None),
    }
}

fn parse_float(field: Option<&str>) -> f64 {
    field
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Parse a comparison table into records plus derived aggregates.
///
/// The first row is a header and is discarded; data rows carry
/// `identifier \t logFC \t logATA \t pValue`. `reverse` negates every
/// log fold-change (the resource was stored in the opposite direction
/// to the requested pair). `resolve` maps raw identifiers to canonical
/// names; `abundances_a`/`abundances_b` supply replicate series for the
/// two requested treatments by canonical name.
pub fn parse_comparison_table(
    text: &str,
    reverse: bool,
    resolve: impl Fn(&str) -> String,
    abundances_a: impl Fn(&str) -> Option<Vec<f64>>,
    abundances_b: impl Fn(&str) -> Option<Vec<f64>>,
) -> PairwiseComparison {
    let sign = if reverse { -1.0 } else { 1.0 };
    let mut records: HashMap<String, TranscriptRecord> = HashMap::new();
    let mut min_p_value = DEFAULT_MIN_P_VALUE;

    for row in text.trim().lines().skip(1) {
        let mut fields = row.split('\t');
        let raw_id = match fields.next() {
            Some(id) if !id.trim().is_empty() => id.trim(),
            _ => continue,
        };
        let log_fc = parse_float(fields.next());
        let log_ata = parse_float(fields.next());
        let p_value = parse_float(fields.next());

        min_p_value = fold_min_p_value(min_p_value, p_value);

        let name = resolve(raw_id);
        let (a_mean, a_median) = summarize(abundances_a(&name));
        let (b_mean, b_median) = summarize(abundances_b(&name));

        records.insert(
            name.clone(),
            TranscriptRecord {
                name,
                p_value: Some(p_value),
                log_fc: Some(sign * log_fc),
                log_ata: Some(log_ata),
                treatment_a_abundance_mean: a_mean,
                treatment_a_abundance_median: a_median,
                treatment_b_abundance_mean: b_mean,
                treatment_b_abundance_median: b_median,
            },
        );
    }

    let by_log_fc = sorted_by(&records, |r| r.log_fc);
    let by_log_ata = sorted_by(&records, |r| r.log_ata);

    PairwiseComparison {
        records,
        min_p_value,
        by_log_fc,
        by_log_ata,
    }
}

fn sorted_by(
    records: &HashMap<String, TranscriptRecord>,
    key: impl Fn(&TranscriptRecord) -> Option<f64>,
) -> Vec<TranscriptRecord> {
    let mut out: Vec<TranscriptRecord> = records.values().cloned().collect();
    out.sort_by(|a, b| {
        key(a)
            .unwrap_or(0.0)
            .total_cmp(&key(b).unwrap_or(0.0))
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}
