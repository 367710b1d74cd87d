//! # Saved-Transcript Transfer
//!
//! Tab-separated serialization of the displayed table and parsing of
//! imported saved-transcript files. File mechanics (dialogs, blobs)
//! belong to the host; this module only shapes the text.

use crate::domain::TranscriptRecord;

/// First header column of an exported table; also recognized (and
/// skipped) when importing.
pub const NAME_HEADER: &str = "Gene name";

fn format_field(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Serialize displayed records as a tab-separated table.
///
/// Columns: name, p-value, logATA, logFC, then mean/median abundance
/// for each of the two compared treatments. Absent numeric values
/// serialize to empty fields.
pub fn export_table(treatment_a: &str, treatment_b: &str, rows: &[TranscriptRecord]) -> String {
    let header = [
        NAME_HEADER.to_string(),
        "pValue".to_string(),
        "logATA".to_string(),
        "logFC".to_string(),
        format!("{treatment_a} mean abundance"),
        format!("{treatment_a} median abundance"),
        format!("{treatment_b} mean abundance"),
        format!("{treatment_b} median abundance"),
    ];

    let mut out = header.join("\t");
    out.push('\n');

    for row in rows {
        let fields = [
            row.name.clone(),
            format_field(row.p_value),
            format_field(row.log_ata),
            format_field(row.log_fc),
            format_field(row.treatment_a_abundance_mean),
            format_field(row.treatment_a_abundance_median),
            format_field(row.treatment_b_abundance_mean),
            format_field(row.treatment_b_abundance_median),
        ];
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }

    out
}

/// First-column identifiers of an imported table, with a leading
/// `Gene name` header row stripped when present.
pub fn import_rows(text: &str) -> Vec<String> {
    let mut rows: Vec<String> = text
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').next().unwrap_or("").trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if rows.first().map(String::as_str) == Some(NAME_HEADER) {
        rows.remove(0);
    }

    rows
}
