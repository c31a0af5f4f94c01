//! Plain-text tables for the `analyze` command.

use crate::analyze::{Comparison, Totals};

const RULE_WIDTH: usize = 65;

/// Render the full size report: header, one row per document, total, summary.
pub fn size_report(rows: &[Comparison]) -> String {
    let totals = Totals::of(rows);
    let mut out = String::new();

    out.push_str("File Size Analysis: Documents vs Generated Markdown\n\n");
    out.push_str(&format!(
        "{:<25}{:>10}{:>12}{:>8}{:>12}\n",
        "File", "Original", "Generated", "Diff", "Change"
    ));
    out.push_str(&"─".repeat(RULE_WIDTH));
    out.push('\n');

    for row in rows {
        out.push_str(&format_row(
            &row.file.display().to_string(),
            row.original_bytes,
            row.generated_bytes,
            row.difference,
            row.savings,
            row.percent_change,
        ));
    }

    out.push_str(&"─".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format_row(
        "TOTAL",
        totals.original_bytes,
        totals.generated_bytes,
        totals.difference,
        totals.savings,
        totals.percent_change,
    ));
    out.push('\n');
    out.push_str(&summary_line(&totals));
    out.push('\n');
    out
}

fn format_row(
    file: &str,
    original: u64,
    generated: u64,
    difference: i64,
    savings: bool,
    percent_change: f64,
) -> String {
    format!(
        "{:<25}{:>10}{:>12}{:>8}{:>12}\n",
        file,
        original,
        generated,
        difference,
        change_label(savings, percent_change)
    )
}

/// `−30.0%` for a reduction, `+25.0%` otherwise.
pub fn change_label(savings: bool, percent_change: f64) -> String {
    if savings {
        format!("−{:.1}%", percent_change)
    } else {
        format!("+{:.1}%", percent_change.abs())
    }
}

pub fn summary_line(totals: &Totals) -> String {
    format!(
        "Summary: {} {} bytes ({:.1}%)",
        if totals.savings { "SAVED" } else { "INCREASED" },
        totals.difference.unsigned_abs(),
        totals.percent_change.abs()
    )
}
