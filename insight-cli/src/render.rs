//! Plain-text rendering of query results for the terminal.

use std::fmt::Write;

use insight_rag::{QueryResult, QueryStatus};

/// Maximum number of characters of record text shown per hit.
pub const PREVIEW_CHARS: usize = 450;

/// Shown when a query returns fewer hits than requested.
pub const SHORT_RESULT_NOTICE: &str = "(no further high-quality matches)";

/// Cut `text` to at most `max` characters, appending `...` when shortened.
pub fn preview(text: &str, max: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Render a query result.
pub fn format_result(result: &QueryResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Query: {}", result.query);

    if result.hits.is_empty() {
        out.push_str("No matching records found.\n");
    }
    for hit in &result.hits {
        let _ = writeln!(
            out,
            "\n[{}] Zone {} | score {:.4} | id {}",
            hit.rank, hit.record.zone, hit.score, hit.record.id
        );
        let _ = writeln!(out, "    {}", preview(&hit.record.text, PREVIEW_CHARS));
    }

    if !result.unresolved.is_empty() {
        out.push('\n');
    }
    for missing in &result.unresolved {
        let _ = writeln!(
            out,
            "! [{}] id {} (score {:.4}) could not be resolved: {}",
            missing.rank, missing.id, missing.score, missing.reason
        );
    }

    if result.status == QueryStatus::InsufficientMatches {
        let _ = writeln!(out, "\n{SHORT_RESULT_NOTICE}");
    }
    out
}
