//! Human-readable comparison report

use super::types::{ComparisonResult, DiffAction};

/// Render the report for a batch of table comparisons.
pub fn render_report(results: &[ComparisonResult]) -> String {
    let mut out = String::new();
    out.push_str("=== Schema Comparison Report ===\n\n");

    for result in results {
        out.push_str(&format!("--- {} ---\n", result.table_name()));
        if result.is_missing() {
            out.push_str("  Table missing in target\n\n");
            continue;
        }
        if result.passed() {
            out.push_str("OK (identical)\n\n");
            continue;
        }

        let limit = 50;
        for message in result.messages().iter().take(limit) {
            out.push_str(&format!("  {}\n", message));
        }
        if result.messages().len() > limit {
            out.push_str(&format!(
                "  ... ({} more lines)\n",
                result.messages().len() - limit
            ));
        }
        for diff in result.diffs() {
            out.push_str(&format!("  -> {}\n", diff));
        }
        out.push('\n');
    }

    let failed = results.iter().filter(|r| !r.passed()).count();
    let missing = results.iter().filter(|r| r.is_missing()).count();
    let count = |action| {
        results
            .iter()
            .map(|r| r.diffs_of(action).count())
            .sum::<usize>()
    };
    out.push_str(&format!(
        "Summary: {} tables, {} failed ({} missing), {} add, {} alter, {} drop\n",
        results.len(),
        failed,
        missing,
        count(DiffAction::Add),
        count(DiffAction::Alter),
        count(DiffAction::Drop)
    ));
    out
}
