//! Migration scripts from comparison results
//!
//! Only additive changes become executable DDL. Altered and dropped columns
//! are listed as `-- manual:` comment lines for review.

use crate::compare::{ComparisonResult, DiffAction};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::model::{ColumnModel, TableModel};

/// Script bringing the target of `result` in line with `source`.
///
/// A passed result yields an empty script; a missing target yields the full
/// `CREATE TABLE` (with remark comments where the dialect has them). A
/// failure without any column diff, such as a primary-key mismatch, is
/// listed message by message as `-- manual:` lines.
pub fn generate_migration_sql(
    dialect: &dyn Dialect,
    source: &TableModel,
    result: &ComparisonResult,
) -> Result<String> {
    if result.passed() {
        return Ok(String::new());
    }
    if result.is_missing() {
        return dialect.generate_create_table_sql(source, true);
    }

    let mut parts = Vec::new();

    let added: Vec<ColumnModel> = result
        .diffs_of(DiffAction::Add)
        .map(|d| d.source_column().clone())
        .collect();
    let alter = dialect.generate_alter_table_sql(source.name(), &added)?;
    if !alter.is_empty() {
        parts.push(alter);
    }

    let table = dialect.render_ident(source.name());
    if result.diffs().is_empty() {
        let manual: Vec<String> = result
            .messages()
            .iter()
            .map(|m| format!("-- manual: {} on {}", m, table))
            .collect();
        return Ok(manual.join("\n"));
    }

    let manual: Vec<String> = result
        .diffs()
        .iter()
        .filter(|d| d.action() != DiffAction::Add)
        .map(|d| match d.target_column() {
            Some(target) => format!(
                "-- manual: {} on {}: source {}, target {}",
                d,
                table,
                d.source_column(),
                target
            ),
            None => format!("-- manual: {} on {}", d, table),
        })
        .collect();
    if !manual.is_empty() {
        parts.push(manual.join("\n"));
    }

    Ok(parts.join("\n\n"))
}
