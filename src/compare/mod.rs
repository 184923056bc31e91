//! Compare table models and report differences
//!
//! A comparison aligns the columns of a source and a target table by
//! case-insensitive name and runs every same-named pair through the rule
//! chain in [`rules`]. The outcome is a [`ComparisonResult`] holding the
//! overall verdict, human-readable messages and the ordered add/alter/drop
//! [`Diff`]s needed to bring the target in line with the source.

pub mod policy;
pub mod report;
pub mod rules;
pub mod types;

pub use policy::ComparisonPolicy;
pub use rules::compare_columns;
pub use types::{AlterReason, ComparisonResult, Diff, DiffAction};

use crate::model::TableModel;

/// Compare a source table against an optional target.
///
/// A `None` target (absent or renamed table) short-circuits to a result
/// flagged missing, with no column-level detail.
pub fn compare_tables(
    source: &TableModel,
    target: Option<&TableModel>,
    policy: &ComparisonPolicy,
) -> ComparisonResult {
    match target {
        Some(target) => source.compare_to(target, policy),
        None => ComparisonResult::missing(source.name()),
    }
}
