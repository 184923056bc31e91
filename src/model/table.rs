//! Table and view models

use indexmap::IndexMap;

use crate::compare::{compare_columns, ComparisonPolicy, ComparisonResult, Diff, DiffAction};
use crate::error::{Result, SchemaError};

use super::ColumnModel;

/// Whether a model describes a base table or a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Table => "TABLE",
            TableKind::View => "VIEW",
        }
    }
}

/// Ordered column set of a table or view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    name: String,
    remark: Option<String>,
    kind: TableKind,
    columns: Vec<ColumnModel>,
}

impl TableModel {
    /// Create a model, rejecting empty column lists and duplicate
    /// (case-insensitive) column names.
    pub fn new(
        name: impl Into<String>,
        kind: TableKind,
        columns: Vec<ColumnModel>,
    ) -> Result<Self> {
        let name = name.into();
        if columns.is_empty() {
            return Err(SchemaError::EmptyTable { table: name });
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.has_name(col.name())) {
                return Err(SchemaError::DuplicateColumn {
                    table: name,
                    column: col.name().to_string(),
                });
            }
        }
        Ok(Self {
            name,
            remark: None,
            kind,
            columns,
        })
    }

    pub fn table(name: impl Into<String>, columns: Vec<ColumnModel>) -> Result<Self> {
        Self::new(name, TableKind::Table, columns)
    }

    pub fn view(name: impl Into<String>, columns: Vec<ColumnModel>) -> Result<Self> {
        Self::new(name, TableKind::View, columns)
    }

    pub fn with_remark(mut self, remark: Option<impl Into<String>>) -> Self {
        self.remark = remark.map(Into::into);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn is_table(&self) -> bool {
        self.kind == TableKind::Table
    }

    pub fn is_view(&self) -> bool {
        self.kind == TableKind::View
    }

    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    /// Case-insensitive column lookup
    pub fn column(&self, name: &str) -> Option<&ColumnModel> {
        self.columns.iter().find(|c| c.has_name(name))
    }

    pub fn pk_columns(&self) -> impl Iterator<Item = &ColumnModel> {
        self.columns.iter().filter(|c| c.is_pk())
    }

    /// Compare this (source) table against `target`.
    ///
    /// Columns are aligned by case-insensitive name. A source column absent
    /// from the target yields an ADD diff, a target column absent from the
    /// source yields a DROP diff, and same-named pairs go through the column
    /// rule chain.
    pub fn compare_to(&self, target: &TableModel, policy: &ComparisonPolicy) -> ComparisonResult {
        let mut result = ComparisonResult::new(&self.name);

        let mut remaining: IndexMap<String, &ColumnModel> = target
            .columns
            .iter()
            .map(|c| (c.name().to_ascii_uppercase(), c))
            .collect();

        for source_col in &self.columns {
            match remaining.shift_remove(&source_col.name().to_ascii_uppercase()) {
                Some(target_col) => compare_columns(source_col, target_col, policy, &mut result),
                None => {
                    result.fail(format!(
                        "column {} is missing in target {}",
                        source_col.name(),
                        target.name
                    ));
                    result.push_diff(Diff::new(source_col.clone(), None, DiffAction::Add));
                }
            }
        }

        for extra in remaining.into_values() {
            result.fail(format!(
                "column {} exists only in target {}",
                extra.name(),
                target.name
            ));
            result.push_diff(Diff::new(extra.clone(), None, DiffAction::Drop));
        }

        result
    }
}
