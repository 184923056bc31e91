//! Core types for schema comparison

use std::fmt;

use crate::model::ColumnModel;

/// What has to happen to the target to match the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffAction {
    Add,
    Alter,
    Drop,
}

impl DiffAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffAction::Add => "ADD",
            DiffAction::Alter => "ALTER",
            DiffAction::Drop => "DROP",
        }
    }
}

/// Why an ALTER diff was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlterReason {
    DataType,
    Nullable,
}

impl AlterReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlterReason::DataType => "DATA_TYPE",
            AlterReason::Nullable => "NULLABLE",
        }
    }
}

/// A single add/alter/drop instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    source_column: ColumnModel,
    target_column: Option<ColumnModel>,
    action: DiffAction,
    alter_reason: Option<AlterReason>,
}

impl Diff {
    pub fn new(
        source_column: ColumnModel,
        target_column: Option<ColumnModel>,
        action: DiffAction,
    ) -> Self {
        Self {
            source_column,
            target_column,
            action,
            alter_reason: None,
        }
    }

    pub fn alter(source: &ColumnModel, target: &ColumnModel, reason: AlterReason) -> Self {
        Self {
            source_column: source.clone(),
            target_column: Some(target.clone()),
            action: DiffAction::Alter,
            alter_reason: Some(reason),
        }
    }

    /// For DROP diffs this is the target-only column
    pub fn source_column(&self) -> &ColumnModel {
        &self.source_column
    }

    pub fn target_column(&self) -> Option<&ColumnModel> {
        self.target_column.as_ref()
    }

    pub fn action(&self) -> DiffAction {
        self.action
    }

    pub fn alter_reason(&self) -> Option<AlterReason> {
        self.alter_reason
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action.as_str(), self.source_column.name())?;
        if let Some(reason) = self.alter_reason {
            write!(f, " ({})", reason.as_str())?;
        }
        Ok(())
    }
}

/// Outcome of comparing one source table against its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    table_name: String,
    passed: bool,
    missing: bool,
    messages: Vec<String>,
    diffs: Vec<Diff>,
}

impl ComparisonResult {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            passed: true,
            missing: false,
            messages: Vec::new(),
            diffs: Vec::new(),
        }
    }

    /// Result for a target table that does not exist at all
    pub fn missing(table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        let mut result = Self::new(table_name.clone());
        result.missing = true;
        result.fail(format!("table {} is missing in target", table_name));
        result
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    /// Diffs of one action, in order
    pub fn diffs_of(&self, action: DiffAction) -> impl Iterator<Item = &Diff> {
        self.diffs.iter().filter(move |d| d.action == action)
    }

    /// Record a failed check
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.passed = false;
        self.messages.push(message.into());
    }

    /// Record a diff. A column gets at most one diff per action/reason pair.
    pub(crate) fn push_diff(&mut self, diff: Diff) {
        let duplicate = self.diffs.iter().any(|d| {
            d.action == diff.action
                && d.alter_reason == diff.alter_reason
                && d.source_column.has_name(diff.source_column.name())
        });
        if !duplicate {
            self.diffs.push(diff);
        }
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.missing {
            "MISSING"
        } else if self.passed {
            "OK"
        } else {
            "FAILED"
        };
        write!(f, "{}: {}", self.table_name, status)?;
        for message in &self.messages {
            write!(f, "\n  {}", message)?;
        }
        for diff in &self.diffs {
            write!(f, "\n  -> {}", diff)?;
        }
        Ok(())
    }
}
