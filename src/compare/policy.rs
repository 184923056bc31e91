//! Comparison strictness toggles

/// Controls how strictly two columns must agree.
///
/// The five flags are independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPolicy {
    /// VARCHAR and NVARCHAR must match exactly
    pub strict_varchar: bool,
    /// Numeric subtypes and sizes must match exactly
    pub strict_numeric: bool,
    /// DATE, TIME and TIMESTAMP must match exactly
    pub strict_date_time: bool,
    /// Nullability differences are reported
    pub check_nullable: bool,
    /// Declared sizes are compared
    pub check_data_size: bool,
}

impl ComparisonPolicy {
    /// Preset for tables: everything strict.
    pub const fn table() -> Self {
        Self {
            strict_varchar: true,
            strict_numeric: true,
            strict_date_time: true,
            check_nullable: true,
            check_data_size: true,
        }
    }

    /// Preset for views: everything relaxed.
    pub const fn view() -> Self {
        Self {
            strict_varchar: false,
            strict_numeric: false,
            strict_date_time: false,
            check_nullable: false,
            check_data_size: false,
        }
    }

    /// Look up a preset by name (`table` or `view`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "table" => Some(Self::table()),
            "view" => Some(Self::view()),
            _ => None,
        }
    }
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self::table()
    }
}
