//! Column comparison rule chain
//!
//! Every rule runs regardless of earlier failures so that a single
//! comparison surfaces all mismatches of a column pair.
//!
//! | Rule        | Applies when                 | Diff                |
//! |-------------|------------------------------|---------------------|
//! | nullable    | `check_nullable`             | ALTER / NULLABLE    |
//! | primary key | always                       | none (message only) |
//! | string      | source is VARCHAR/NVARCHAR   | ALTER / DATA_TYPE   |
//! | numeric     | source is numeric            | ALTER / DATA_TYPE   |
//! | date/time   | source is DATE/TIME/TIMESTAMP| ALTER / DATA_TYPE   |
//! | exact type  | source has no family         | ALTER / DATA_TYPE   |

use crate::model::ColumnModel;

use super::policy::ComparisonPolicy;
use super::types::{AlterReason, ComparisonResult, Diff};

/// State shared by the rules while comparing one column pair
pub struct RuleContext<'a> {
    pub source: &'a ColumnModel,
    pub target: &'a ColumnModel,
    pub policy: &'a ComparisonPolicy,
    pub result: &'a mut ComparisonResult,
}

impl RuleContext<'_> {
    fn type_mismatch(&mut self) {
        self.result.fail(format!(
            "column {}: data type {} differs from {}",
            self.source.name(),
            self.source.data_type(),
            self.target.data_type()
        ));
        self.result
            .push_diff(Diff::alter(self.source, self.target, AlterReason::DataType));
    }

    /// Compare declared sizes. Skipped when sizes are not checked or when
    /// either side is INTEGER/LONG: some catalogs report every numeric column
    /// as one wide decimal, so integer widths are not comparable.
    fn check_size(&mut self) {
        if !self.policy.check_data_size
            || self.source.data_type().is_integer()
            || self.target.data_type().is_integer()
        {
            return;
        }

        let scale_differs = self.source.data_type().is_numeric()
            && self.source.decimal_digits() != self.target.decimal_digits();

        if self.source.size() != self.target.size() || scale_differs {
            self.result.fail(format!(
                "column {}: size {},{} differs from {},{}",
                self.source.name(),
                self.source.size(),
                self.source.decimal_digits(),
                self.target.size(),
                self.target.decimal_digits()
            ));
            self.result
                .push_diff(Diff::alter(self.source, self.target, AlterReason::DataType));
        }
    }
}

/// One step of the chain
pub trait ColumnRule: Sync {
    fn name(&self) -> &'static str;
    fn check(&self, ctx: &mut RuleContext<'_>);
}

struct NullableRule;

impl ColumnRule for NullableRule {
    fn name(&self) -> &'static str {
        "nullable"
    }

    fn check(&self, ctx: &mut RuleContext<'_>) {
        if !ctx.policy.check_nullable || ctx.source.is_nullable() == ctx.target.is_nullable() {
            return;
        }
        let describe = |nullable: bool| if nullable { "NULL" } else { "NOT NULL" };
        ctx.result.fail(format!(
            "column {}: {} differs from {}",
            ctx.source.name(),
            describe(ctx.source.is_nullable()),
            describe(ctx.target.is_nullable())
        ));
        ctx.result
            .push_diff(Diff::alter(ctx.source, ctx.target, AlterReason::Nullable));
    }
}

/// Primary-key membership must agree. There is no ALTER action for key
/// changes, so this only fails the result.
struct PrimaryKeyRule;

impl ColumnRule for PrimaryKeyRule {
    fn name(&self) -> &'static str {
        "primary key"
    }

    fn check(&self, ctx: &mut RuleContext<'_>) {
        if ctx.source.is_pk() != ctx.target.is_pk() {
            let describe = |pk: bool| if pk { "primary key" } else { "not a primary key" };
            ctx.result.fail(format!(
                "column {}: {} in source but {} in target",
                ctx.source.name(),
                describe(ctx.source.is_pk()),
                describe(ctx.target.is_pk())
            ));
        }
    }
}

struct StringRule;

impl ColumnRule for StringRule {
    fn name(&self) -> &'static str {
        "string"
    }

    fn check(&self, ctx: &mut RuleContext<'_>) {
        if !ctx.source.data_type().is_string() {
            return;
        }
        if !ctx.target.data_type().is_string() {
            ctx.type_mismatch();
            return;
        }
        if ctx.policy.strict_varchar && ctx.source.data_type() != ctx.target.data_type() {
            ctx.type_mismatch();
        }
        ctx.check_size();
    }
}

struct NumericRule;

impl ColumnRule for NumericRule {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn check(&self, ctx: &mut RuleContext<'_>) {
        if !ctx.source.data_type().is_numeric() {
            return;
        }
        if !ctx.target.data_type().is_numeric() {
            ctx.type_mismatch();
            return;
        }
        if !ctx.policy.strict_numeric {
            return;
        }
        if ctx.source.data_type() != ctx.target.data_type() {
            ctx.type_mismatch();
        }
        ctx.check_size();
    }
}

struct DateTimeRule;

impl ColumnRule for DateTimeRule {
    fn name(&self) -> &'static str {
        "date/time"
    }

    fn check(&self, ctx: &mut RuleContext<'_>) {
        if !ctx.source.data_type().is_date_time() {
            return;
        }
        if !ctx.target.data_type().is_date_time()
            || (ctx.policy.strict_date_time && ctx.source.data_type() != ctx.target.data_type())
        {
            ctx.type_mismatch();
        }
    }
}

/// Types outside every family (BOOLEAN, TIMESTAMPZ, LOBs, JSON) must match
/// exactly.
struct ExactTypeRule;

impl ColumnRule for ExactTypeRule {
    fn name(&self) -> &'static str {
        "exact type"
    }

    fn check(&self, ctx: &mut RuleContext<'_>) {
        if ctx.source.data_type().family().is_none()
            && ctx.source.data_type() != ctx.target.data_type()
        {
            ctx.type_mismatch();
        }
    }
}

/// The fixed evaluation order
pub static RULES: &[&dyn ColumnRule] = &[
    &NullableRule,
    &PrimaryKeyRule,
    &StringRule,
    &NumericRule,
    &DateTimeRule,
    &ExactTypeRule,
];

/// Run every rule against a same-named column pair, accumulating into `result`
pub fn compare_columns(
    source: &ColumnModel,
    target: &ColumnModel,
    policy: &ComparisonPolicy,
    result: &mut ComparisonResult,
) {
    let mut ctx = RuleContext {
        source,
        target,
        policy,
        result,
    };
    for rule in RULES {
        let before = ctx.result.messages().len();
        rule.check(&mut ctx);
        if ctx.result.messages().len() > before {
            tracing::trace!(rule = rule.name(), column = source.name(), "rule failed");
        }
    }
}
