//! Comparison properties over generated tables

use proptest::prelude::*;

use schemabridge::{
    compare_tables, ColumnModel, ComparisonPolicy, DataType, DiffAction, TableModel,
};

fn arb_data_type() -> impl Strategy<Value = DataType> {
    prop::sample::select(DataType::ALL.to_vec())
}

fn arb_policy() -> impl Strategy<Value = ComparisonPolicy> {
    any::<[bool; 5]>().prop_map(|flags| ComparisonPolicy {
        strict_varchar: flags[0],
        strict_numeric: flags[1],
        strict_date_time: flags[2],
        check_nullable: flags[3],
        check_data_size: flags[4],
    })
}

/// A column with an arbitrary type and shape; the name is assigned later
fn arb_column() -> impl Strategy<Value = ColumnModel> {
    (arb_data_type(), 0u32..4000, 0u32..10, any::<bool>(), any::<bool>()).prop_map(
        |(data_type, size, digits, nullable, pk)| {
            ColumnModel::builder("c", data_type)
                .size(size)
                .decimal_digits(digits)
                .nullable(nullable && !pk)
                .set_pk(pk)
                .build()
        },
    )
}

/// Columns with distinct names `c0`, `c1`, ...
fn arb_columns(max: usize) -> impl Strategy<Value = Vec<ColumnModel>> {
    prop::collection::vec(arb_column(), 1..max).prop_map(|columns| {
        columns
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.rebuild().name(format!("c{}", i)).build())
            .collect()
    })
}

fn intersect(p: ComparisonPolicy, mask: [bool; 5]) -> ComparisonPolicy {
    ComparisonPolicy {
        strict_varchar: p.strict_varchar && mask[0],
        strict_numeric: p.strict_numeric && mask[1],
        strict_date_time: p.strict_date_time && mask[2],
        check_nullable: p.check_nullable && mask[3],
        check_data_size: p.check_data_size && mask[4],
    }
}

proptest! {
    #[test]
    fn prop_table_equals_itself_in_any_column_order(
        (columns, shuffled) in arb_columns(12).prop_flat_map(|c| {
            let shuffled = Just(c.clone()).prop_shuffle();
            (Just(c), shuffled)
        }),
        policy in arb_policy(),
    ) {
        let source = TableModel::table("t", columns).unwrap();
        let target = TableModel::table("t", shuffled).unwrap();
        let result = compare_tables(&source, Some(&target), &policy);
        prop_assert!(result.passed(), "{:?}", result.messages());
        prop_assert!(result.diffs().is_empty());
    }

    #[test]
    fn prop_missing_columns_are_added_one_way_and_dropped_the_other(
        (columns, keep) in arb_columns(10).prop_flat_map(|c| {
            let n = c.len();
            (Just(c), prop::collection::vec(any::<bool>(), n))
        }),
        policy in arb_policy(),
    ) {
        // The first column always survives so the subset is never empty
        let kept: Vec<ColumnModel> = columns
            .iter()
            .zip(&keep)
            .enumerate()
            .filter(|(i, (_, k))| *i == 0 || **k)
            .map(|(_, (c, _))| c.clone())
            .collect();
        let removed: Vec<&str> = columns
            .iter()
            .filter(|c| !kept.iter().any(|k| k.name() == c.name()))
            .map(|c| c.name())
            .collect();

        let full = TableModel::table("t", columns.clone()).unwrap();
        let subset = TableModel::table("t", kept).unwrap();

        let forward = compare_tables(&full, Some(&subset), &policy);
        let added: Vec<&str> = forward
            .diffs_of(DiffAction::Add)
            .map(|d| d.source_column().name())
            .collect();
        prop_assert_eq!(&added, &removed);
        prop_assert_eq!(forward.diffs_of(DiffAction::Drop).count(), 0);
        prop_assert_eq!(forward.passed(), removed.is_empty());

        let backward = compare_tables(&subset, Some(&full), &policy);
        let dropped: Vec<&str> = backward
            .diffs_of(DiffAction::Drop)
            .map(|d| d.source_column().name())
            .collect();
        prop_assert_eq!(&dropped, &removed);
        prop_assert_eq!(backward.diffs_of(DiffAction::Add).count(), 0);
    }

    #[test]
    fn prop_relaxing_a_policy_never_fails_a_passing_pair(
        source in arb_column(),
        target in arb_column(),
        policy in arb_policy(),
        mask in any::<[bool; 5]>(),
    ) {
        let source = TableModel::table("t", vec![source]).unwrap();
        let target = TableModel::table("t", vec![target]).unwrap();
        let relaxed = intersect(policy, mask);

        let strict = compare_tables(&source, Some(&target), &policy);
        let loose = compare_tables(&source, Some(&target), &relaxed);
        if strict.passed() {
            prop_assert!(loose.passed(), "{:?} -> {:?}", policy, loose.messages());
        }
        prop_assert!(loose.diffs().len() <= strict.diffs().len());
    }

    #[test]
    fn prop_integer_sizes_are_never_compared(
        integer in prop::sample::select(vec![DataType::Integer, DataType::Long]),
        source_size in 0u32..40,
        target_size in 0u32..40,
    ) {
        let source = TableModel::table(
            "t",
            vec![ColumnModel::builder("n", integer).size(source_size).build()],
        )
        .unwrap();
        let target = TableModel::table(
            "t",
            vec![ColumnModel::builder("n", integer).size(target_size).build()],
        )
        .unwrap();
        let result = compare_tables(&source, Some(&target), &ComparisonPolicy::table());
        prop_assert!(result.passed(), "{:?}", result.messages());
    }
}

// ============================================================================
// Fixed cases
// ============================================================================

#[test]
fn test_added_column_on_keyed_varchar_table() {
    let id = ColumnModel::builder("id", DataType::Varchar)
        .size(10)
        .pk()
        .build();
    let name = ColumnModel::builder("name", DataType::Varchar)
        .size(50)
        .build();
    let source = TableModel::table("t", vec![id.clone(), name]).unwrap();
    let target = TableModel::table("t", vec![id]).unwrap();

    let result = compare_tables(&source, Some(&target), &ComparisonPolicy::table());
    assert!(!result.passed());
    let diffs: Vec<String> = result.diffs().iter().map(|d| d.to_string()).collect();
    assert_eq!(diffs, vec!["ADD name"]);
}

#[test]
fn test_numeric_size_mismatch_depends_on_policy() {
    let amount = |size| {
        ColumnModel::builder("amount", DataType::Numeric)
            .size(size)
            .decimal_digits(2)
            .build()
    };
    let source = TableModel::table("t", vec![amount(12)]).unwrap();
    let target = TableModel::table("t", vec![amount(10)]).unwrap();

    assert!(!compare_tables(&source, Some(&target), &ComparisonPolicy::table()).passed());
    assert!(compare_tables(&source, Some(&target), &ComparisonPolicy::view()).passed());
}

#[test]
fn test_integer_and_long_differ_only_when_strict() {
    let source = TableModel::table(
        "t",
        vec![ColumnModel::builder("n", DataType::Integer).build()],
    )
    .unwrap();
    let target = TableModel::table("t", vec![ColumnModel::builder("n", DataType::Long).build()])
        .unwrap();

    let strict = compare_tables(&source, Some(&target), &ComparisonPolicy::table());
    let diffs: Vec<String> = strict.diffs().iter().map(|d| d.to_string()).collect();
    assert_eq!(diffs, vec!["ALTER n (DATA_TYPE)"]);
    assert!(compare_tables(&source, Some(&target), &ComparisonPolicy::view()).passed());
}

#[test]
fn test_zoned_timestamp_is_never_interchangeable() {
    let source = TableModel::table(
        "t",
        vec![ColumnModel::builder("at", DataType::TimestampZ).build()],
    )
    .unwrap();
    let target = TableModel::table(
        "t",
        vec![ColumnModel::builder("at", DataType::Timestamp).build()],
    )
    .unwrap();
    assert!(!compare_tables(&source, Some(&target), &ComparisonPolicy::view()).passed());
}

#[test]
fn test_primary_key_mismatch_fails_without_diff() {
    let source = TableModel::table(
        "t",
        vec![ColumnModel::builder("id", DataType::Long).pk().build()],
    )
    .unwrap();
    let target = TableModel::table(
        "t",
        vec![ColumnModel::builder("id", DataType::Long).not_null().build()],
    )
    .unwrap();

    let result = compare_tables(&source, Some(&target), &ComparisonPolicy::table());
    assert!(!result.passed());
    assert!(result.diffs().is_empty());
}
