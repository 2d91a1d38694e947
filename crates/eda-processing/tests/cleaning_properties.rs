//! Properties of the cleaning routine over generated datasets.
//!
//! Columns mix present values, gaps and the occasional far outlier so that
//! both passes have work to do.

use eda_processing::profiler::statistics::{self, IqrBounds, QuartileMethod};
use eda_processing::{CleaningConfig, Column, Dataset, DatasetCleaner, ImputationStrategy};
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn float_cell() -> impl Strategy<Value = Option<f64>> {
    option::weighted(
        0.8,
        prop_oneof![9 => -100.0..100.0f64, 1 => -1.0e6..1.0e6f64],
    )
}

fn int_cell() -> impl Strategy<Value = Option<i64>> {
    option::weighted(
        0.8,
        prop_oneof![9 => -50i64..50, 1 => -1_000_000i64..1_000_000],
    )
}

fn label_cell() -> impl Strategy<Value = Option<&'static str>> {
    option::weighted(0.75, prop::sample::select(vec!["red", "green", "blue", "grey"]))
}

/// A float, an integer and a categorical column of equal length, each
/// with at least one value.
fn dataset() -> impl Strategy<Value = Dataset> {
    (1usize..40)
        .prop_flat_map(|rows| {
            (
                vec(float_cell(), rows),
                vec(int_cell(), rows),
                vec(label_cell(), rows),
            )
        })
        .prop_map(|(floats, ints, labels)| {
            Dataset::new(vec![
                Column::numeric("f", floats),
                Column::integer("i", ints),
                Column::categorical("c", labels),
            ])
            .unwrap()
        })
        .prop_filter("every column needs a value", |dataset| {
            dataset.columns().iter().all(|c| !c.is_fully_missing())
        })
}

fn cleaner() -> DatasetCleaner {
    DatasetCleaner::new(CleaningConfig::default())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_cleaning_leaves_no_gaps_and_keeps_shape(dataset in dataset()) {
        let shape = dataset.shape();
        let names: Vec<String> = dataset.column_names().iter().map(|s| s.to_string()).collect();
        let kinds: Vec<_> = dataset.columns().iter().map(Column::kind).collect();

        let cleaned = cleaner().clean(dataset).unwrap().dataset;

        prop_assert_eq!(cleaned.missing_count(), 0);
        prop_assert_eq!(cleaned.shape(), shape);
        prop_assert_eq!(
            cleaned.column_names(),
            names.iter().map(String::as_str).collect::<Vec<_>>()
        );
        prop_assert_eq!(cleaned.columns().iter().map(Column::kind).collect::<Vec<_>>(), kinds);
    }

    #[test]
    fn test_numeric_values_lie_within_fences_of_cleaned_column(dataset in dataset()) {
        let cleaned = cleaner().clean(dataset).unwrap().dataset;

        for column in cleaned.columns().iter().filter(|c| c.is_numeric()) {
            let values: Vec<f64> = column.numeric_values().unwrap().into_iter().flatten().collect();
            let bounds = IqrBounds::with_method(
                &statistics::sorted(&values),
                1.5,
                QuartileMethod::NearestRank,
            )
            .unwrap();

            for value in values {
                prop_assert!(
                    bounds.contains(value),
                    "{} outside [{}, {}] in '{}'",
                    value,
                    bounds.lower,
                    bounds.upper,
                    column.name()
                );
            }
        }
    }

    #[test]
    fn test_recleaning_changes_nothing(dataset in dataset()) {
        let once = cleaner().clean(dataset).unwrap();
        let twice = cleaner().clean(once.dataset.clone()).unwrap();

        prop_assert!(twice.summary.imputations.is_empty());
        prop_assert_eq!(twice.summary.values_clipped(), 0);
        prop_assert_eq!(twice.dataset, once.dataset);
    }

    #[test]
    fn test_numeric_fill_follows_skewness(dataset in dataset()) {
        let expected: Vec<(String, ImputationStrategy)> = dataset
            .columns()
            .iter()
            .filter(|c| c.missing_count() > 0)
            .map(|c| {
                let strategy = match c.numeric_values() {
                    Some(values) => {
                        let present: Vec<f64> = values.into_iter().flatten().collect();
                        match statistics::skewness(&present) {
                            Some(skew) if skew.abs() > 1.0 => ImputationStrategy::Median,
                            _ => ImputationStrategy::Mean,
                        }
                    }
                    None => ImputationStrategy::Mode,
                };
                (c.name().to_string(), strategy)
            })
            .collect();

        let outcome = cleaner().clean(dataset).unwrap();
        let actual: Vec<(String, ImputationStrategy)> = outcome
            .summary
            .imputations
            .iter()
            .map(|r| (r.column.clone(), r.strategy))
            .collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_categorical_gaps_take_the_first_most_frequent_label(labels in vec(label_cell(), 1..40)) {
        prop_assume!(labels.iter().any(Option::is_some));

        let present: Vec<&str> = labels.iter().flatten().copied().collect();
        let count = |label: &str| present.iter().filter(|p| **p == label).count();
        let top = present.iter().map(|p| count(*p)).max().unwrap();
        let expected = *present.iter().find(|p| count(**p) == top).unwrap();

        let dataset = Dataset::new(vec![Column::categorical("c", labels.clone())]).unwrap();
        let cleaned = cleaner().clean(dataset).unwrap().dataset;
        let values = cleaned.column("c").unwrap().categorical_values().unwrap();

        for (before, after) in labels.iter().zip(values) {
            match before {
                Some(label) => prop_assert_eq!(after.as_deref(), Some(*label)),
                None => prop_assert_eq!(after.as_deref(), Some(expected)),
            }
        }
    }

    #[test]
    fn test_fully_missing_column_fails_the_whole_run(rows in 1usize..20) {
        let dataset = Dataset::new(vec![
            Column::numeric("x", (0..rows).map(|r| Some(r as f64))),
            Column::numeric("empty", vec![None; rows]),
        ])
        .unwrap();

        let err = cleaner().clean(dataset).unwrap_err();
        prop_assert_eq!(err.error_code(), "NO_VALID_VALUES");
    }
}
