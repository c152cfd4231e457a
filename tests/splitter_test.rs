//! Tests for fold generation against the dataset layout on disk

mod common;

use std::collections::HashMap;
use std::fs;

use beamfold::models::{Fold, LinkCollection, SplitKind, SplitRatios};
use beamfold::prelude::*;
use proptest::prelude::*;
use tempfile::TempDir;

fn fold(n: u32) -> Fold {
    Fold::new(n).unwrap()
}

fn counts(lines: impl IntoIterator<Item = String>) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for line in lines {
        *map.entry(line).or_insert(0) += 1;
    }
    map
}

#[test]
fn test_ten_lines_fold_one() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "wdc_wd", &common::link_lines(10));

    let outcome = FoldSplitter::default().split_unit(&layout, fold(1)).unwrap();
    assert_eq!(outcome.sizes, SplitSizes { train: 7, test: 2, valid: 1 });

    let train = common::read_lines(&layout.split_path(fold(1), SplitKind::Train));
    let test = common::read_lines(&layout.split_path(fold(1), SplitKind::Test));
    let valid = common::read_lines(&layout.split_path(fold(1), SplitKind::Valid));
    assert_eq!((train.len(), test.len(), valid.len()), (7, 2, 1));

    let all: Vec<String> = train.into_iter().chain(test).chain(valid).collect();
    let input = common::read_lines(&layout.input_path());
    assert_eq!(counts(all), counts(input));
}

#[test]
fn test_three_lines_rounding() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "small", &common::link_lines(3));

    let outcome = FoldSplitter::default().split_unit(&layout, fold(1)).unwrap();
    assert_eq!(outcome.sizes, SplitSizes { train: 2, test: 0, valid: 1 });
    assert_eq!(fs::read(layout.split_path(fold(1), SplitKind::Test)).unwrap(), b"");
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "ds", &common::link_lines(250));
    let splitter = FoldSplitter::default();

    splitter.split_unit(&layout, fold(3)).unwrap();
    let first: Vec<Vec<u8>> = SplitKind::all()
        .iter()
        .map(|k| fs::read(layout.split_path(fold(3), *k)).unwrap())
        .collect();

    splitter.split_unit(&layout, fold(3)).unwrap();
    let second: Vec<Vec<u8>> = SplitKind::all()
        .iter()
        .map(|k| fs::read(layout.split_path(fold(3), *k)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_permutation_ignores_ratios() {
    // The order depends on the fold alone.
    let links = LinkCollection::parse(common::link_lines(10).as_bytes());
    let splitter = FoldSplitter::default();

    let a = splitter.permutation(links.records(), fold(1));
    let b = FoldSplitter::new(SplitRatios::new(0.5, 0.5).unwrap())
        .permutation(links.records(), fold(1));
    assert_eq!(a, b, "permutation must not depend on ratios");
    assert_ne!(a, links.records(), "ten records should not stay in order");
}

#[test]
fn test_folds_write_separate_directories() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "ds", &common::link_lines(60));
    let splitter = FoldSplitter::default();

    for f in Fold::range(5) {
        splitter.split_unit(&layout, f).unwrap();
    }

    let trains: Vec<Vec<u8>> = Fold::range(5)
        .map(|f| fs::read(layout.split_path(f, SplitKind::Train)).unwrap())
        .collect();
    for (i, a) in trains.iter().enumerate() {
        for b in &trains[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_crlf_and_unterminated_input() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "crlf", "a\t1\r\nb\t2\r\nc\t3\r\nd\t4");

    FoldSplitter::default().split_unit(&layout, fold(2)).unwrap();

    let mut all = Vec::new();
    for kind in SplitKind::all() {
        all.extend(common::read_lines(&layout.split_path(fold(2), kind)));
    }
    all.sort();
    assert_eq!(all, vec!["a\t1\r\n", "b\t2\r\n", "c\t3\r\n", "d\t4\r\n"]);
}

#[test]
fn test_empty_input_writes_empty_splits() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "empty", "");

    let outcome = FoldSplitter::default().split_unit(&layout, fold(1)).unwrap();
    assert_eq!(outcome.sizes.total(), 0);
    for kind in SplitKind::all() {
        let path = layout.split_path(fold(1), kind);
        assert!(path.exists());
        assert_eq!(fs::metadata(path).unwrap().len(), 0);
    }
}

#[test]
fn test_empty_input_rejected() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "empty", "");
    let splitter = FoldSplitter::default().with_empty_input(EmptyInputPolicy::Reject);

    let err = splitter.split_unit(&layout, fold(1)).unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
    assert_eq!(err.category(), ErrorCategory::Input);
    assert!(!layout.fold_dir(fold(1)).exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let layout = DatasetLayout::new(dir.path(), "absent", "ent_links").unwrap();

    let err = FoldSplitter::default().split_unit(&layout, fold(4)).unwrap_err();
    match &err {
        Error::MissingInput { dataset, fold: f, path, .. } => {
            assert_eq!(dataset, "absent");
            assert_eq!(*f, fold(4));
            assert_eq!(path, &layout.input_path());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_recoverable());
    assert!(!layout.fold_dir(fold(4)).exists());
}

#[test]
fn test_output_write_error() {
    let dir = TempDir::new().unwrap();
    let layout = common::seed_dataset(dir.path(), "ds", &common::link_lines(10));
    // A file where the fold directory belongs.
    fs::write(layout.fold_dir(fold(1)), "blocker").unwrap();

    let err = FoldSplitter::default().split_unit(&layout, fold(1)).unwrap_err();
    assert!(matches!(err, Error::OutputWrite { .. }));
    assert_eq!(err.category(), ErrorCategory::Output);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_partition_covers_input(n in 0usize..400, seed in 1u32..1000) {
        let links = LinkCollection::parse(common::link_lines(n).as_bytes());
        let partition = FoldSplitter::default().partition(&links, fold(seed));
        let sizes = partition.sizes();

        prop_assert_eq!(sizes.total(), n);
        prop_assert_eq!(sizes.train, (0.7 * n as f64).floor() as usize);
        prop_assert_eq!(sizes.test, (0.2 * n as f64).floor() as usize);

        let mut all: Vec<_> = SplitKind::all()
            .iter()
            .flat_map(|k| partition.split(*k).to_vec())
            .collect();
        let mut input = links.records().to_vec();
        all.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        input.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        prop_assert_eq!(all, input);
    }

    #[test]
    fn prop_partition_is_deterministic(n in 0usize..200, seed in 1u32..100) {
        let links = LinkCollection::parse(common::link_lines(n).as_bytes());
        let splitter = FoldSplitter::default();
        prop_assert_eq!(splitter.partition(&links, fold(seed)), splitter.partition(&links, fold(seed)));
    }
}
