//! Loading and splitting behavior, end to end.

use std::collections::HashSet;
use std::io::Write;

use tripstack::data::{LoadError, read_csv, split_indices, train_valid_split};

fn fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn trips_csv(rows: usize) -> String {
    let mut out = String::from("distance,hour,passengers,trip_duration\n");
    for i in 0..rows {
        let distance = 0.5 + i as f32 * 0.1;
        let hour = (i % 24) as f32;
        let duration = 120.0 * distance + 5.0 * hour;
        out.push_str(&format!("{distance},{hour},1,{duration}\n"));
    }
    out
}

#[test]
fn label_removal_leaves_remaining_columns() {
    let file = fixture(&trips_csv(20));
    let dataset = read_csv(file.path(), "trip_duration").unwrap();

    // 4 columns in the file, one consumed as the label.
    assert_eq!(dataset.n_features(), 3);
    assert_eq!(dataset.n_samples(), 20);
    assert_eq!(
        dataset.feature_names().unwrap(),
        &["distance", "hour", "passengers"]
    );
}

#[test]
fn split_preserves_feature_count_on_both_sides() {
    let file = fixture(&trips_csv(50));
    let dataset = read_csv(file.path(), "trip_duration").unwrap();

    let (train, valid) = train_valid_split(&dataset, 0.2, 4321);
    assert_eq!(train.n_features(), 3);
    assert_eq!(valid.n_features(), 3);
    assert_eq!(train.n_samples(), 40);
    assert_eq!(valid.n_samples(), 10);
    assert!(train.has_targets());
    assert!(valid.has_targets());
}

#[test]
fn split_is_a_disjoint_cover() {
    let (train, valid) = split_indices(1000, 0.2, 4321);
    assert_eq!(train.len(), 800);
    assert_eq!(valid.len(), 200);

    let all: HashSet<usize> = train.iter().chain(valid.iter()).copied().collect();
    assert_eq!(all.len(), 1000);
}

#[test]
fn missing_file_fails_before_any_training() {
    let result = read_csv("data/no_such_file.csv", "trip_duration");
    match result {
        Err(LoadError::Io { path, source }) => {
            assert!(path.ends_with("no_such_file.csv"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn reloading_the_same_file_gives_identical_data() {
    let file = fixture(&trips_csv(30));
    let a = read_csv(file.path(), "trip_duration").unwrap();
    let b = read_csv(file.path(), "trip_duration").unwrap();
    assert_eq!(a.features(), b.features());
    assert_eq!(a.targets().unwrap(), b.targets().unwrap());
}
