//! CSV loading.
//!
//! Reads a pre-cleaned table with a header row into a [`Dataset`]. One
//! column is the label; the rest become features in file order. Feature
//! cells that fail to parse as numbers (including empty cells) load as
//! `NaN`, the crate-wide missing marker. Label cells must parse.

use std::fs::File;
use std::path::Path;

use ndarray::{Array1, Array2};

use super::dataset::Dataset;
use super::error::LoadError;

/// Read a CSV file into a dataset, taking `label` as the target column.
///
/// Ragged rows surface as [`LoadError::Csv`]; a missing file surfaces as
/// [`LoadError::Io`] with the offending path.
pub fn read_csv(path: impl AsRef<Path>, label: &str) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let label_idx = headers
        .iter()
        .position(|h| h == label)
        .ok_or_else(|| LoadError::MissingLabel(label.to_string()))?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .map(|(_, h)| h.to_string())
        .collect();
    let n_features = feature_names.len();

    let mut columns: Vec<Vec<f32>> = vec![Vec::new(); n_features];
    let mut targets: Vec<f32> = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut out_col = 0;
        for (i, field) in record.iter().enumerate() {
            let parsed = field.trim().parse::<f32>();
            if i == label_idx {
                let value = parsed.map_err(|_| LoadError::BadLabel {
                    row: row + 1,
                    column: label.to_string(),
                    value: field.to_string(),
                })?;
                targets.push(value);
            } else {
                columns[out_col].push(parsed.unwrap_or(f32::NAN));
                out_col += 1;
            }
        }
    }

    let n_samples = targets.len();
    let mut features = Array2::<f32>::zeros((n_features, n_samples));
    for (i, col) in columns.into_iter().enumerate() {
        features.row_mut(i).assign(&Array1::from_vec(col));
    }

    let targets = Array1::from_vec(targets);
    Ok(Dataset::new(features.view(), Some(targets.view())).with_feature_names(feature_names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_features_and_label() {
        let file = write_fixture(
            "distance,passengers,trip_duration\n1.5,1,300\n2.5,2,600\n4.0,1,900\n",
        );
        let ds = read_csv(file.path(), "trip_duration").unwrap();

        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.feature_names().unwrap(), &["distance", "passengers"]);
        assert_eq!(ds.feature(0).to_vec(), vec![1.5, 2.5, 4.0]);
        assert_eq!(ds.targets().unwrap().to_vec(), vec![300.0, 600.0, 900.0]);
    }

    #[test]
    fn label_position_does_not_matter() {
        let file = write_fixture("trip_duration,distance\n300,1.5\n600,2.5\n");
        let ds = read_csv(file.path(), "trip_duration").unwrap();
        assert_eq!(ds.feature_names().unwrap(), &["distance"]);
        assert_eq!(ds.targets().unwrap().to_vec(), vec![300.0, 600.0]);
    }

    #[test]
    fn unparseable_feature_cell_becomes_nan() {
        let file = write_fixture("distance,trip_duration\n,300\noops,600\n2.0,900\n");
        let ds = read_csv(file.path(), "trip_duration").unwrap();
        let col = ds.feature(0);
        assert!(col[0].is_nan());
        assert!(col[1].is_nan());
        assert_eq!(col[2], 2.0);
    }

    #[test]
    fn missing_label_column() {
        let file = write_fixture("a,b\n1,2\n");
        let result = read_csv(file.path(), "trip_duration");
        assert!(matches!(result, Err(LoadError::MissingLabel(name)) if name == "trip_duration"));
    }

    #[test]
    fn bad_label_cell() {
        let file = write_fixture("a,trip_duration\n1,abc\n");
        let result = read_csv(file.path(), "trip_duration");
        assert!(matches!(result, Err(LoadError::BadLabel { row: 1, .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_csv("definitely/not/here.csv", "trip_duration");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
