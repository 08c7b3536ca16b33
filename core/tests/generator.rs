//! Generator contract: exact row counts, in-domain fields, and the
//! cleaning policy of the dataset reader.

use fraudsight_core::dataset;
use fraudsight_core::error::PipelineError;
use std::fs;

#[test]
fn generates_exactly_n_rows() {
    for n in [1usize, 100, 5_000] {
        assert_eq!(dataset::generate_labeled(n, 42, 0.1).len(), n);
        assert_eq!(dataset::generate_unlabeled(n, 100).len(), n);
    }
}

#[test]
fn fields_stay_in_domain() {
    for record in dataset::generate_labeled(2_000, 42, 0.1) {
        assert!((18..70).contains(&record.age), "age out of domain: {}", record.age);
        assert!(
            (20_000..120_000).contains(&record.income),
            "income out of domain: {}",
            record.income
        );
        assert!(
            (1_000..50_000).contains(&record.claim_amount),
            "claim_amount out of domain: {}",
            record.claim_amount
        );
        assert!(record.has_prior_fraud <= 1);
        assert!(record.is_fraud <= 1);
    }
}

#[test]
fn fraud_base_rate_is_plausible() {
    let records = dataset::generate_labeled(10_000, 42, 0.1);
    let fraud = records.iter().filter(|r| r.is_fraud == 1).count();
    let rate = fraud as f64 / records.len() as f64;
    assert!((0.08..0.12).contains(&rate), "fraud rate drifted: {rate}");
}

#[test]
fn writer_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("nested").join("fraud_data.csv");
    let records = dataset::generate_labeled(10, 42, 0.1);
    dataset::write_labeled(&nested, &records).unwrap();
    assert!(nested.exists());
}

#[test]
fn dataset_round_trips_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fraud_data.csv");
    let records = dataset::generate_labeled(250, 42, 0.1);
    dataset::write_labeled(&path, &records).unwrap();
    assert_eq!(dataset::read_labeled(&path).unwrap(), records);
}

#[test]
fn incomplete_rows_are_dropped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dirty.csv");
    fs::write(
        &path,
        "age,income,claim_amount,num_claims,has_prior_fraud,is_fraud\n\
         30,50000,10000,2,0,0\n\
         40,,12000,1,0,1\n\
         51,80000,9000,,1,0\n\
         22,21000,47000,4,1,1\n",
    )
    .unwrap();

    let records = dataset::read_labeled(&path).unwrap();
    assert_eq!(records.len(), 2, "rows with missing values must be removed");
    assert_eq!(records[0].age, 30);
    assert_eq!(records[1].age, 22);
}

#[test]
fn non_binary_flags_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad_labels.csv");
    fs::write(
        &path,
        "age,income,claim_amount,num_claims,has_prior_fraud,is_fraud\n\
         30,50000,10000,2,0,3\n\
         40,60000,12000,1,2,0\n\
         22,21000,47000,4,1,1\n",
    )
    .unwrap();

    let records = dataset::read_labeled(&path).unwrap();
    assert_eq!(records.len(), 1, "rows with non-binary flags must be removed");
    assert_eq!(records[0].age, 22);

    // The cleaned rows must train without tripping the label-indexed
    // confusion matrix.
    let params = fraudsight_core::forest::ForestParams {
        n_trees: 2,
        ..Default::default()
    };
    fraudsight_core::trainer::train(&records, &params, 42).unwrap();
}

#[test]
fn missing_columns_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.csv");
    fs::write(&path, "age,income,claim_amount,num_claims\n30,50000,10000,2\n").unwrap();

    match dataset::read_labeled(&path) {
        Err(PipelineError::MissingColumns { missing }) => {
            assert_eq!(missing, vec!["has_prior_fraud".to_string(), "is_fraud".to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn empty_after_cleaning_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(
        &path,
        "age,income,claim_amount,num_claims,has_prior_fraud,is_fraud\n,,,,,\n",
    )
    .unwrap();

    assert!(matches!(
        dataset::read_labeled(&path),
        Err(PipelineError::EmptyDataset)
    ));
}

#[test]
fn absent_file_is_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    assert!(matches!(
        dataset::read_labeled(&path),
        Err(PipelineError::MissingFile { .. })
    ));
}
