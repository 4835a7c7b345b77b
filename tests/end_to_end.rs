//! Start-up on a generated dataset with the full canonical schema.

use std::io::Write;

use hccsurv::inference::service::bootstrap_with;
use hccsurv::schema::{hcc, FieldKind};
use hccsurv::training::service::train_or_load;
use hccsurv::training::TrainConfig;
use hccsurv::{bootstrap, AppCfg, HccError, Outcome, RawCase, RejectReason};

const ROWS: usize = 60;

/// Values for row `i` in declared field order. Survivors (even rows) have
/// low AFP, the others high AFP; every other field cycles independently.
fn row_values(i: usize) -> Vec<String> {
    let survives = i % 2 == 0;
    hcc()
        .field_specs()
        .iter()
        .enumerate()
        .map(|(f, field)| match &field.kind {
            FieldKind::Categorical { options } => options[(i / 2 + f) % options.len()].clone(),
            FieldKind::Numeric { range: Some(r) } if field.name == "AFP" => {
                let frac = (i % 10) as f64 / 50.0;
                let span = r.max - r.min;
                let v = if survives { r.min + span * frac } else { r.max - span * frac };
                v.to_string()
            }
            FieldKind::Numeric { range: Some(r) } => {
                let frac = ((i * 7 + f) % 10) as f64 / 10.0;
                (r.min + (r.max - r.min) * frac).to_string()
            }
            FieldKind::Numeric { range: None } => (40 + (i * 3) % 37).to_string(),
        })
        .collect()
}

fn label(i: usize) -> &'static str {
    if i % 2 == 0 {
        "Lives"
    } else {
        "Dies"
    }
}

fn write_dataset() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let header: Vec<&str> = hcc().names().chain(["Class"]).collect();
    writeln!(file, "{}", header.join(",")).unwrap();
    for i in 0..ROWS {
        writeln!(file, "{},{}", row_values(i).join(","), label(i)).unwrap();
    }
    file.flush().unwrap();
    file
}

fn cfg_for(file: &tempfile::NamedTempFile) -> AppCfg {
    AppCfg {
        dataset_path: file.path().to_path_buf(),
        ..AppCfg::default()
    }
}

#[test]
fn trains_and_predicts_on_the_canonical_schema() {
    let file = write_dataset();
    let engine = bootstrap(&cfg_for(&file)).unwrap();
    assert_eq!(engine.schema().len(), 49);
    // Numeric fields plus the categorical values seen in training.
    assert!(engine.reference().len() > 23);

    for i in [0, 1, 2, 3, 10, 11] {
        let case = RawCase::from_ordered(hcc(), row_values(i)).unwrap();
        let prediction = engine.infer(&case).unwrap();
        let expected = if label(i) == "Lives" {
            Outcome::Survives
        } else {
            Outcome::DoesNotSurvive
        };
        assert_eq!(prediction.outcome, expected, "row {i}");
    }
}

#[test]
fn held_out_report_is_produced() {
    let file = write_dataset();
    let dataset = hccsurv::data::service::load(file.path(), hcc()).unwrap();
    assert_eq!(dataset.len(), ROWS);

    let artifacts = train_or_load(&dataset, hcc(), &TrainConfig::default()).unwrap();
    let report = artifacts.report.unwrap();
    // ceil(60 * 0.33) = 20 held-out rows.
    assert_eq!(report.support(), 20);
    assert!(report.accuracy > 0.9, "{report}");
}

#[test]
fn range_violations_are_reported_per_field() {
    let file = write_dataset();
    let engine = bootstrap(&cfg_for(&file)).unwrap();

    let mut values = row_values(4);
    let afp = hcc().names().position(|n| n == "AFP").unwrap();
    values[afp] = "3000".to_string();
    let case = RawCase::from_ordered(hcc(), values).unwrap();

    let rejection = engine.infer(&case).unwrap_err();
    assert_eq!(rejection.field, "AFP");
    assert_eq!(rejection.reason, RejectReason::OutOfRange);
}

#[test]
fn positional_case_needs_every_field() {
    let err = RawCase::from_ordered(hcc(), vec!["Male"; 48]).unwrap_err();
    assert!(matches!(err, HccError::InvalidInput(_)));
}

#[test]
fn startup_fails_on_a_single_outcome_dataset() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let header: Vec<&str> = hcc().names().chain(["Class"]).collect();
    writeln!(file, "{}", header.join(",")).unwrap();
    for i in 0..4 {
        writeln!(file, "{},Lives", row_values(i).join(",")).unwrap();
    }
    file.flush().unwrap();

    let err = bootstrap(&cfg_for(&file)).unwrap_err();
    assert!(matches!(err, HccError::TrainingData(_)), "{err}");
}

#[test]
fn startup_fails_when_a_field_is_missing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Gender,AFP,Class\nMale,1,Lives\nFemale,2,Dies").unwrap();
    file.flush().unwrap();

    let err = bootstrap(&cfg_for(&file)).unwrap_err();
    assert!(matches!(err, HccError::DatasetFormat(_)), "{err}");

    // The same file is fine for a schema that only needs those fields.
    let reduced = hcc().subset(&["Gender", "AFP"]).unwrap();
    assert!(bootstrap_with(&cfg_for(&file), reduced).is_ok());
}
