//! Inference engine and its one-time start-up.

use std::sync::Arc;
use std::time::Instant;

use crate::common::config::AppCfg;
use crate::common::error::{HccError, HccResult};
use crate::common::log::elapsed_ms;
use crate::data::domain::RawCase;
use crate::data::service as data_service;
use crate::encoding::{Encoder, ReferenceColumns};
use crate::schema::{hcc, Schema};
use crate::training::domain::{Classifier, TrainedArtifacts};
use crate::training::service::train_or_load;
use crate::validation::{Rejection, Validator};

use super::domain::{Outcome, Prediction};

/// Validator, reference columns and fitted model behind one call.
///
/// Holds only immutable shared state, so one engine serves concurrent callers
/// without locking.
#[derive(Clone)]
pub struct InferenceEngine {
    schema: Arc<Schema>,
    validator: Validator,
    reference: Arc<ReferenceColumns>,
    model: Arc<dyn Classifier>,
    flag_anomalies: bool,
}

impl InferenceEngine {
    pub fn new(schema: Arc<Schema>, artifacts: &TrainedArtifacts) -> Self {
        Self::from_parts(
            schema,
            Arc::clone(&artifacts.reference),
            Arc::clone(&artifacts.model),
        )
    }

    /// Build from already-fitted parts, e.g. a stub classifier in tests.
    pub fn from_parts(
        schema: Arc<Schema>,
        reference: Arc<ReferenceColumns>,
        model: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            schema,
            validator: Validator::new(),
            reference,
            model,
            flag_anomalies: false,
        }
    }

    pub fn with_strict_domain(mut self, strict: bool) -> Self {
        self.validator = Validator::strict(strict);
        self
    }

    pub fn with_anomaly_flagging(mut self, flag: bool) -> Self {
        self.flag_anomalies = flag;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn reference(&self) -> &ReferenceColumns {
        &self.reference
    }

    /// Validate, encode, predict. A rejected case never reaches the model.
    pub fn infer(&self, case: &RawCase) -> Result<Prediction, Rejection> {
        if let Err(rejection) = self.validator.validate(&self.schema, case) {
            tracing::info!(
                ev = "case_rejected",
                field = %rejection.field,
                reason = %rejection.reason,
            );
            return Err(rejection);
        }

        let (vector, anomaly) = Encoder::new(&self.schema).encode_checked(case, &self.reference);
        if let Some(a) = &anomaly {
            tracing::warn!(
                ev = "encoding_anomaly",
                unrecognized = ?a.unrecognized,
                degenerate = a.degenerate,
                attached = self.flag_anomalies,
            );
        }
        let anomaly = anomaly.filter(|_| self.flag_anomalies);

        let label = self.model.predict(vector.as_slice()).to_string();
        let outcome = Outcome::from_label(&label);
        tracing::debug!(ev = "case_predicted", label = %label, outcome = ?outcome);
        Ok(Prediction {
            outcome,
            label,
            anomaly,
        })
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("fields", &self.schema.len())
            .field("reference_columns", &self.reference.len())
            .field("classes", &self.model.classes())
            .field("validator", &self.validator)
            .field("flag_anomalies", &self.flag_anomalies)
            .finish()
    }
}

/// Load the dataset, train once and build the engine over the canonical schema.
///
/// Any failure aborts start-up; no engine exists without a trained model.
pub fn bootstrap(cfg: &AppCfg) -> HccResult<InferenceEngine> {
    bootstrap_with(cfg, hcc().clone())
}

/// As [`bootstrap`], with an explicit schema.
pub fn bootstrap_with(cfg: &AppCfg, schema: Schema) -> HccResult<InferenceEngine> {
    let start = Instant::now();
    let result = data_service::load(&cfg.dataset_path, &schema)
        .and_then(|dataset| train_or_load(&dataset, &schema, &cfg.train));

    match result {
        Ok(artifacts) => {
            tracing::info!(
                ev = "engine_ready",
                dataset = %artifacts.dataset,
                columns = artifacts.reference.len(),
                strict_domain = cfg.strict_domain,
                flag_anomalies = cfg.flag_anomalies,
                dur_ms = elapsed_ms(start) as u64,
            );
            Ok(InferenceEngine::new(Arc::new(schema), &artifacts)
                .with_strict_domain(cfg.strict_domain)
                .with_anomaly_flagging(cfg.flag_anomalies))
        }
        Err(err) => {
            tracing::error!(
                ev = "startup_failed",
                code = err.code() as u32,
                path = %cfg.dataset_path.display(),
                error = %err,
            );
            Err(err)
        }
    }
}

/// Parse a JSON object of field -> value into a case.
///
/// Non-string scalars are taken by their JSON text so `{"AFP": 10}` works.
pub fn case_from_json(raw: &str) -> HccResult<RawCase> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| HccError::invalid(format!("case json: {err}")))?;
    let serde_json::Value::Object(map) = value else {
        return Err(HccError::invalid("case must be a JSON object"));
    };
    map.into_iter()
        .map(|(field, value)| match value {
            serde_json::Value::String(s) => Ok((field, s)),
            serde_json::Value::Number(n) => Ok((field, n.to_string())),
            serde_json::Value::Bool(b) => Ok((field, b.to_string())),
            other => Err(HccError::invalid(format!(
                "field `{field}` must be a scalar, got {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Column;
    use crate::validation::RejectReason;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Fixed {
        label: &'static str,
        classes: Vec<String>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                classes: vec!["Dies".into(), "Lives".into()],
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Classifier for Fixed {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict(&self, _: &[f64]) -> &str {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.label
        }
    }

    fn engine(model: Arc<Fixed>) -> InferenceEngine {
        let schema = hcc().subset(&["Gender", "AFP"]).unwrap();
        let reference = ReferenceColumns::from_columns(vec![
            Column::indicator("Gender", "Male"),
            Column::indicator("Gender", "Female"),
            Column::numeric("AFP"),
        ])
        .unwrap();
        InferenceEngine::from_parts(Arc::new(schema), Arc::new(reference), model)
    }

    #[test]
    fn label_maps_to_outcome() {
        let model = Arc::new(Fixed::new("Dies"));
        let engine = engine(model.clone());
        let case = RawCase::new().with("Gender", "Female").with("AFP", "5");
        let p = engine.infer(&case).unwrap();
        assert_eq!(p.outcome, Outcome::DoesNotSurvive);
        assert_eq!(p.label, "Dies");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rejected_case_skips_the_model() {
        let model = Arc::new(Fixed::new("Lives"));
        let engine = engine(model.clone());
        let case = RawCase::new().with("Gender", "Male").with("AFP", "abc");
        let rejection = engine.infer(&case).unwrap_err();
        assert_eq!(rejection, Rejection::new("AFP", RejectReason::NotNumeric));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn anomalies_attach_only_when_flagged() {
        let model = Arc::new(Fixed::new("Lives"));
        let case = RawCase::new().with("Gender", "?").with("AFP", "0");

        let quiet = engine(model.clone()).infer(&case).unwrap();
        assert!(quiet.anomaly.is_none());

        let flagged = engine(model).with_anomaly_flagging(true).infer(&case).unwrap();
        let anomaly = flagged.anomaly.unwrap();
        assert_eq!(anomaly.unrecognized, vec!["Gender"]);
        assert!(anomaly.degenerate);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn anomalies_are_logged_even_when_not_attached() {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let case = RawCase::new().with("Gender", "?").with("AFP", "0");
        let prediction = tracing::subscriber::with_default(subscriber, || {
            engine(Arc::new(Fixed::new("Lives"))).infer(&case).unwrap()
        });

        assert!(prediction.anomaly.is_none());
        let text = logs.text();
        assert!(text.contains("encoding_anomaly"), "{text}");
        assert!(text.contains("degenerate=true"), "{text}");
    }

    #[test]
    fn strict_engine_rejects_unknown_categories() {
        let engine = engine(Arc::new(Fixed::new("Lives"))).with_strict_domain(true);
        let case = RawCase::new().with("Gender", "Other").with("AFP", "1");
        assert_eq!(
            engine.infer(&case).unwrap_err().reason,
            RejectReason::NotInDomain
        );
    }

    #[test]
    fn case_json_accepts_strings_and_numbers() {
        let case = case_from_json(r#"{"Gender":"Male","AFP":10,"Age":61.5}"#).unwrap();
        assert_eq!(case.get("Gender"), Some("Male"));
        assert_eq!(case.get("AFP"), Some("10"));
        assert_eq!(case.get("Age"), Some("61.5"));

        assert!(matches!(case_from_json("[1,2]"), Err(HccError::InvalidInput(_))));
        assert!(matches!(case_from_json(r#"{"AFP":[1]}"#), Err(HccError::InvalidInput(_))));
        assert!(matches!(case_from_json("{"), Err(HccError::InvalidInput(_))));
    }

    #[test]
    fn bootstrap_fails_without_a_dataset() {
        let cfg = AppCfg {
            dataset_path: "definitely/not/here.csv".into(),
            ..AppCfg::default()
        };
        let err = bootstrap(&cfg).unwrap_err();
        assert!(matches!(err, HccError::DatasetFormat(_)), "{err}");
    }
}
