//! Runtime configuration loaded from the environment and an optional JSON file.

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::common::error::{HccError, HccResult};
use crate::training::domain::TrainConfig;

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub dataset_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `hccsurv=debug`.
    pub log_filter: String,
    pub log_json: bool,
    pub train: TrainConfig,
    /// Reject categorical values outside their declared options.
    pub strict_domain: bool,
    /// Log and attach encoding anomalies to predictions.
    pub flag_anomalies: bool,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/hcc_dataset.csv"),
            log_filter: "info".to_string(),
            log_json: true,
            train: TrainConfig::default(),
            strict_domain: false,
            flag_anomalies: false,
        }
    }
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> HccResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup. `load` passes the environment.
    pub fn from_lookup<F>(lookup: F) -> HccResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let train = match lookup("HCCSURV_TRAIN_CONFIG") {
            Some(path) => {
                let raw = fs::read_to_string(&path).map_err(|err| {
                    HccError::config(format!("cannot read train config `{path}`: {err}"))
                })?;
                TrainConfig::from_json(&raw)?
            }
            None => defaults.train,
        };

        Ok(Self {
            dataset_path: lookup("HCCSURV_DATASET")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            log_filter: lookup("HCCSURV_LOG").unwrap_or(defaults.log_filter),
            log_json: parse_flag(&lookup, "HCCSURV_LOG_JSON", defaults.log_json)?,
            train,
            strict_domain: parse_flag(&lookup, "HCCSURV_STRICT_DOMAIN", defaults.strict_domain)?,
            flag_anomalies: parse_flag(&lookup, "HCCSURV_FLAG_ANOMALIES", defaults.flag_anomalies)?,
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> HccResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(HccError::config(format!("{key}: expected a boolean, got `{other}`"))),
        },
    }
}
