//! Outcomes, predictions and their wire form.

use serde::Serialize;

use crate::common::error::{ErrorCode, HccError};
use crate::encoding::EncodingAnomaly;
use crate::validation::{RejectReason, Rejection};

/// Model label meaning the patient survives; every other label does not.
pub const SURVIVAL_LABEL: &str = "Lives";

/// Binary survival outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Survives,
    DoesNotSurvive,
}

impl Outcome {
    pub fn from_label(label: &str) -> Self {
        if label == SURVIVAL_LABEL {
            Outcome::Survives
        } else {
            Outcome::DoesNotSurvive
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Survives => "Patient Will Survive",
            Outcome::DoesNotSurvive => "Patient Will NOT Survive",
        }
    }
}

/// A successful inference.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub outcome: Outcome,
    /// Raw label the model produced.
    pub label: String,
    /// Present only when anomaly flagging is on and the encoding was unusual.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<EncodingAnomaly>,
}

/// JSON envelope returned across the foreign boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Outcome {
        ok: bool,
        outcome: Outcome,
        message: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        anomaly: Option<EncodingAnomaly>,
    },
    Rejected {
        ok: bool,
        code: u32,
        field: String,
        reason: RejectReason,
        message: &'static str,
    },
    Error {
        ok: bool,
        code: u32,
        message: String,
    },
}

impl Response {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| Self::FALLBACK.to_string())
    }

    pub const FALLBACK: &'static str = r#"{"ok":false,"code":5,"message":"internal error"}"#;
}

impl From<Result<Prediction, Rejection>> for Response {
    fn from(result: Result<Prediction, Rejection>) -> Self {
        match result {
            Ok(p) => Response::Outcome {
                ok: true,
                outcome: p.outcome,
                message: p.outcome.message(),
                anomaly: p.anomaly,
            },
            Err(r) => Response::Rejected {
                ok: false,
                code: ErrorCode::Rejected as u32,
                message: r.message(),
                field: r.field,
                reason: r.reason,
            },
        }
    }
}

impl From<&HccError> for Response {
    fn from(err: &HccError) -> Self {
        Response::Error {
            ok: false,
            code: err.code() as u32,
            message: err.to_string(),
        }
    }
}
