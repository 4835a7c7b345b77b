//! Per-request rejection values.

use std::fmt;

use serde::Serialize;

/// Why a field value was not accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The case has no value for the field.
    Missing,
    /// A ranged field whose value is not a finite real number.
    NotNumeric,
    OutOfRange,
    /// Categorical value outside the declared options (strict mode only).
    NotInDomain,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Missing => "missing",
            RejectReason::NotNumeric => "not_numeric",
            RejectReason::OutOfRange => "out_of_range",
            RejectReason::NotInDomain => "not_in_domain",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First field that failed validation. Recoverable: the caller fixes the
/// value and asks again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub field: String,
    pub reason: RejectReason,
}

impl Rejection {
    pub const MESSAGE: &'static str = "Value Not Accepted";

    pub fn new(field: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }

    /// Fixed user-facing message; detail lives in `field` and `reason`.
    pub fn message(&self) -> &'static str {
        Self::MESSAGE
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", Self::MESSAGE, self.field, self.reason)
    }
}
