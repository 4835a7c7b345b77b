//! Range (and optionally domain) checks over a raw case.

use crate::data::domain::RawCase;
use crate::schema::{FieldKind, Schema};

use super::domain::{RejectReason, Rejection};

/// Checks cases field by field in declaration order; the first violation wins.
#[derive(Copy, Clone, Debug, Default)]
pub struct Validator {
    strict_domain: bool,
}

impl Validator {
    /// Lenient validator: ranges only, categorical values are not checked.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(strict_domain: bool) -> Self {
        Self { strict_domain }
    }

    pub fn validate(&self, schema: &Schema, case: &RawCase) -> Result<(), Rejection> {
        for field in schema.field_specs() {
            let Some(value) = case.get(&field.name) else {
                return Err(Rejection::new(&field.name, RejectReason::Missing));
            };
            match &field.kind {
                FieldKind::Numeric { range: Some(range) } => {
                    // Infinities parse and then fail the range; NaN never compares.
                    let parsed = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| !v.is_nan());
                    match parsed {
                        None => return Err(Rejection::new(&field.name, RejectReason::NotNumeric)),
                        Some(v) if !range.contains(v) => {
                            return Err(Rejection::new(&field.name, RejectReason::OutOfRange))
                        }
                        Some(_) => {}
                    }
                }
                FieldKind::Numeric { range: None } => {}
                FieldKind::Categorical { options } => {
                    if self.strict_domain && !options.iter().any(|o| o == value) {
                        return Err(Rejection::new(&field.name, RejectReason::NotInDomain));
                    }
                }
            }
        }
        Ok(())
    }
}
