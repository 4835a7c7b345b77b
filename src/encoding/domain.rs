//! Encoded column identities, reference column sets and encoded vectors.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::common::error::{HccError, HccResult};

/// Identity of one encoded column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Column {
    /// Raw value of a numeric field.
    Numeric { field: String },
    /// 1.0 when a categorical field equals `value`, else 0.0.
    Indicator { field: String, value: String },
}

impl Column {
    pub fn numeric(field: impl Into<String>) -> Self {
        Column::Numeric {
            field: field.into(),
        }
    }

    pub fn indicator(field: impl Into<String>, value: impl Into<String>) -> Self {
        Column::Indicator {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Column::Numeric { field } | Column::Indicator { field, .. } => field,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Numeric { field } => f.write_str(field),
            Column::Indicator { field, value } => write!(f, "{field}={value}"),
        }
    }
}

/// Ordered column set fixed at training time.
///
/// Every vector handed to the model must have exactly these columns in this
/// order; the set is never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceColumns {
    columns: Vec<Column>,
    index: HashMap<Column, usize>,
}

impl ReferenceColumns {
    /// Build from an explicit column list; duplicates are rejected.
    pub fn from_columns(columns: Vec<Column>) -> HccResult<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (pos, col) in columns.iter().enumerate() {
            if index.insert(col.clone(), pos).is_some() {
                return Err(HccError::invalid(format!("duplicate reference column `{col}`")));
            }
        }
        Ok(Self { columns, index })
    }

    pub(crate) fn from_unique(columns: Vec<Column>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(pos, col)| (col.clone(), pos))
            .collect();
        Self { columns, index }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn position(&self, column: &Column) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &Column) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Distinct categorical fields that own at least one indicator column.
    pub fn indicator_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for col in &self.columns {
            if let Column::Indicator { field, .. } = col {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
        }
        fields
    }
}

/// Numeric feature vector aligned to a `ReferenceColumns` set.
#[derive(Clone, Debug, Default)]
pub struct EncodedVector {
    values: Vec<f64>,
}

impl EncodedVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// No entry carries information: every value is zero or missing.
    pub fn is_degenerate(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0 || v.is_nan())
    }

    /// Bitwise equality, so missing (`NaN`) entries compare equal to themselves.
    pub fn same_bits(&self, other: &EncodedVector) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// A case whose categorical values were partly or wholly unknown to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EncodingAnomaly {
    /// Categorical fields whose value matched no reference column.
    pub unrecognized: Vec<String>,
    /// The whole vector carries no non-zero entry.
    pub degenerate: bool,
}
