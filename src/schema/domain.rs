//! Field specifications and the ordered schema built from them.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::common::error::SchemaError;

/// Inclusive numeric bounds declared for a field.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Whether a field holds one of a fixed set of labels or a real number.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Categorical { options: Vec<String> },
    Numeric { range: Option<NumericRange> },
}

/// A single named input field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn categorical<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn numeric(name: impl Into<String>, range: Option<NumericRange>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric { range },
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FieldKind::Categorical { .. })
    }

    pub fn range(&self) -> Option<NumericRange> {
        match &self.kind {
            FieldKind::Numeric { range } => *range,
            FieldKind::Categorical { .. } => None,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Categorical { options } => Some(options),
            FieldKind::Numeric { .. } => None,
        }
    }

    /// Whether the literal `"?"` (unknown) is a declared option.
    pub fn accepts_unknown(&self) -> bool {
        self.options()
            .map(|opts| opts.iter().any(|o| o == UNKNOWN))
            .unwrap_or(false)
    }
}

/// Literal used by categorical fields to mean "unknown".
pub const UNKNOWN: &str = "?";

/// Ordered, immutable collection of field specifications.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting duplicate names, empty option sets and inverted ranges.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (pos, field) in fields.iter().enumerate() {
            match &field.kind {
                FieldKind::Categorical { options } if options.is_empty() => {
                    return Err(SchemaError::EmptyOptions(field.name.clone()));
                }
                FieldKind::Numeric { range: Some(r) } if r.min > r.max => {
                    return Err(SchemaError::InvertedRange(field.name.clone()));
                }
                _ => {}
            }
            if index.insert(field.name.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    /// Build from declarations known to be well formed (compile-time constants).
    pub(crate) fn from_declared(fields: Vec<FieldSpec>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(pos, f)| (f.name.clone(), pos))
            .collect();
        Self { fields, index }
    }

    /// Narrow the schema to `names`, keeping this schema's declaration order.
    pub fn subset(&self, names: &[&str]) -> Result<Self, SchemaError> {
        for name in names {
            if !self.index.contains_key(*name) {
                return Err(SchemaError::UnknownField(name.to_string()));
            }
        }
        let kept = self
            .fields
            .iter()
            .filter(|f| names.contains(&f.name.as_str()))
            .cloned()
            .collect();
        Self::new(kept)
    }

    pub fn field_specs(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&pos| &self.fields[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn range_of(&self, name: &str) -> Option<NumericRange> {
        self.field(name).and_then(FieldSpec::range)
    }

    pub fn options_of(&self, name: &str) -> Option<&[String]> {
        self.field(name).and_then(FieldSpec::options)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields carrying a declared numeric range, in declaration order.
    pub fn ranged_fields(&self) -> impl Iterator<Item = (&str, NumericRange)> {
        self.fields
            .iter()
            .filter_map(|f| f.range().map(|r| (f.name.as_str(), r)))
    }

    /// Human readable list of accepted ranges.
    pub fn range_table(&self) -> RangeTable {
        RangeTable {
            rows: self
                .ranged_fields()
                .map(|(name, range)| (name.to_string(), range))
                .collect(),
        }
    }
}

/// Declared ranges rendered one per line as `Field:   min -> max`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeTable {
    pub rows: Vec<(String, NumericRange)>,
}

impl fmt::Display for RangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, range) in &self.rows {
            writeln!(f, "{name}:   {} -> {}", range.min, range.max)?;
        }
        Ok(())
    }
}
