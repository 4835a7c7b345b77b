//! Core dataset definitions and contracts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::{HccError, HccResult};
use crate::schema::Schema;

/// Fingerprint of the bytes a dataset was loaded from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DatasetId(pub u64);

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ds-{:016x}", self.0)
    }
}

/// One patient's raw field values, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCase {
    values: BTreeMap<String, String>,
}

impl RawCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a case from values listed in the schema's declaration order.
    pub fn from_ordered<I, S>(schema: &Schema, values: I) -> HccResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() != schema.len() {
            return Err(HccError::invalid(format!(
                "expected {} values in field order, got {}",
                schema.len(),
                values.len()
            )));
        }
        Ok(schema
            .names()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value))
            .collect())
    }

    /// Builder-style insert, handy when assembling a case by hand.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawCase {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Historical patients with their outcome labels, row-aligned.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub id: DatasetId,
    pub label_column: String,
    pub rows: Vec<RawCase>,
    pub labels: Vec<String>,
}

impl Dataset {
    pub fn new(id: DatasetId, label_column: String, rows: Vec<RawCase>, labels: Vec<String>) -> Self {
        debug_assert_eq!(rows.len(), labels.len());
        Self {
            id,
            label_column,
            rows,
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header plus string cells, as read from a tabular source.
#[derive(Clone, Debug, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub records: Vec<Vec<String>>,
    pub fingerprint: u64,
}

/// Source of tabular dataset contents.
pub trait DataRepo {
    fn read_table(&self) -> HccResult<Table>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::hcc;

    #[test]
    fn from_ordered_maps_positions_to_field_names() {
        let schema = hcc().subset(&["Gender", "AFP"]).unwrap();
        let case = RawCase::from_ordered(&schema, ["Male", "10"]).unwrap();
        assert_eq!(case.get("Gender"), Some("Male"));
        assert_eq!(case.get("AFP"), Some("10"));
        assert_eq!(case.len(), 2);
    }

    #[test]
    fn from_ordered_rejects_wrong_arity() {
        let schema = hcc().subset(&["Gender", "AFP"]).unwrap();
        let err = RawCase::from_ordered(&schema, ["Male"]).unwrap_err();
        assert!(matches!(err, HccError::InvalidInput(_)));
    }

    #[test]
    fn raw_case_is_a_plain_json_object() {
        let case = RawCase::new().with("Gender", "Female").with("AFP", "3.5");
        let json = serde_json::to_string(&case).unwrap();
        assert_eq!(json, r#"{"AFP":"3.5","Gender":"Female"}"#);
        let back: RawCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);
    }

    #[test]
    fn dataset_id_renders_as_hex() {
        assert_eq!(DatasetId(0xab).to_string(), "ds-00000000000000ab");
    }
}
