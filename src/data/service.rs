//! Turns a raw table into schema-aligned rows and labels.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::common::error::{HccError, HccResult};
use crate::common::log::elapsed_ms;
use crate::schema::{Schema, UNKNOWN};

use super::domain::{DataRepo, Dataset, DatasetId, RawCase, Table};
use super::repo_fs::FsDataRepo;

/// Load a dataset file from disk.
pub fn load(path: impl AsRef<Path>, schema: &Schema) -> HccResult<Dataset> {
    load_from(&FsDataRepo::new(path), schema)
}

/// Load a dataset from any source, checking its header against `schema`.
///
/// The last header column is the outcome label. Every schema field must be
/// present (any order); other columns are ignored. Empty cells become `"?"`
/// for fields that declare it and stay empty otherwise.
pub fn load_from(repo: &dyn DataRepo, schema: &Schema) -> HccResult<Dataset> {
    let start = Instant::now();
    let table = repo.read_table()?;
    let dataset = assemble(table, schema)?;

    tracing::info!(
        ev = "dataset_loaded",
        dataset = %dataset.id,
        rows = dataset.len(),
        label = %dataset.label_column,
        dur_ms = elapsed_ms(start) as u64,
    );
    Ok(dataset)
}

fn assemble(table: Table, schema: &Schema) -> HccResult<Dataset> {
    let Table {
        header,
        records,
        fingerprint,
    } = table;

    let (label_column, feature_header) = header
        .split_last()
        .ok_or_else(|| HccError::dataset_format("dataset has no header row"))?;
    if feature_header.is_empty() {
        return Err(HccError::dataset_format(
            "header contains only the label column",
        ));
    }
    if schema.contains(label_column) {
        return Err(HccError::dataset_format(format!(
            "last column `{label_column}` must be the label, but it is a feature field"
        )));
    }

    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(feature_header.len());
    for (pos, name) in feature_header.iter().enumerate() {
        if positions.insert(name.as_str(), pos).is_some() {
            return Err(HccError::dataset_format(format!(
                "duplicate header column `{name}`"
            )));
        }
        if !schema.contains(name) {
            tracing::warn!(ev = "dataset_extra_column", column = %name, "column is not a schema field; ignored");
        }
    }

    let missing: Vec<&str> = schema
        .names()
        .filter(|name| !positions.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(HccError::dataset_format(format!(
            "header is missing schema fields: {}",
            missing.join(", ")
        )));
    }

    let label_pos = feature_header.len();
    let mut rows = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());
    for (line, record) in records.into_iter().enumerate() {
        // +2: one for the header, one for 1-based numbering.
        let row_number = line + 2;
        let label = record.get(label_pos).cloned().unwrap_or_default();
        if label.is_empty() {
            return Err(HccError::dataset_format(format!(
                "row {row_number}: empty `{label_column}` label"
            )));
        }

        let case: RawCase = schema
            .field_specs()
            .iter()
            .map(|field| {
                let cell = record
                    .get(positions[field.name.as_str()])
                    .cloned()
                    .unwrap_or_default();
                let value = if cell.is_empty() && field.accepts_unknown() {
                    UNKNOWN.to_string()
                } else {
                    cell
                };
                (field.name.clone(), value)
            })
            .collect();

        rows.push(case);
        labels.push(label);
    }

    Ok(Dataset::new(
        DatasetId(fingerprint),
        label_column.clone(),
        rows,
        labels,
    ))
}
