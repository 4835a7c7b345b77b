//! Categorical expansion and reconciliation against a reference column set.

use std::collections::HashMap;

use crate::data::domain::RawCase;
use crate::schema::{FieldKind, Schema};

use super::domain::{Column, EncodedVector, EncodingAnomaly, ReferenceColumns};

/// Expands raw cases into numeric vectors for one schema.
#[derive(Copy, Clone, Debug)]
pub struct Encoder<'s> {
    schema: &'s Schema,
}

impl<'s> Encoder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Define the reference columns from training rows and encode every row against them.
    ///
    /// Fields keep declaration order. A numeric field yields one column; a
    /// categorical field yields one indicator per value observed in `rows`,
    /// in first-seen order.
    pub fn establish_reference(&self, rows: &[RawCase]) -> (Vec<EncodedVector>, ReferenceColumns) {
        let mut columns = Vec::new();
        for field in self.schema.field_specs() {
            match &field.kind {
                FieldKind::Numeric { .. } => columns.push(Column::numeric(&field.name)),
                FieldKind::Categorical { .. } => {
                    let mut seen: Vec<&str> = Vec::new();
                    for value in rows.iter().filter_map(|row| row.get(&field.name)) {
                        if !seen.contains(&value) {
                            seen.push(value);
                            columns.push(Column::indicator(&field.name, value));
                        }
                    }
                }
            }
        }

        // Field names are unique and values are deduplicated per field.
        let reference = ReferenceColumns::from_unique(columns);
        let vectors = rows
            .iter()
            .map(|row| self.encode_against_reference(row, &reference))
            .collect();
        (vectors, reference)
    }

    /// Encode one case so its columns equal `reference` exactly.
    ///
    /// Reference columns the case does not produce are 0; columns the case
    /// produces that the reference lacks are dropped.
    pub fn encode_against_reference(&self, row: &RawCase, reference: &ReferenceColumns) -> EncodedVector {
        let produced = self.expand(row);
        let values = reference
            .columns()
            .iter()
            .map(|col| produced.get(col).copied().unwrap_or(0.0))
            .collect();
        EncodedVector::new(values)
    }

    /// Encode and report categorical values the reference has never seen.
    pub fn encode_checked(
        &self,
        row: &RawCase,
        reference: &ReferenceColumns,
    ) -> (EncodedVector, Option<EncodingAnomaly>) {
        let vector = self.encode_against_reference(row, reference);

        let unrecognized: Vec<String> = reference
            .indicator_fields()
            .into_iter()
            .filter(|field| {
                let known = row
                    .get(field)
                    .map(|value| reference.contains(&Column::indicator(*field, value)))
                    .unwrap_or(false);
                !known
            })
            .map(str::to_string)
            .collect();
        let degenerate = vector.is_degenerate();

        let anomaly = (degenerate || !unrecognized.is_empty()).then(|| EncodingAnomaly {
            unrecognized,
            degenerate,
        });
        (vector, anomaly)
    }

    /// The case's own columns, before reconciliation.
    fn expand(&self, row: &RawCase) -> HashMap<Column, f64> {
        let mut produced = HashMap::with_capacity(self.schema.len());
        for field in self.schema.field_specs() {
            let Some(value) = row.get(&field.name) else {
                continue;
            };
            match &field.kind {
                FieldKind::Numeric { .. } => {
                    produced.insert(Column::numeric(&field.name), parse_numeric(value));
                }
                FieldKind::Categorical { .. } => {
                    produced.insert(Column::indicator(&field.name, value), 1.0);
                }
            }
        }
        produced
    }
}

/// Parse a numeric cell; anything unparsable is missing (`NaN`).
pub fn parse_numeric(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(f64::NAN)
}
