// VALIDATION: Untyped Request Payloads → Ordered Feature Matrix
//
// Requests arrive as JSON objects keyed by feature name. Before anything
// reaches the predictor, every record must carry exactly the trained feature
// set with numeric values. Unknown or missing names are rejected outright;
// nothing is coerced or silently dropped.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::inference::FeatureMatrix;
use crate::models::FeatureSchema;

/// One validated input record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: BTreeMap<String, f64>,
}

impl FeatureRecord {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Validates payloads against the schema of one loaded artifact.
#[derive(Debug, Clone, Copy)]
pub struct RequestValidator<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> RequestValidator<'a> {
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn validate_single(&self, raw: &Map<String, Value>) -> Result<FeatureRecord, ValidationError> {
        let keys_match = raw.len() == self.schema.n_features()
            && raw.keys().all(|k| self.schema.position(k).is_some());

        if !keys_match {
            let mut received: Vec<String> = raw.keys().cloned().collect();
            received.sort();
            return Err(ValidationError::SchemaMismatch {
                expected: self.schema.sorted_names(),
                received,
            });
        }

        let mut values = BTreeMap::new();
        for (name, value) in raw {
            values.insert(name.clone(), numeric_value(name, value)?);
        }

        Ok(FeatureRecord { values })
    }

    /// Validate every record, stopping at the first bad one.
    pub fn validate_batch(&self, raw: &[Map<String, Value>]) -> Result<Vec<FeatureRecord>, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        raw.iter()
            .enumerate()
            .map(|(index, record)| {
                self.validate_single(record)
                    .map_err(|source| ValidationError::InvalidRecord {
                        index,
                        source: Box::new(source),
                    })
            })
            .collect()
    }

    /// Lay records out as rows, with columns in the schema's order.
    pub fn build_matrix(&self, records: &[FeatureRecord]) -> Result<FeatureMatrix, ValidationError> {
        if records.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        let mut matrix = FeatureMatrix::with_columns(self.schema.names().to_vec(), records.len());

        for (index, record) in records.iter().enumerate() {
            matrix.push_row_with(|name| {
                record.get(name).ok_or_else(|| ValidationError::InvalidRecord {
                    index,
                    source: Box::new(ValidationError::SchemaMismatch {
                        expected: self.schema.sorted_names(),
                        received: record.names().map(str::to_string).collect(),
                    }),
                })
            })?;
        }

        Ok(matrix)
    }

    pub fn single_matrix(&self, raw: &Map<String, Value>) -> Result<FeatureMatrix, ValidationError> {
        let record = self.validate_single(raw)?;
        self.build_matrix(std::slice::from_ref(&record))
    }

    pub fn batch_matrix(&self, raw: &[Map<String, Value>]) -> Result<FeatureMatrix, ValidationError> {
        let records = self.validate_batch(raw)?;
        self.build_matrix(&records)
    }
}

fn numeric_value(name: &str, value: &Value) -> Result<f64, ValidationError> {
    let kind = match value {
        Value::Number(n) => match n.as_f64() {
            Some(x) if x.is_finite() => return Ok(x),
            _ => "a non-finite number",
        },
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };

    Err(ValidationError::InvalidValue {
        feature: name.to_string(),
        reason: format!("must be a finite number, got {kind}"),
    })
}
