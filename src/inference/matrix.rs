use serde::Serialize;

/// Rectangular, row-major numeric table handed to a predictor.
///
/// Columns carry the trained feature names in the artifact's order, so row
/// `i` column `j` is always the value of feature `columns[j]` for record `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    data: Vec<f64>,
    rows: usize,
}

impl FeatureMatrix {
    /// Build a matrix from already-ordered rows. Returns `None` when any row
    /// length differs from the column count.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = columns.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        let n_rows = rows.len();

        for row in rows {
            if row.len() != cols {
                return None;
            }
            data.extend(row);
        }

        Some(Self {
            columns,
            data,
            rows: n_rows,
        })
    }

    /// Start an empty matrix with room for `capacity` rows.
    pub(crate) fn with_columns(columns: Vec<String>, capacity: usize) -> Self {
        let data = Vec::with_capacity(capacity * columns.len());
        Self {
            columns,
            data,
            rows: 0,
        }
    }

    /// Append one row by looking up every column. The row has exactly one
    /// value per column, or nothing is appended.
    pub(crate) fn push_row_with<E>(&mut self, mut value: impl FnMut(&str) -> Result<f64, E>) -> Result<(), E> {
        let start = self.data.len();
        for column in &self.columns {
            match value(column) {
                Ok(x) => self.data.push(x),
                Err(e) => {
                    self.data.truncate(start);
                    return Err(e);
                }
            }
        }
        self.rows += 1;
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        let cols = self.n_cols();
        Some(&self.data[index * cols..(index + 1) * cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).filter_map(move |i| self.row(i))
    }
}
