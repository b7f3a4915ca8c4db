//! Row-major numeric tables for sampled parameters and derived responses.

use std::collections::HashSet;

use crate::error::TableError;

/// Dense row-major matrix with a flat backing array.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    pub(crate) fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        Some(Self { data, rows, cols })
    }

    fn from_rows(rows: Vec<Vec<f64>>, cols: usize) -> Result<Self, TableError> {
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(TableError::RaggedRow {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            rows: n_rows,
            cols,
        })
    }

    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub(crate) fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub(crate) fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().skip(col).step_by(self.cols).copied()
    }

    pub(crate) fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Sampled model parameters: one row per sample, one named column per parameter.
///
/// Every value is finite and lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    names: Vec<String>,
    values: Matrix,
}

impl ParameterTable {
    /// Column names used by the five-parameter demonstration problem
    pub const DEFAULT_NAMES: [&'static str; 5] = ["v", "w", "x", "y", "z"];

    /// Build a table from rows of values.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        if rows.is_empty() || names.is_empty() {
            return Err(TableError::Empty);
        }
        let values = Matrix::from_rows(rows, names.len())?;
        Self::validated(names, values)
    }

    /// Build a table from a flat row-major buffer of `rows * names.len()` values.
    pub fn from_flat(names: Vec<String>, rows: usize, data: Vec<f64>) -> Result<Self, TableError> {
        if rows == 0 || names.is_empty() {
            return Err(TableError::Empty);
        }
        let cols = names.len();
        let found = data.len() / rows;
        let values = Matrix::from_flat(rows, cols, data).ok_or(TableError::RaggedRow {
            row: 0,
            expected: cols,
            found,
        })?;
        Self::validated(names, values)
    }

    /// Build a table using [`ParameterTable::default_names`] for the column count.
    pub fn with_default_names(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        Self::from_rows(Self::default_names(cols), rows)
    }

    /// `v, w, x, y, z` for five columns, `p0, p1, ...` otherwise.
    pub fn default_names(cols: usize) -> Vec<String> {
        if cols == Self::DEFAULT_NAMES.len() {
            Self::DEFAULT_NAMES.iter().map(|s| s.to_string()).collect()
        } else {
            (0..cols).map(|i| format!("p{i}")).collect()
        }
    }

    fn validated(names: Vec<String>, values: Matrix) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateName(name.clone()));
            }
        }

        for (idx, &value) in values.data().iter().enumerate() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TableError::ValueOutOfRange {
                    row: idx / values.cols,
                    col: idx % values.cols,
                    value,
                });
            }
        }

        Ok(Self { names, values })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.rows
    }

    pub fn is_empty(&self) -> bool {
        self.values.rows == 0
    }

    /// Number of parameters
    pub fn n_params(&self) -> usize {
        self.values.cols
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values.get(row, col)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        self.values.row(row)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.values.column(col)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Flat row-major view of all values
    pub fn as_flat(&self) -> &[f64] {
        self.values.data()
    }
}

/// Model responses derived from a parameter table, one row per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTable {
    labels: Vec<String>,
    values: Matrix,
}

impl ResponseTable {
    /// Build a response table from rows. Values only need to be finite.
    pub fn from_rows(labels: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        if rows.is_empty() || labels.is_empty() {
            return Err(TableError::Empty);
        }
        let values = Matrix::from_rows(rows, labels.len())?;
        if let Some(idx) = values.data().iter().position(|v| !v.is_finite()) {
            return Err(TableError::ValueOutOfRange {
                row: idx / values.cols,
                col: idx % values.cols,
                value: values.data()[idx],
            });
        }
        Ok(Self { labels, values })
    }

    pub(crate) fn from_matrix(labels: Vec<String>, values: Matrix) -> Self {
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.rows
    }

    pub fn is_empty(&self) -> bool {
        self.values.rows == 0
    }

    pub fn n_responses(&self) -> usize {
        self.values.cols
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values.get(row, col)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        self.values.row(row)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.values.column(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        ParameterTable::default_names(n)
    }

    #[test]
    fn test_from_rows_accessors() {
        let table = ParameterTable::from_rows(
            names(2),
            vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]],
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.n_params(), 2);
        assert_eq!(table.get(1, 1), 0.4);
        assert_eq!(table.row(2), &[0.5, 0.6]);
        assert_eq!(table.column(0).collect::<Vec<_>>(), vec![0.1, 0.3, 0.5]);
        assert_eq!(table.column_index("p1"), Some(1));
        assert_eq!(table.column_index("z"), None);
    }

    #[test]
    fn test_default_names() {
        assert_eq!(ParameterTable::default_names(5), vec!["v", "w", "x", "y", "z"]);
        assert_eq!(ParameterTable::default_names(3), vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            ParameterTable::from_rows(names(2), vec![]),
            Err(TableError::Empty)
        );
    }

    #[test]
    fn test_rejects_ragged_row() {
        let err = ParameterTable::from_rows(names(2), vec![vec![0.1, 0.2], vec![0.3]]).unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_and_nan() {
        let err = ParameterTable::from_rows(names(2), vec![vec![0.1, 1.5]]).unwrap_err();
        assert!(matches!(
            err,
            TableError::ValueOutOfRange { row: 0, col: 1, .. }
        ));

        let err = ParameterTable::from_rows(names(1), vec![vec![0.2], vec![f64::NAN]]).unwrap_err();
        assert!(matches!(
            err,
            TableError::ValueOutOfRange { row: 1, col: 0, .. }
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = ParameterTable::from_rows(
            vec!["a".to_string(), "a".to_string()],
            vec![vec![0.1, 0.2]],
        )
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateName("a".to_string()));
    }

    #[test]
    fn test_from_flat_length_mismatch() {
        let err = ParameterTable::from_flat(names(2), 2, vec![0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, TableError::RaggedRow { .. }));
    }

    #[test]
    fn test_matrix_from_flat_overflowing_shape() {
        assert!(Matrix::from_flat(usize::MAX / 2 + 1, 2, Vec::new()).is_none());
        assert!(Matrix::from_flat(2, 2, vec![0.0; 4]).is_some());
    }

    #[test]
    fn test_response_table_allows_values_above_one() {
        let table =
            ResponseTable::from_rows(vec!["a".into()], vec![vec![3.0], vec![-2.0]]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, 0), 3.0);
        assert!(ResponseTable::from_rows(vec!["a".into()], vec![vec![f64::INFINITY]]).is_err());
    }
}
