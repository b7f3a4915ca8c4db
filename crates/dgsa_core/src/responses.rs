//! Synthetic model responses for the five-parameter demonstration problem
//!
//! Only parameters 2, 3 and 4 (`x`, `y`, `z`) drive the responses; `v` and `w`
//! are inert, which is what the sensitivity ranking should reveal.

use crate::error::TableError;
use crate::model::{Matrix, ParameterTable, ResponseTable};

/// Minimum number of parameter columns the response formulas read
pub const REQUIRED_PARAMS: usize = 5;

/// Labels of the derived response columns
pub const RESPONSE_LABELS: [&str; 4] = ["z", "|xy - 1|", "sqrt(min(x, y))", "sqrt(z)"];

/// Evaluate the four response formulas for one parameter row
#[inline]
fn evaluate_row(p: &[f64]) -> [f64; 4] {
    let (x, y, z) = (p[2], p[3], p[4]);
    [z, (x * y - 1.0).abs(), x.min(y).sqrt(), z.sqrt()]
}

/// Derive the response table from sampled parameters.
pub fn derive_responses(params: &ParameterTable) -> Result<ResponseTable, TableError> {
    if params.n_params() < REQUIRED_PARAMS {
        return Err(TableError::TooFewColumns {
            required: REQUIRED_PARAMS,
            found: params.n_params(),
        });
    }

    let n = params.len();
    let cols = RESPONSE_LABELS.len();
    let mut data = Vec::with_capacity(n * cols);
    for row in 0..n {
        data.extend_from_slice(&evaluate_row(params.row(row)));
    }

    let values = Matrix::from_flat(n, cols, data).ok_or(TableError::Empty)?;
    let labels = RESPONSE_LABELS.iter().map(|s| s.to_string()).collect();
    Ok(ResponseTable::from_matrix(labels, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_row() {
        let params =
            ParameterTable::with_default_names(vec![vec![0.9, 0.8, 0.5, 0.25, 0.64]]).unwrap();
        let responses = derive_responses(&params).unwrap();

        assert_eq!(responses.n_responses(), 4);
        assert_eq!(responses.get(0, 0), 0.64);
        assert!((responses.get(0, 1) - 0.875).abs() < 1e-12);
        assert!((responses.get(0, 2) - 0.5).abs() < 1e-12);
        assert!((responses.get(0, 3) - 0.8).abs() < 1e-12);
        assert_eq!(responses.labels()[1], "|xy - 1|");
    }

    #[test]
    fn test_inert_parameters_do_not_matter() {
        let a = ParameterTable::with_default_names(vec![vec![0.0, 0.0, 0.3, 0.7, 0.2]]).unwrap();
        let b = ParameterTable::with_default_names(vec![vec![1.0, 0.6, 0.3, 0.7, 0.2]]).unwrap();
        assert_eq!(
            derive_responses(&a).unwrap().row(0),
            derive_responses(&b).unwrap().row(0)
        );
    }

    #[test]
    fn test_requires_five_columns() {
        let params = ParameterTable::with_default_names(vec![vec![0.1, 0.2, 0.3]]).unwrap();
        assert_eq!(
            derive_responses(&params),
            Err(TableError::TooFewColumns {
                required: 5,
                found: 3
            })
        );
    }
}
