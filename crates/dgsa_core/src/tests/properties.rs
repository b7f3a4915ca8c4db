//! Property checks for response formulas and the distance matrix

use proptest::prelude::*;

use crate::distance::pairwise_distances;
use crate::model::{ParameterTable, ResponseTable};
use crate::responses::derive_responses;

fn parameter_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(0.0f64..=1.0, 5), 1..40)
}

fn response_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..5).prop_flat_map(|cols| {
        prop::collection::vec(prop::collection::vec(-100.0f64..100.0, cols), 1..30)
    })
}

proptest! {
    #[test]
    fn response_formulas_hold_for_every_row(rows in parameter_rows()) {
        let params = ParameterTable::with_default_names(rows).unwrap();
        let responses = derive_responses(&params).unwrap();

        prop_assert_eq!(responses.len(), params.len());
        for i in 0..params.len() {
            let p = params.row(i);
            let r = responses.row(i);
            prop_assert_eq!(r[0], p[4]);
            prop_assert_eq!(r[1], (p[2] * p[3] - 1.0).abs());
            prop_assert_eq!(r[2], p[2].min(p[3]).sqrt());
            prop_assert_eq!(r[3], p[4].sqrt());
        }
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal(rows in response_rows()) {
        let cols = rows[0].len();
        let labels = (0..cols).map(|c| format!("r{c}")).collect();
        let responses = ResponseTable::from_rows(labels, rows).unwrap();
        let d = pairwise_distances(&responses);

        prop_assert_eq!(d.len(), responses.len());
        for i in 0..d.len() {
            prop_assert_eq!(d.get(i, i), 0.0);
            for j in 0..d.len() {
                prop_assert_eq!(d.get(i, j), d.get(j, i));
                prop_assert!(d.get(i, j) >= 0.0);
            }
        }
    }
}
