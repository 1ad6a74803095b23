//! Marker allocation across the groups of one section.
//!
//! Exactly one group, the one holding the smallest per-row minimum, receives
//! [`Marker::Special`]; every other group gets [`Marker::Neutral`]. Ties go to
//! the first group in input order. Groups without a usable minimum (empty
//! rows, NaN) never receive the special marker.

use serde::Serialize;

/// Marker assigned to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Group holding the section's smallest value
    Special,
    /// Every other group
    Neutral,
}

/// A group exposing the minimum of its row values.
pub trait RowMinimum {
    /// Smallest value in the row, or `None` if the row has no values.
    fn row_minimum(&self) -> Option<f64>;
}

impl RowMinimum for f64 {
    fn row_minimum(&self) -> Option<f64> {
        Some(*self)
    }
}

impl RowMinimum for [f64] {
    fn row_minimum(&self) -> Option<f64> {
        self.iter().copied().filter(|v| !v.is_nan()).reduce(f64::min)
    }
}

impl RowMinimum for Vec<f64> {
    fn row_minimum(&self) -> Option<f64> {
        self.as_slice().row_minimum()
    }
}

/// Index of the group with the smallest minimum (first occurrence on ties).
pub fn select_special<G: RowMinimum>(groups: &[G]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, group) in groups.iter().enumerate() {
        let Some(min) = group.row_minimum().filter(|m| !m.is_nan()) else {
            continue;
        };
        if best.map_or(true, |(_, current)| min < current) {
            best = Some((index, min));
        }
    }
    best.map(|(index, _)| index)
}

/// One marker per group, in input order.
///
/// # Example
///
/// ```
/// use synth_report::allocation::{allocate_markers, Marker};
///
/// let rows = vec![vec![5.1, 4.9], vec![4.8, 6.0], vec![4.8]];
/// assert_eq!(
///     allocate_markers(&rows),
///     vec![Marker::Neutral, Marker::Special, Marker::Neutral]
/// );
/// ```
pub fn allocate_markers<G: RowMinimum>(groups: &[G]) -> Vec<Marker> {
    let special = select_special(groups);
    (0..groups.len())
        .map(|index| {
            if Some(index) == special {
                Marker::Special
            } else {
                Marker::Neutral
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        let groups: Vec<f64> = Vec::new();
        assert_eq!(select_special(&groups), None);
        assert!(allocate_markers(&groups).is_empty());
    }

    #[test]
    fn test_single_group_is_special() {
        assert_eq!(allocate_markers(&[3.0]), vec![Marker::Special]);
    }

    #[test]
    fn test_tie_goes_to_first() {
        assert_eq!(select_special(&[2.0, 1.0, 1.0, 3.0]), Some(1));
    }

    #[test]
    fn test_empty_and_nan_rows_skipped() {
        let rows = vec![vec![], vec![f64::NAN], vec![7.0, f64::NAN], vec![8.0]];
        assert_eq!(select_special(&rows), Some(2));
    }

    #[test]
    fn test_all_rows_unusable() {
        let rows: Vec<Vec<f64>> = vec![vec![], vec![f64::NAN]];
        assert_eq!(
            allocate_markers(&rows),
            vec![Marker::Neutral, Marker::Neutral]
        );
    }

    proptest! {
        /// Exactly one special marker, on a group whose minimum is the global one.
        #[test]
        fn prop_exactly_one_special(values in prop::collection::vec(-1e3..1e3f64, 1..30)) {
            let markers = allocate_markers(&values);
            let specials: Vec<usize> = markers
                .iter()
                .enumerate()
                .filter(|(_, m)| **m == Marker::Special)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(specials.len(), 1);

            let global = values.iter().copied().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(values[specials[0]], global);
            prop_assert!(values[..specials[0]].iter().all(|v| *v > global));
        }
    }
}
