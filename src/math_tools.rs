//! This module provides the array reductions used by the pipeline glue: NaN-skipping means along
//! an axis and running means along time.

use ndarray::parallel::prelude::*;
use ndarray::{Array, Array2, ArrayView, ArrayView2, Axis, Dimension, RemoveAxis, Zip};

/// Mean along `axis` ignoring NaN values, matching numpy's `nanmean`.
///
/// Lanes that only contain NaN (or are empty) yield NaN.
pub fn nanmean_axis<D>(a: ArrayView<f64, D>, axis: Axis) -> Array<f64, D::Smaller>
where
    D: Dimension + RemoveAxis,
{
    a.map_axis(axis, |lane| {
        let (sum, count) = lane
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    })
}

/// Trailing running mean over `window` rows of a `(time, x)` array.
///
/// Row `i` of the result is the mean of rows `i..i + window`, so the result has
/// `nrows - window + 1` rows. NaN values propagate into every window that contains them.
/// Returns an empty array if `window` is zero or larger than the number of rows.
pub fn rolling_mean(a: ArrayView2<f64>, window: usize) -> Array2<f64> {
    let (rows, cols) = a.dim();
    if window == 0 || window > rows {
        return Array2::zeros((0, cols));
    }

    let mut out = Array2::<f64>::zeros((rows - window + 1, cols));
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let block = a.slice(ndarray::s![i..i + window, ..]);
            Zip::from(&mut row)
                .and(block.axis_iter(Axis(1)))
                .for_each(|r, column| {
                    *r = column.sum() / window as f64;
                });
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array3};

    #[test]
    fn test_nanmean_skips_missing_values() {
        let a = array![[1.0, f64::NAN, 3.0], [f64::NAN, f64::NAN, f64::NAN]];
        let m = nanmean_axis(a.view(), Axis(1));
        assert_abs_diff_eq!(m[0], 2.0, epsilon = 1e-12);
        assert!(m[1].is_nan());
    }

    #[test]
    fn test_nanmean_reduces_middle_axis() {
        let a = Array3::from_shape_fn((2, 3, 4), |(t, lat, lon)| (t + lat * 10 + lon) as f64);
        let m = nanmean_axis(a.view(), Axis(1));
        assert_eq!(m.dim(), (2, 4));
        assert_abs_diff_eq!(m[[1, 2]], 13.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_mean_values() {
        let a = array![[1.0, 0.0], [2.0, 0.0], [3.0, 3.0], [6.0, 3.0]];
        let m = rolling_mean(a.view(), 2);
        assert_eq!(m.dim(), (3, 2));
        assert_abs_diff_eq!(m[[0, 0]], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m[[1, 1]], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m[[2, 0]], 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_mean_degenerate_windows() {
        let a = Array2::<f64>::ones((3, 5));
        assert_eq!(rolling_mean(a.view(), 0).dim(), (0, 5));
        assert_eq!(rolling_mean(a.view(), 4).dim(), (0, 5));
        assert_eq!(rolling_mean(a.view(), 3).dim(), (1, 5));
    }
}
