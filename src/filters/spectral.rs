//! Longitudinal spectrum of a Hovmöller field.

use crate::filters::filter::FilterError;
use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex64;
use realfft::RealFftPlanner;

/// Computes the discrete Fourier transform of every time slice along longitude, divided by the
/// number of longitude points.
///
/// The real-to-complex transform only yields wavenumbers `0..=L/2`, the remaining coefficients are
/// filled from the conjugate symmetry of a real signal so that the returned array has the same
/// `(time, lon)` shape as the input.
///
/// # Arguments
/// - `da`: Real field with shape `(T, L)`.
///
/// # Returns
/// Complex coefficients with shape `(T, L)`, or `FilterError::EmptyGrid` if `L == 0`.
pub fn lon_spectrum(da: ArrayView2<f64>) -> Result<Array2<Complex64>, FilterError> {
    let (time_steps, lon_grids) = da.dim();
    if lon_grids == 0 {
        return Err(FilterError::EmptyGrid);
    }

    let mut real_planner = RealFftPlanner::<f64>::new();
    let r2c = real_planner.plan_fft_forward(lon_grids);
    let norm = lon_grids as f64;

    let mut spectrum = Array2::<Complex64>::zeros((time_steps, lon_grids));
    (spectrum.axis_iter_mut(Axis(0)), da.axis_iter(Axis(0)))
        .into_par_iter()
        .try_for_each(|(mut coefficients, row)| -> Result<(), FilterError> {
            let mut input = row.to_vec();
            let mut half = r2c.make_output_vec();
            r2c.process(&mut input, &mut half)?;
            for (k, c) in half.iter().enumerate() {
                coefficients[k] = *c / norm;
            }
            // negative wavenumbers
            for k in half.len()..lon_grids {
                coefficients[k] = coefficients[lon_grids - k].conj();
            }
            Ok(())
        })?;

    Ok(spectrum)
}
