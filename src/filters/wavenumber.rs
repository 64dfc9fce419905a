//! Band-limited wavenumber filter after Zimin et al. (2003), with the band of Röthlisberger et
//! al. (2018).
//!
//! For every time step `t` and longitude index `lo` the filter reconstructs
//!
//! ```text
//! k_filter[t, lo] = 2 * sum_{k = kmin}^{kmax} V[t, k] * exp(2 pi i k lo / L)
//! ```
//!
//! where `V` is the longitudinal spectrum divided by `L`. The factor 2 accounts for the
//! negative wavenumbers which carry the complex conjugate of the same information for a real
//! input. `|k_filter|` is the wave packet envelope (R-metric), `Re(k_filter)` the filtered wave.

use crate::data_container::{HovmollerFilterData, WaveBand};
use crate::filters::filter::{Filter, FilterConfig, FilterDomain, FilterError};
use crate::filters::spectral::lon_spectrum;
use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, ArrayView2, ArrayViewD, Axis, Ix2};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::time::Instant;

impl WaveBand {
    /// Checks that the band can be represented on `lon_grids` points without reaching the
    /// negative-frequency half of the spectrum.
    pub fn validate(&self, lon_grids: usize) -> Result<(), FilterError> {
        if lon_grids == 0 {
            return Err(FilterError::EmptyGrid);
        }
        if self.kmin > self.kmax || 2 * self.kmax >= lon_grids {
            return Err(FilterError::Band {
                kmin: self.kmin,
                kmax: self.kmax,
                lon_grids,
            });
        }
        Ok(())
    }
}

/// Complex exponentials `2 * exp(2 pi i k lo / L)` for every wavenumber of the band (rows) and
/// every longitude index (columns). `band` must already be validated against `lon_grids`.
fn reconstruction_basis(band: &WaveBand, lon_grids: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((band.width(), lon_grids), |(j, lo)| {
        let k = band.kmin + j;
        // reduce k * lo modulo L to keep the phase argument small
        let phase = 2.0 * PI * ((k * lo) % lon_grids) as f64 / lon_grids as f64;
        Complex64::from_polar(2.0, phase)
    })
}

/// Reconstructs the band-limited signal from a longitudinal spectrum.
///
/// # Arguments
/// - `spectrum`: Coefficients with shape `(T, L)` as returned by `lon_spectrum`.
/// - `band`: The wavenumbers to keep.
///
/// # Returns
/// The complex filtered field with shape `(T, L)`.
pub fn band_reconstruction(
    spectrum: ArrayView2<Complex64>,
    band: &WaveBand,
) -> Result<Array2<Complex64>, FilterError> {
    let (time_steps, lon_grids) = spectrum.dim();
    band.validate(lon_grids)?;

    let basis = reconstruction_basis(band, lon_grids);
    let coefficients = spectrum.slice(s![.., band.kmin..=band.kmax]);

    let mut k_filter = Array2::<Complex64>::zeros((time_steps, lon_grids));
    (k_filter.axis_iter_mut(Axis(0)), coefficients.axis_iter(Axis(0)))
        .into_par_iter()
        .for_each(|(mut out, v)| {
            out.assign(&v.dot(&basis));
        });

    Ok(k_filter)
}

/// Applies the wavenumber filter to a real `(time, lon)` field.
pub fn wave_filter(da: ArrayView2<f64>, band: &WaveBand) -> Result<Array2<Complex64>, FilterError> {
    band.validate(da.ncols())?;
    let spectrum = lon_spectrum(da)?;
    band_reconstruction(spectrum.view(), band)
}

/// Same as `wave_filter`, for arrays whose rank is only known at runtime.
///
/// Anything but a 2-D array is rejected with `FilterError::Rank` before any computation.
pub fn wave_filter_dyn(
    da: ArrayViewD<f64>,
    band: &WaveBand,
) -> Result<Array2<Complex64>, FilterError> {
    let ndim = da.ndim();
    let da = da
        .into_dimensionality::<Ix2>()
        .map_err(|_| FilterError::Rank { ndim })?;
    wave_filter(da, band)
}

/// Pipeline stage that attaches the band-limited reconstruction to the data.
#[derive(Clone, Debug, Default)]
pub struct WavenumberBandPass {
    pub band: WaveBand,
}

impl WavenumberBandPass {
    pub fn new(band: WaveBand) -> Self {
        WavenumberBandPass { band }
    }
}

impl Filter for WavenumberBandPass {
    fn config(&self) -> FilterConfig {
        FilterConfig {
            name: "Wavenumber Band Pass".to_string(),
            description: format!(
                "Band-limited reconstruction of zonal wavenumbers {} to {}.",
                self.band.kmin, self.band.kmax
            ),
            domain: FilterDomain::Wavenumber,
        }
    }

    fn filter(
        &self,
        input_data: &HovmollerFilterData,
    ) -> Result<HovmollerFilterData, FilterError> {
        input_data.validate()?;
        self.band.validate(input_data.lon_grids())?;

        let start = Instant::now();
        log::info!(
            "starting R-metric calculation on {} time steps x {} longitudes",
            input_data.time_steps(),
            input_data.lon_grids()
        );
        log::debug!("wavenumber band [{}, {}]", self.band.kmin, self.band.kmax);

        let spectrum = lon_spectrum(input_data.data.view())?;
        let k_filter = band_reconstruction(spectrum.view(), &self.band)?;

        log::info!("wavenumber filter done. This took {:?}", start.elapsed());

        let mut output_data = input_data.clone();
        output_data.k_filter = Some(k_filter);
        Ok(output_data)
    }
}
