//! This module defines the data structures passed between the pipeline stages: the raw 3-D
//! velocity field, the 2-D Hovmöller field that the filters operate on, and the final R-metric
//! output.

use crate::filters::filter::FilterError;
use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Gridded meridional wind on (time, lat, lon).
///
/// # Fields
/// - `time`: Time axis, one value per time step.
/// - `lat`: Latitude axis in degrees, either orientation.
/// - `lon`: Longitude axis in degrees, uniformly spaced over one full cycle.
/// - `data`: The velocity values with shape `(time.len(), lat.len(), lon.len())`.
#[derive(Clone, Debug, Default)]
pub struct VelocityField {
    pub time: Array1<f64>,
    pub lat: Array1<f64>,
    pub lon: Array1<f64>,
    pub data: Array3<f64>,
}

/// A Hovmöller field (time x lon) and the stages derived from it.
///
/// `k_filter` stays `None` until the wavenumber filter has run.
#[derive(Clone, Debug, Default)]
pub struct HovmollerFilterData {
    pub time: Array1<f64>,
    pub lon: Array1<f64>,
    pub data: Array2<f64>,
    pub k_filter: Option<Array2<Complex64>>,
}

impl HovmollerFilterData {
    pub fn new(time: Array1<f64>, lon: Array1<f64>, data: Array2<f64>) -> Self {
        HovmollerFilterData {
            time,
            lon,
            data,
            k_filter: None,
        }
    }

    pub fn time_steps(&self) -> usize {
        self.data.nrows()
    }

    pub fn lon_grids(&self) -> usize {
        self.data.ncols()
    }

    /// Checks that `time` and `lon` match the rows and columns of `data`.
    pub fn validate(&self) -> Result<(), FilterError> {
        for (name, coordinate, axis) in [
            ("time", self.time.len(), self.time_steps()),
            ("lon", self.lon.len(), self.lon_grids()),
        ] {
            if coordinate != axis {
                return Err(FilterError::Coordinates {
                    name,
                    coordinate,
                    axis,
                });
            }
        }
        Ok(())
    }
}

/// Inclusive wavenumber interval `[kmin, kmax]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveBand {
    pub kmin: usize,
    pub kmax: usize,
}

impl Default for WaveBand {
    fn default() -> Self {
        WaveBand { kmin: 4, kmax: 15 }
    }
}

impl WaveBand {
    pub fn new(kmin: usize, kmax: usize) -> Self {
        WaveBand { kmin, kmax }
    }

    /// Number of wavenumbers contained in the band.
    pub fn width(&self) -> usize {
        self.kmax.saturating_sub(self.kmin) + 1
    }

    pub fn wavenumbers(&self) -> std::ops::RangeInclusive<usize> {
        self.kmin..=self.kmax
    }
}

/// The persisted result of an R-metric run.
///
/// # Fields
/// - `v`: The smoothed Hovmöller field the filter was applied to.
/// - `r_metric`: Envelope amplitude, `|k_filter|`.
/// - `filtered_wave`: Real part of `k_filter`.
#[derive(Clone, Debug)]
pub struct RMetricOutput {
    pub time: Array1<f64>,
    pub lon: Array1<f64>,
    pub v: Array2<f64>,
    pub r_metric: Array2<f64>,
    pub filtered_wave: Array2<f64>,
    pub band: WaveBand,
}

impl RMetricOutput {
    /// Splits a complex filtered field into envelope and filtered wave.
    pub fn from_k_filter(
        time: Array1<f64>,
        lon: Array1<f64>,
        v: Array2<f64>,
        k_filter: &Array2<Complex64>,
        band: WaveBand,
    ) -> Self {
        RMetricOutput {
            time,
            lon,
            v,
            r_metric: k_filter.mapv(|c| c.norm()),
            filtered_wave: k_filter.mapv(|c| c.re),
            band,
        }
    }
}
