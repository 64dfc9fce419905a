//! This module provides the `Filter` trait and related structures for the processing stages that are
//! applied to a Hovmöller field (`HovmollerFilterData`), together with the error type shared by all
//! filters.

use crate::data_container::HovmollerFilterData;
use std::fmt::Debug;
use thiserror::Error;

/// Errors raised while validating or applying a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("wavenumber filtering requires a 2-D (time x lon) field, got {ndim} dimension(s)")]
    Rank { ndim: usize },

    #[error("longitude grid is empty")]
    EmptyGrid,

    #[error("wavenumber band [{kmin}, {kmax}] is not representable on {lon_grids} longitude points (need kmin <= kmax and 2 * kmax < {lon_grids})")]
    Band {
        kmin: usize,
        kmax: usize,
        lon_grids: usize,
    },

    #[error("smoothing window must be at least 1 time step")]
    Window,

    #[error("{time_steps} time step(s) left, rolling window of {window} needs at least {window}")]
    InsufficientTimeSteps { time_steps: usize, window: usize },

    #[error("coordinate '{name}' has {coordinate} values but the data axis has {axis}")]
    Coordinates {
        name: &'static str,
        coordinate: usize,
        axis: usize,
    },

    #[error("fft failed: {0}")]
    Fft(#[from] realfft::FftError),
}

/// The `Filter` trait defines a single processing stage of the R-metric pipeline.
///
/// Filters must implement:
/// - A `config` function to provide metadata for the filter.
/// - A `filter` function that consumes a `HovmollerFilterData` and returns a new one.
///
/// Filters never mutate their input. A filter that fails validation returns an error and no
/// partial output.
pub trait Filter: Send + Sync + Debug {
    /// Returns the filter configuration, including name, description and domain.
    fn config(&self) -> FilterConfig;

    /// Applies the filter to the given Hovmöller data.
    fn filter(&self, input_data: &HovmollerFilterData) -> Result<HovmollerFilterData, FilterError>;
}

/// The `FilterDomain` enum specifies the domain and execution order of filters.
///
/// Variants are declared in execution order, `Time` filters always run before `Wavenumber`
/// filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterDomain {
    /// Filters acting along the time axis (smoothing).
    Time,
    /// Filters acting on the longitudinal spectrum.
    Wavenumber,
}

/// A structure representing the configuration and metadata of a filter.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub name: String,
    pub description: String,
    pub domain: FilterDomain,
}

/// Sorts filter stages by their domain, keeping the insertion order within a domain.
pub fn sort_by_domain(filters: &mut [Box<dyn Filter>]) {
    filters.sort_by_key(|f| f.config().domain);
}
