//! Processing stages applied to the Hovmöller field.
//!
//! # Filter Categories
//!
//! * **Time Domain Filters**: smoothing along the time axis, applied first.
//!
//! * **Wavenumber Filters**: operate on the longitudinal spectrum of every time step.
//!
//! Each filter implements the `Filter` trait defined in the `filter` module.

/// Core filter interfaces and the shared error type.
pub mod filter;

/// Centred running mean along time with removal of incomplete windows.
pub mod rolling_mean;

/// Longitudinal discrete Fourier transform, normalised by the grid length.
pub mod spectral;

/// Band-limited reconstruction giving the R-metric envelope and the filtered wave.
pub mod wavenumber;
