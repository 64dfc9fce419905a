//! R-metric: envelope amplitude of Rossby wave packets (Röthlisberger et al. 2018).
//!
//! The meridional wind is averaged over a latitude band, smoothed in time and filtered to zonal
//! wavenumbers 4 to 15 (Zimin et al. 2003). The magnitude of the complex filtered signal is the
//! R-metric, its real part the filtered wave.
//!
//! ```no_run
//! use r_metric::config::RMetricConfig;
//! use r_metric::io::open_from_npz;
//! use r_metric::pipeline::run;
//! use std::path::Path;
//!
//! let config = RMetricConfig::default();
//! let field = open_from_npz(Path::new("v_6h.npz"), &config.output.variable).unwrap();
//! let output = run(&field, &config).unwrap();
//! println!("{:?}", output.r_metric.dim());
//! ```

pub mod config;
pub mod data_container;
pub mod filters;
pub mod hovmoller;
pub mod io;
pub mod math_tools;
pub mod pipeline;
