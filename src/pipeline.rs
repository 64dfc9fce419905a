//! Runs the R-metric pipeline on a velocity field: latitude averaging, time smoothing,
//! wavenumber filtering and extraction of envelope and filtered wave.

use crate::config::RMetricConfig;
use crate::data_container::{HovmollerFilterData, RMetricOutput, VelocityField};
use crate::filters::filter::{sort_by_domain, Filter, FilterError};
use crate::filters::rolling_mean::TimeRollingMean;
use crate::filters::wavenumber::WavenumberBandPass;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("coordinate '{name}' has {coordinate} values but the data axis has {axis}")]
    Coordinates {
        name: &'static str,
        coordinate: usize,
        axis: usize,
    },

    #[error("no latitude between {lower} and {upper}")]
    EmptyLatitudeBand { lower: f64, upper: f64 },

    #[error("{stage}: {source}")]
    Filter {
        stage: String,
        #[source]
        source: FilterError,
    },

    #[error("filter stages produced no wavenumber filtered field")]
    MissingFilteredField,
}

/// Builds the filter stages described by the configuration, in execution order.
pub fn build_filters(config: &RMetricConfig) -> Vec<Box<dyn Filter>> {
    let mut filters: Vec<Box<dyn Filter>> = vec![
        Box::new(WavenumberBandPass::new(config.band)),
        Box::new(TimeRollingMean::new(config.smoothing.window)),
    ];
    sort_by_domain(&mut filters);
    filters
}

/// Applies every filter in order, feeding the output of one into the next.
pub fn apply_filters(
    filters: &[Box<dyn Filter>],
    input: HovmollerFilterData,
) -> Result<HovmollerFilterData, PipelineError> {
    filters.iter().try_fold(input, |data, filter| {
        let stage = filter.config().name;
        log::debug!("applying {stage}");
        filter.filter(&data).map_err(|source| PipelineError::Filter { stage, source })
    })
}

/// Checks the field against the configuration without running any filter.
///
/// Returns the `(time, lon)` shape of the smoothed Hovmöller field the filter would see.
pub fn validate(field: &VelocityField, config: &RMetricConfig) -> Result<(usize, usize), PipelineError> {
    field.validate()?;
    let (time_steps, _, lon_grids) = field.data.dim();

    let smoothing = TimeRollingMean::new(config.smoothing.window);
    smoothing
        .validate(time_steps)
        .map_err(|source| PipelineError::Filter {
            stage: smoothing.config().name,
            source,
        })?;

    let band_pass = WavenumberBandPass::new(config.band);
    config
        .band
        .validate(lon_grids)
        .map_err(|source| PipelineError::Filter {
            stage: band_pass.config().name,
            source,
        })?;

    Ok((time_steps - config.smoothing.window + 1, lon_grids))
}

/// Runs the full pipeline.
pub fn run(field: &VelocityField, config: &RMetricConfig) -> Result<RMetricOutput, PipelineError> {
    let start = Instant::now();
    validate(field, config)?;

    let hov = field.calc_hov(config.hovmoller.lat_min, config.hovmoller.lat_max)?;
    let filtered = apply_filters(&build_filters(config), hov)?;

    let k_filter = filtered
        .k_filter
        .as_ref()
        .ok_or(PipelineError::MissingFilteredField)?;
    let output = RMetricOutput::from_k_filter(
        filtered.time.clone(),
        filtered.lon.clone(),
        filtered.data.clone(),
        k_filter,
        config.band,
    );

    log::info!(
        "R-metric calculated on {:?} (time x lon). This took {:?}",
        output.r_metric.dim(),
        start.elapsed()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_container::WaveBand;
    use crate::filters::filter::FilterDomain;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array3};
    use std::f64::consts::PI;

    fn field(time_steps: usize, lon_grids: usize) -> VelocityField {
        VelocityField {
            time: Array1::from_shape_fn(time_steps, |i| i as f64 * 6.0),
            lat: Array1::linspace(80.0, 20.0, 7),
            lon: Array1::from_shape_fn(lon_grids, |i| i as f64 * 360.0 / lon_grids as f64),
            data: Array3::from_shape_fn((time_steps, 7, lon_grids), |(_, _, lo)| {
                8.0 * (2.0 * PI * 6.0 * lo as f64 / lon_grids as f64).cos()
            }),
        }
    }

    fn config(window: usize) -> RMetricConfig {
        let mut config = RMetricConfig::default();
        config.smoothing.window = window;
        config
    }

    #[test]
    fn test_build_filters_orders_time_before_wavenumber() {
        let filters = build_filters(&RMetricConfig::default());
        let domains: Vec<FilterDomain> = filters.iter().map(|f| f.config().domain).collect();
        assert_eq!(domains, vec![FilterDomain::Time, FilterDomain::Wavenumber]);
    }

    #[test]
    fn test_run_recovers_stationary_wave() {
        let output = run(&field(12, 72), &config(5)).unwrap();
        assert_eq!(output.r_metric.dim(), (8, 72));
        assert_eq!(output.time.len(), 8);
        assert_abs_diff_eq!(output.time[0], 12.0);
        for (&r, (&w, &v)) in output
            .r_metric
            .iter()
            .zip(output.filtered_wave.iter().zip(output.v.iter()))
        {
            assert_abs_diff_eq!(r, 8.0, epsilon = 1e-9);
            assert_abs_diff_eq!(w, v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_validate_reports_smoothed_shape() {
        assert_eq!(validate(&field(60, 64), &config(57)).unwrap(), (4, 64));
    }

    #[test]
    fn test_run_rejects_unrepresentable_band() {
        let mut cfg = config(3);
        cfg.band = WaveBand::new(4, 15);
        let err = run(&field(10, 30), &cfg).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Filter {
                source: FilterError::Band { .. },
                ..
            }
        ));
        assert!(err.to_string().starts_with("Wavenumber Band Pass"));
    }

    #[test]
    fn test_run_rejects_short_series() {
        let err = run(&field(10, 64), &config(57)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Filter {
                source: FilterError::InsufficientTimeSteps { .. },
                ..
            }
        ));
    }
}
