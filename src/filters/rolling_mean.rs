//! Centred running mean along the time axis.
//!
//! Only complete windows without missing values are kept, so the output loses `window / 2` time
//! steps at the start and `(window - 1) / 2` at the end, and any time step whose window touches a
//! NaN is dropped as well.

use crate::data_container::HovmollerFilterData;
use crate::filters::filter::{Filter, FilterConfig, FilterDomain, FilterError};
use crate::math_tools::rolling_mean;
use ndarray::{Array1, Array2, Axis};
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct TimeRollingMean {
    /// Window length in time steps.
    pub window: usize,
}

impl Default for TimeRollingMean {
    /// 14 days of 6-hourly data plus one step to keep the window centred.
    fn default() -> Self {
        TimeRollingMean { window: 57 }
    }
}

impl TimeRollingMean {
    pub fn new(window: usize) -> Self {
        TimeRollingMean { window }
    }

    pub fn validate(&self, time_steps: usize) -> Result<(), FilterError> {
        if self.window == 0 {
            return Err(FilterError::Window);
        }
        if time_steps < self.window {
            return Err(FilterError::InsufficientTimeSteps {
                time_steps,
                window: self.window,
            });
        }
        Ok(())
    }
}

impl Filter for TimeRollingMean {
    fn config(&self) -> FilterConfig {
        FilterConfig {
            name: "Time Rolling Mean".to_string(),
            description: format!(
                "Centred {}-step running mean, incomplete windows dropped.",
                self.window
            ),
            domain: FilterDomain::Time,
        }
    }

    fn filter(
        &self,
        input_data: &HovmollerFilterData,
    ) -> Result<HovmollerFilterData, FilterError> {
        input_data.validate()?;
        self.validate(input_data.time_steps())?;
        let start = Instant::now();

        let smoothed = rolling_mean(input_data.data.view(), self.window);
        let offset = self.window / 2;

        // keep only windows without any NaN along longitude
        let keep: Vec<usize> = smoothed
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(_, row)| row.iter().all(|v| !v.is_nan()))
            .map(|(i, _)| i)
            .collect();

        let dropped = input_data.time_steps() - keep.len();
        if keep.is_empty() {
            return Err(FilterError::InsufficientTimeSteps {
                time_steps: 0,
                window: self.window,
            });
        }
        if keep.len() < smoothed.nrows() {
            log::warn!(
                "dropping {} time step(s) with missing values after smoothing",
                smoothed.nrows() - keep.len()
            );
        }

        let time: Array1<f64> = keep
            .iter()
            .map(|&i| input_data.time[i + offset])
            .collect();
        let data: Array2<f64> = smoothed.select(Axis(0), &keep);

        log::info!(
            "time smoothing ({} steps) dropped {} of {} time steps. This took {:?}",
            self.window,
            dropped,
            input_data.time_steps(),
            start.elapsed()
        );

        Ok(HovmollerFilterData::new(time, input_data.lon.clone(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn field(time_steps: usize, lon_grids: usize) -> HovmollerFilterData {
        let time = Array1::from_shape_fn(time_steps, |i| i as f64 * 6.0);
        let lon = Array1::linspace(0.0, 360.0 - 360.0 / lon_grids as f64, lon_grids);
        let data = Array2::from_shape_fn((time_steps, lon_grids), |(t, lo)| (t * 10 + lo) as f64);
        HovmollerFilterData::new(time, lon, data)
    }

    #[test]
    fn test_odd_window_is_centred() {
        let input = field(10, 2);
        let output = TimeRollingMean::new(3).filter(&input).unwrap();
        assert_eq!(output.time_steps(), 8);
        // first full window covers t = 0..=2, labelled with t = 1
        assert_abs_diff_eq!(output.time[0], 6.0);
        assert_abs_diff_eq!(output.data[[0, 0]], 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(output.data[[0, 1]], 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(*output.time.last().unwrap(), 48.0);
        assert_eq!(output.lon, input.lon);
    }

    #[test]
    fn test_even_window_label_follows_upper_centre() {
        // window 4 over t = 0..=3 is labelled with t = 2
        let input = field(6, 1);
        let output = TimeRollingMean::new(4).filter(&input).unwrap();
        assert_eq!(output.time_steps(), 3);
        assert_abs_diff_eq!(output.time[0], 12.0);
        assert_abs_diff_eq!(output.data[[0, 0]], 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_window_drops_28_steps_per_side() {
        let input = field(100, 4);
        let output = TimeRollingMean::default().filter(&input).unwrap();
        assert_eq!(output.time_steps(), 100 - 56);
        assert_abs_diff_eq!(output.time[0], 28.0 * 6.0);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let input = field(5, 3);
        let output = TimeRollingMean::new(1).filter(&input).unwrap();
        assert_eq!(output.data, input.data);
        assert_eq!(output.time, input.time);
    }

    #[test]
    fn test_windows_touching_nan_are_dropped() {
        let mut input = field(7, 2);
        input.data[[3, 1]] = f64::NAN;
        let output = TimeRollingMean::new(3).filter(&input).unwrap();
        // windows starting at 1, 2, 3 contain t = 3
        assert_eq!(output.time, array![6.0, 30.0]);
    }

    #[test]
    fn test_invalid_windows_are_rejected() {
        let input = field(5, 2);
        assert!(matches!(
            TimeRollingMean::new(0).filter(&input),
            Err(FilterError::Window)
        ));
        assert!(matches!(
            TimeRollingMean::new(6).filter(&input),
            Err(FilterError::InsufficientTimeSteps {
                time_steps: 5,
                window: 6
            })
        ));

        let mut all_nan = field(3, 1);
        all_nan.data.fill(f64::NAN);
        assert!(TimeRollingMean::new(3).filter(&all_nan).is_err());
    }

    #[test]
    fn test_mismatched_time_axis_is_an_error() {
        let input = HovmollerFilterData::new(
            Array1::linspace(0.0, 24.0, 5),
            Array1::linspace(0.0, 270.0, 4),
            Array2::ones((10, 4)),
        );
        assert!(matches!(
            TimeRollingMean::new(3).filter(&input),
            Err(FilterError::Coordinates {
                name: "time",
                coordinate: 5,
                axis: 10
            })
        ));
    }
}
