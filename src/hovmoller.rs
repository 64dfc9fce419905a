//! Reduction of the 3-D velocity field to a Hovmöller field by averaging over a latitude band.

use crate::data_container::{HovmollerFilterData, VelocityField};
use crate::math_tools::nanmean_axis;
use crate::pipeline::PipelineError;
use ndarray::Axis;

impl VelocityField {
    /// Checks that the coordinate vectors agree with the data shape.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let (time_steps, lats, lons) = self.data.dim();
        let expected = [
            ("time", self.time.len(), time_steps),
            ("lat", self.lat.len(), lats),
            ("lon", self.lon.len(), lons),
        ];
        for (name, coordinate, axis) in expected {
            if coordinate != axis {
                return Err(PipelineError::Coordinates {
                    name,
                    coordinate,
                    axis,
                });
            }
        }
        Ok(())
    }

    /// Averages the field over all latitudes within `[lat1, lat2]`.
    ///
    /// The bounds may be given in either order and the latitude axis may be ascending or
    /// descending. NaN values are skipped in the average.
    pub fn calc_hov(&self, lat1: f64, lat2: f64) -> Result<HovmollerFilterData, PipelineError> {
        self.validate()?;
        let (lower, upper) = if lat1 <= lat2 { (lat1, lat2) } else { (lat2, lat1) };

        let selected: Vec<usize> = self
            .lat
            .iter()
            .enumerate()
            .filter(|&(_, &lat)| lat >= lower && lat <= upper)
            .map(|(i, _)| i)
            .collect();
        if selected.is_empty() {
            return Err(PipelineError::EmptyLatitudeBand { lower, upper });
        }
        log::debug!(
            "averaging {} latitude(s) between {} and {}",
            selected.len(),
            lower,
            upper
        );

        let band = self.data.select(Axis(1), &selected);
        let data = nanmean_axis(band.view(), Axis(1));
        Ok(HovmollerFilterData::new(
            self.time.clone(),
            self.lon.clone(),
            data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array3};

    fn field(lat: Array1<f64>) -> VelocityField {
        let n_lat = lat.len();
        VelocityField {
            time: array![0.0, 6.0],
            lon: array![0.0, 90.0, 180.0, 270.0],
            data: Array3::from_shape_fn((2, n_lat, 4), |(t, j, lo)| {
                (t * 100) as f64 + lat[j] + lo as f64
            }),
            lat,
        }
    }

    #[test]
    fn test_calc_hov_averages_selected_band() {
        let f = field(array![20.0, 35.0, 50.0, 65.0, 80.0]);
        let hov = f.calc_hov(35.0, 65.0).unwrap();
        assert_eq!(hov.data.dim(), (2, 4));
        assert_abs_diff_eq!(hov.data[[0, 0]], 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hov.data[[1, 3]], 153.0, epsilon = 1e-12);
        assert_eq!(hov.time, f.time);
        assert_eq!(hov.lon, f.lon);
    }

    #[test]
    fn test_calc_hov_handles_descending_latitudes() {
        let ascending = field(array![20.0, 35.0, 50.0, 65.0, 80.0]).calc_hov(35.0, 65.0).unwrap();
        let descending = field(array![80.0, 65.0, 50.0, 35.0, 20.0]).calc_hov(65.0, 35.0).unwrap();
        for (a, b) in ascending.data.iter().zip(descending.data.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_calc_hov_skips_nan() {
        let mut f = field(array![35.0, 50.0]);
        f.data[[0, 0, 0]] = f64::NAN;
        let hov = f.calc_hov(0.0, 90.0).unwrap();
        assert_abs_diff_eq!(hov.data[[0, 0]], 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_calc_hov_errors() {
        let f = field(array![20.0, 80.0]);
        assert!(matches!(
            f.calc_hov(35.0, 65.0),
            Err(PipelineError::EmptyLatitudeBand { .. })
        ));

        let mut broken = field(array![50.0]);
        broken.lon = array![0.0, 180.0];
        assert!(matches!(
            broken.calc_hov(0.0, 90.0),
            Err(PipelineError::Coordinates { name: "lon", .. })
        ));
    }
}
