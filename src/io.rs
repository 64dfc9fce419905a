//! Reading the velocity field from and writing the R-metric to `.npz` archives.
//!
//! Input archives hold the velocity as a `(time, lat, lon)` float64 array next to its
//! `time`, `lat` and `lon` coordinates, as written by `numpy.savez`. The output archive holds
//! `V`, `R_metric`, `Filtered_wave`, `time` and `lon` with non-finite values replaced by the
//! fill value, and an optional JSON sidecar with the variable attributes.

use crate::config::RMetricConfig;
use crate::data_container::{RMetricOutput, VelocityField, WaveBand};
use chrono::Utc;
use ndarray::{Array, Array2, Dimension, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, ReadableElement, WriteNpzError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read npz archive: {0}")]
    ReadNpz(#[from] ReadNpzError),

    #[error("failed to write npz archive: {0}")]
    WriteNpz(#[from] WriteNpzError),

    #[error("failed to write metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads an array stored under `name`, with or without the `.npy` suffix numpy adds.
///
/// `NpzReader::by_name` only tries the suffixed entry when the bare one is missing, so a dtype or
/// shape mismatch on an existing entry is reported as such.
fn read_array<R, A, D>(npz: &mut NpzReader<R>, name: &str) -> Result<Array<A, D>, ReadNpzError>
where
    R: Read + Seek,
    A: ReadableElement,
    D: Dimension,
{
    npz.by_name::<OwnedRepr<A>, D>(name)
}

/// Opens a velocity field from an `.npz` archive.
///
/// # Arguments
/// - `path`: Path to the archive.
/// - `variable`: Name of the `(time, lat, lon)` velocity array.
pub fn open_from_npz(path: &Path, variable: &str) -> Result<VelocityField, IoError> {
    let mut npz = NpzReader::new(File::open(path)?)?;
    let field = VelocityField {
        time: read_array(&mut npz, "time")?,
        lat: read_array(&mut npz, "lat")?,
        lon: read_array(&mut npz, "lon")?,
        data: read_array(&mut npz, variable)?,
    };
    log::info!(
        "opened {:?}: {} with shape {:?}",
        path,
        variable,
        field.data.dim()
    );
    Ok(field)
}

/// Writes a velocity field in the layout `open_from_npz` reads.
pub fn save_field_to_npz(field: &VelocityField, path: &Path, variable: &str) -> Result<(), IoError> {
    let mut npz = NpzWriter::new(File::create(path)?);
    npz.add_array(variable, &field.data)?;
    npz.add_array("time", &field.time)?;
    npz.add_array("lat", &field.lat)?;
    npz.add_array("lon", &field.lon)?;
    npz.finish()?;
    Ok(())
}

/// Replaces every non-finite value with `fill_value`.
pub fn encode_fill(a: &Array2<f64>, fill_value: f64) -> Array2<f64> {
    a.mapv(|v| if v.is_finite() { v } else { fill_value })
}

/// Writes the R-metric output with fill-value encoding.
pub fn save_to_npz(output: &RMetricOutput, path: &Path, fill_value: f64) -> Result<(), IoError> {
    let mut npz = NpzWriter::new(File::create(path)?);
    for (name, values) in [
        ("V", &output.v),
        ("R_metric", &output.r_metric),
        ("Filtered_wave", &output.filtered_wave),
    ] {
        let gaps = values.iter().filter(|v| !v.is_finite()).count();
        if gaps > 0 {
            log::warn!("{name}: {gaps} non-finite value(s) written as {fill_value}");
        }
        npz.add_array(name, &encode_fill(values, fill_value))?;
    }
    npz.add_array("time", &output.time)?;
    npz.add_array("lon", &output.lon)?;
    npz.finish()?;
    log::info!("saved {:?}", path);
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VariableAttributes {
    pub dims: Vec<String>,
    pub comment: String,
    #[serde(rename = "_FillValue")]
    pub fill_value: f64,
}

/// Attributes of the output archive, written next to it as JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutputMetadata {
    pub title: String,
    pub history: String,
    pub source: String,
    pub band: WaveBand,
    pub lat_band: [f64; 2],
    pub smoothing_window: usize,
    pub shape: [usize; 2],
    pub variables: BTreeMap<String, VariableAttributes>,
}

impl OutputMetadata {
    pub fn new(output: &RMetricOutput, config: &RMetricConfig) -> Self {
        let dims = vec!["time".to_string(), "lon".to_string()];
        let fill_value = config.output.fill_value;
        let variables = [
            ("V", "14-day time filtered meridional velocity".to_string()),
            (
                "R_metric",
                format!(
                    "Envelope of zonal wavenumbers {}-{} (absolute value of the filtered signal)",
                    output.band.kmin, output.band.kmax
                ),
            ),
            (
                "Filtered_wave",
                "Real part of the wavenumber filtered signal".to_string(),
            ),
        ]
        .into_iter()
        .map(|(name, comment)| {
            (
                name.to_string(),
                VariableAttributes {
                    dims: dims.clone(),
                    comment,
                    fill_value,
                },
            )
        })
        .collect();

        OutputMetadata {
            title: "R-metric (Röthlisberger et al. 2018)".to_string(),
            history: format!("created {}", Utc::now().to_rfc3339()),
            source: format!(
                "r-metric {} ({})",
                env!("CARGO_PKG_VERSION"),
                env!("GIT_HASH")
            ),
            band: output.band,
            lat_band: [config.hovmoller.lat_min, config.hovmoller.lat_max],
            smoothing_window: config.smoothing.window,
            shape: [output.r_metric.nrows(), output.r_metric.ncols()],
            variables,
        }
    }
}

pub fn save_metadata(metadata: &OutputMetadata, path: &Path) -> Result<(), IoError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, metadata)?;
    log::info!("saved metadata to {:?}", path);
    Ok(())
}
