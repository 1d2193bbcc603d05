//! JSON persistence of [`GeometryParameters`].
//!
//! Missing fields take their default values, so a file may name only the
//! parameters it changes. Values are stored in internal units (mm, Pa, K).

use crate::GeometryParameters;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub fn write_parameters(path: &Path, params: &GeometryParameters) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, params)
        .with_context(|| format!("Failed to serialize parameters to: {}", path.display()))?;

    Ok(())
}

/// Reads parameters from a JSON file.
///
/// The values are not validated here; the next build does that.
pub fn read_parameters(path: &Path) -> Result<GeometryParameters> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let params: GeometryParameters = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize parameters from: {}", path.display()))?;
    log::debug!("Read detector configuration from {}", path.display());

    Ok(params)
}

pub fn to_json_string(params: &GeometryParameters) -> Result<String> {
    serde_json::to_string_pretty(params).context("Failed to serialize parameters to string")
}

pub fn from_json_string(json: &str) -> Result<GeometryParameters> {
    serde_json::from_str(json).context("Failed to deserialize parameters from string")
}
