//! Measure command implementation for the RunTracer CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use runtracer_core::{path_length_miles, validate_coordinate};
use serde::{Deserialize, Serialize};

use crate::input::{load_json, write_json};
use crate::{ARG_MEASURE_PATH, CliError, ENV_MEASURE_PATH};

/// CLI arguments for the `measure` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "measure",
    long_about = "Measure a path given as a JSON array of [lng, lat] pairs. \
                 Consecutive points are joined by great-circle legs.",
    about = "Measure the length of a recorded path"
)]
#[ortho_config(prefix = "RUNTRACER")]
pub(crate) struct MeasureArgs {
    /// Path to a JSON file containing `[lng, lat]` pairs.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) path: Option<Utf8PathBuf>,
}

/// Length of a measured path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Measurement {
    /// Number of points in the path.
    pub(crate) points: usize,
    /// Great-circle length in miles.
    pub(crate) distance_miles: f64,
}

pub(super) fn run_measure(args: MeasureArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.path.ok_or(CliError::MissingArgument {
        field: ARG_MEASURE_PATH,
        env: ENV_MEASURE_PATH,
    })?;
    let mut stdout = std::io::stdout().lock();
    run_measure_with(&path, &mut stdout)
}

pub(super) fn run_measure_with(path: &Utf8Path, writer: &mut dyn Write) -> Result<(), CliError> {
    let points = load_points(path)?;
    let measurement = Measurement {
        points: points.len(),
        distance_miles: path_length_miles(&points),
    };
    write_json(writer, &measurement)
}

/// Load and validate a JSON array of `[lng, lat]` pairs.
pub(super) fn load_points(path: &Utf8Path) -> Result<Vec<Coord<f64>>, CliError> {
    let pairs: Vec<[f64; 2]> = load_json(path)?;
    pairs
        .into_iter()
        .enumerate()
        .map(|(index, [x, y])| {
            let coord = Coord { x, y };
            validate_coordinate(coord).map_err(|source| CliError::InvalidCoordinate {
                path: path.to_path_buf(),
                index,
                source,
            })?;
            Ok(coord)
        })
        .collect()
}
