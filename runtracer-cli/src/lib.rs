//! Command-line interface for RunTracer's route tools.
//!
//! Three subcommands are available:
//! - `loop` searches for a loop route of a given length and prints it as a
//!   GeoJSON `Feature`;
//! - `measure` reports the length of a recorded path;
//! - `weekly` buckets recorded activities into weekly distance totals.
//!
//! Options are layered from configuration files, `RUNTRACER_*` environment
//! variables, and flags by `ortho_config`.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod input;
mod loop_route;
mod measure;
mod weekly;

pub use error::CliError;

use loop_route::LoopArgs;
use measure::MeasureArgs;
use weekly::WeeklyArgs;

pub(crate) const ARG_LNG: &str = "lng";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_MILES: &str = "miles";
pub(crate) const ARG_ACCESS_TOKEN: &str = "access-token";
pub(crate) const ARG_MEASURE_PATH: &str = "path";
pub(crate) const ARG_WEEKLY_PATH: &str = "path";
pub(crate) const ENV_LNG: &str = "RUNTRACER_CMDS_LOOP_LNG";
pub(crate) const ENV_LAT: &str = "RUNTRACER_CMDS_LOOP_LAT";
pub(crate) const ENV_MILES: &str = "RUNTRACER_CMDS_LOOP_MILES";
pub(crate) const ENV_ACCESS_TOKEN: &str = "RUNTRACER_CMDS_LOOP_ACCESS_TOKEN";
pub(crate) const ENV_MEASURE_PATH: &str = "RUNTRACER_CMDS_MEASURE_PATH";
pub(crate) const ENV_WEEKLY_PATH: &str = "RUNTRACER_CMDS_WEEKLY_PATH";

/// Run the RunTracer CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure; help and version
/// requests print and exit directly.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    match cli.command {
        Command::Loop(args) => loop_route::run_loop(args),
        Command::Measure(args) => measure::run_measure(args),
        Command::Weekly(args) => weekly::run_weekly(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "runtracer",
    about = "Generate loop routes and summarise recorded runs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find a loop route of roughly the requested length.
    Loop(LoopArgs),
    /// Measure the length of a recorded path.
    Measure(MeasureArgs),
    /// Sum activity distances into weekly buckets.
    Weekly(WeeklyArgs),
}

#[cfg(test)]
mod tests;
