//! Weekly command implementation for the RunTracer CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use runtracer_core::{Activity, weekly_totals};
use serde::{Deserialize, Serialize};

use crate::input::{load_json, write_json};
use crate::{ARG_WEEKLY_PATH, CliError, ENV_WEEKLY_PATH};

/// Number of weeks summarised when `--weeks` is not given.
pub(crate) const DEFAULT_WEEKS: u32 = 12;

/// CLI arguments for the `weekly` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "weekly",
    long_about = "Sum activity distances into seven-day buckets ending now. \
                 Activities are read from a JSON array; every bucket is \
                 reported, including empty ones, oldest first.",
    about = "Sum activity distances into weekly buckets"
)]
#[ortho_config(prefix = "RUNTRACER")]
pub(crate) struct WeeklyArgs {
    /// Path to a JSON file containing recorded activities.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) path: Option<Utf8PathBuf>,
    /// Number of weeks to report.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) weeks: Option<u32>,
}

pub(super) fn run_weekly(args: WeeklyArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.path.ok_or(CliError::MissingArgument {
        field: ARG_WEEKLY_PATH,
        env: ENV_WEEKLY_PATH,
    })?;
    let weeks = merged.weeks.unwrap_or(DEFAULT_WEEKS);
    let mut stdout = std::io::stdout().lock();
    run_weekly_with(&path, weeks, Utc::now(), &mut stdout)
}

pub(super) fn run_weekly_with(
    path: &Utf8Path,
    weeks: u32,
    now: DateTime<Utc>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let activities: Vec<Activity> = load_json(path)?;
    write_json(writer, &weekly_totals(&activities, now, weeks))
}
