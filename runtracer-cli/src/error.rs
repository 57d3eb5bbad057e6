//! Error types emitted by the RunTracer CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use runtracer_core::{ConfigError, CoordinateError, SearchError};
use runtracer_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the RunTracer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The search tunables are out of range.
    #[error("invalid search settings: {0}")]
    InvalidSearchConfig(#[from] ConfigError),
    /// Constructing the directions oracle failed.
    #[error("failed to build directions client for {base_url:?}: {source}")]
    BuildOracle {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The loop search failed.
    #[error("route search failed: {0}")]
    Search(#[from] SearchError),
    /// Opening an input file failed.
    #[error("failed to open {path:?}: {source}")]
    OpenInput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An input file was not valid JSON of the expected shape.
    #[error("failed to parse {path:?}: {source}")]
    ParseInput {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A coordinate in an input file is out of range.
    #[error("point {index} in {path:?} is invalid: {source}")]
    InvalidCoordinate {
        path: Utf8PathBuf,
        index: usize,
        #[source]
        source: CoordinateError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
