//! Loop command implementation for the RunTracer CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runtracer_core::{LoopRouteFinder, RouteKind, RouteOracle, SearchConfig, SearchOutcome};
use runtracer_data::{DEFAULT_BASE_URL, HttpRouteOracle, HttpRouteOracleConfig};
use serde::{Deserialize, Serialize};

use crate::input::write_json;
use crate::{
    ARG_ACCESS_TOKEN, ARG_LAT, ARG_LNG, ARG_MILES, CliError, ENV_ACCESS_TOKEN, ENV_LAT, ENV_LNG,
    ENV_MILES,
};

/// CLI arguments for the `loop` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "loop",
    long_about = "Search for a loop route that starts and ends at the given \
                 point and is roughly the requested length. The route is \
                 printed as a GeoJSON Feature. When no loop fits, an \
                 out-and-back route is printed instead.",
    about = "Find a loop route of roughly the requested length"
)]
#[ortho_config(prefix = "RUNTRACER")]
pub(crate) struct LoopArgs {
    /// Start longitude in degrees.
    #[arg(long = ARG_LNG, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Start latitude in degrees.
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Target route length in miles.
    #[arg(long = ARG_MILES, value_name = "miles")]
    #[serde(default)]
    pub(crate) miles: Option<f64>,
    /// Seed for the waypoint ring; omit for a different shape each run.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Access token for the directions service.
    #[arg(long = ARG_ACCESS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    /// Base URL of the directions service (e.g. "https://api.mapbox.com").
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) directions_url: Option<String>,
    /// Routing profile (e.g. "mapbox/walking").
    #[arg(long, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Accepted deviation from the target, as a fraction.
    #[arg(long, value_name = "fraction")]
    #[serde(default)]
    pub(crate) tolerance: Option<f64>,
    /// Maximum loop attempts before falling back.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Soft deadline for the loop phase, in seconds.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Number of waypoints placed around the start (at most 23).
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) waypoints: Option<usize>,
}

impl LoopArgs {
    pub(crate) fn into_config(self) -> Result<LoopConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LoopConfig::try_from(merged)
    }
}

/// Resolved `loop` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct LoopConfig {
    /// Start and end of the route.
    pub(crate) start: Coord<f64>,
    /// Requested length in miles.
    pub(crate) target_miles: f64,
    /// Seed for the waypoint ring, if reproducible output was requested.
    pub(crate) seed: Option<u64>,
    /// Search tunables.
    pub(crate) search: SearchConfig,
    /// Directions client settings.
    pub(crate) oracle: HttpRouteOracleConfig,
}

impl TryFrom<LoopArgs> for LoopConfig {
    type Error = CliError;

    fn try_from(args: LoopArgs) -> Result<Self, Self::Error> {
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_LNG,
        })?;
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let target_miles = args.miles.ok_or(CliError::MissingArgument {
            field: ARG_MILES,
            env: ENV_MILES,
        })?;

        let base_url = args
            .directions_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        // Self-hosted services may run without a token.
        let access_token = match args.access_token {
            Some(token) => token,
            None if base_url == DEFAULT_BASE_URL => {
                return Err(CliError::MissingArgument {
                    field: ARG_ACCESS_TOKEN,
                    env: ENV_ACCESS_TOKEN,
                });
            }
            None => String::new(),
        };
        let mut oracle = HttpRouteOracleConfig::new(base_url).with_access_token(access_token);
        if let Some(profile) = args.profile {
            oracle = oracle.with_profile(profile);
        }

        let mut search = SearchConfig::default();
        if let Some(tolerance) = args.tolerance {
            search = search.with_tolerance(tolerance);
        }
        if let Some(max_attempts) = args.max_attempts {
            search = search.with_max_attempts(max_attempts);
        }
        if let Some(timeout_secs) = args.timeout_secs {
            search = search.with_timeout(Duration::from_secs(timeout_secs));
        }
        if let Some(waypoints) = args.waypoints {
            search = search.with_waypoint_count(waypoints);
        }
        search.validate()?;

        Ok(Self {
            start: Coord { x: lng, y: lat },
            target_miles,
            seed: args.seed,
            search,
            oracle,
        })
    }
}

/// Builds the directions oracle for the current loop invocation.
pub(super) trait OracleBuilder {
    fn build(&self, config: &LoopConfig) -> Result<Box<dyn RouteOracle>, CliError>;
}

pub(super) struct HttpOracleBuilder;

impl OracleBuilder for HttpOracleBuilder {
    fn build(&self, config: &LoopConfig) -> Result<Box<dyn RouteOracle>, CliError> {
        let oracle = HttpRouteOracle::with_config(config.oracle.clone()).map_err(|source| {
            CliError::BuildOracle {
                base_url: config.oracle.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(oracle))
    }
}

pub(super) fn run_loop(args: LoopArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_loop_with(&config, &HttpOracleBuilder, &mut stdout)
}

pub(super) fn run_loop_with(
    config: &LoopConfig,
    builder: &dyn OracleBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let outcome = execute_loop(config, builder)?;
    info!(
        "{} route of {:.2} mi after {} attempts in {:?}",
        kind_label(outcome.kind),
        outcome.route.distance_miles,
        outcome.attempts.len(),
        outcome.elapsed
    );
    write_json(writer, &RouteFeature::from(&outcome))
}

fn execute_loop(config: &LoopConfig, builder: &dyn OracleBuilder) -> Result<SearchOutcome, CliError> {
    let oracle = builder.build(config)?;
    let finder = LoopRouteFinder::with_config(oracle, config.search.clone())?;
    let mut rng = config
        .seed
        .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let outcome = runtime.block_on(finder.search(config.start, config.target_miles, &mut rng))?;
    Ok(outcome)
}

const fn kind_label(kind: RouteKind) -> &'static str {
    match kind {
        RouteKind::Loop => "loop",
        RouteKind::OutAndBack => "out-and-back",
    }
}

/// GeoJSON `Feature` describing a found route.
#[derive(Debug, Serialize)]
pub(crate) struct RouteFeature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    geometry: LineString,
    properties: RouteProperties,
}

#[derive(Debug, Serialize)]
struct LineString {
    #[serde(rename = "type")]
    geometry_type: &'static str,
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct RouteProperties {
    distance_miles: f64,
    kind: RouteKind,
    attempts: usize,
}

impl From<&SearchOutcome> for RouteFeature {
    fn from(outcome: &SearchOutcome) -> Self {
        Self {
            feature_type: "Feature",
            geometry: LineString {
                geometry_type: "LineString",
                coordinates: outcome
                    .route
                    .geometry
                    .iter()
                    .map(|coord| [coord.x, coord.y])
                    .collect(),
            },
            properties: RouteProperties {
                distance_miles: outcome.route.distance_miles,
                kind: outcome.kind,
                attempts: outcome.attempts.len(),
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<LoopConfig, CliError> {
    let merged = LoopArgs::merge_from_layers(layers).map_err(CliError::from)?;
    LoopConfig::try_from(merged)
}
