//! Focused unit tests covering loop CLI configuration and output.

use super::helpers::output_json;
use super::*;
use crate::loop_route::{
    LoopArgs, LoopConfig, OracleBuilder, config_from_layers_for_test, run_loop_with,
};
use rstest::{fixture, rstest};
use runtracer_core::test_support::{Reply, ScriptedOracle};
use runtracer_core::{ConfigError, RouteOracle, SearchError};
use std::time::Duration;

/// Builds a scripted oracle that always answers with the same reply.
struct ScriptedBuilder(Reply);

impl OracleBuilder for ScriptedBuilder {
    fn build(&self, _config: &LoopConfig) -> Result<Box<dyn RouteOracle>, CliError> {
        Ok(Box::new(ScriptedOracle::new().otherwise(self.0.clone())))
    }
}

fn loop_args() -> LoopArgs {
    LoopArgs {
        lng: Some(-71.1062),
        lat: Some(42.4184),
        miles: Some(3.0),
        seed: Some(7),
        access_token: Some("pk.test".to_owned()),
        ..LoopArgs::default()
    }
}

#[fixture]
fn complete_args() -> LoopArgs {
    loop_args()
}

#[rstest]
#[case::lng(LoopArgs { lng: None, ..loop_args() }, ARG_LNG, ENV_LNG)]
#[case::lat(LoopArgs { lat: None, ..loop_args() }, ARG_LAT, ENV_LAT)]
#[case::miles(LoopArgs { miles: None, ..loop_args() }, ARG_MILES, ENV_MILES)]
#[case::token(
    LoopArgs { access_token: None, ..loop_args() },
    ARG_ACCESS_TOKEN,
    ENV_ACCESS_TOKEN
)]
fn converting_without_required_fields_errors(
    #[case] args: LoopArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let err = LoopConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn self_hosted_service_needs_no_token(complete_args: LoopArgs) {
    let args = LoopArgs {
        access_token: None,
        directions_url: Some("http://localhost:5000".to_owned()),
        profile: Some("osrm/foot".to_owned()),
        ..complete_args
    };

    let config = LoopConfig::try_from(args).expect("config should build");

    assert_eq!(config.oracle.base_url, "http://localhost:5000");
    assert_eq!(config.oracle.profile, "osrm/foot");
    assert!(config.oracle.access_token.is_empty());
}

#[rstest]
fn search_overrides_are_applied(complete_args: LoopArgs) {
    let args = LoopArgs {
        tolerance: Some(0.05),
        max_attempts: Some(8),
        timeout_secs: Some(4),
        waypoints: Some(5),
        ..complete_args
    };

    let config = LoopConfig::try_from(args).expect("config should build");

    assert_eq!(config.search.tolerance, 0.05);
    assert_eq!(config.search.max_attempts, 8);
    assert_eq!(config.search.timeout, Duration::from_secs(4));
    assert_eq!(config.search.waypoint_count, 5);
    assert_eq!(config.seed, Some(7));
}

#[rstest]
#[case::zero_attempts(
    LoopArgs { max_attempts: Some(0), ..loop_args() },
    ConfigError::ZeroAttempts
)]
#[case::oversized_ring(
    LoopArgs { waypoints: Some(24), ..loop_args() },
    ConfigError::TooManyWaypoints(24)
)]
fn invalid_search_overrides_are_rejected(#[case] args: LoopArgs, #[case] expected: ConfigError) {
    let err = LoopConfig::try_from(args).expect_err("override should be rejected");
    match err {
        CliError::InvalidSearchConfig(found) => assert_eq!(found, expected),
        other => panic!("expected InvalidSearchConfig, found {other:?}"),
    }
}

#[rstest]
fn loop_prints_geojson_feature(complete_args: LoopArgs) {
    let config = LoopConfig::try_from(complete_args).expect("config should build");
    let mut buffer = Vec::new();

    run_loop_with(&config, &ScriptedBuilder(Reply::Miles(3.1)), &mut buffer)
        .expect("loop should succeed");

    let feature = output_json(&buffer);
    assert_eq!(feature["type"], "Feature");
    assert_eq!(feature["geometry"]["type"], "LineString");
    assert_eq!(feature["properties"]["kind"], "loop");
    assert_eq!(feature["properties"]["distance_miles"], 3.1);
    assert_eq!(feature["properties"]["attempts"], 1);
    let coordinates = feature["geometry"]["coordinates"]
        .as_array()
        .expect("coordinates array");
    assert_eq!(coordinates.first(), coordinates.last());
    assert_eq!(coordinates[0][0], -71.1062);
    assert_eq!(coordinates[0][1], 42.4184);
}

#[rstest]
fn loop_reports_out_and_back_fallback(complete_args: LoopArgs) {
    let config = LoopConfig::try_from(complete_args).expect("config should build");
    let mut buffer = Vec::new();

    run_loop_with(&config, &ScriptedBuilder(Reply::Miles(12.0)), &mut buffer)
        .expect("fallback should succeed");

    let feature = output_json(&buffer);
    assert_eq!(feature["properties"]["kind"], "out_and_back");
    assert_eq!(feature["properties"]["attempts"], 20);
}

#[rstest]
fn loop_surfaces_search_failure(complete_args: LoopArgs) {
    let config = LoopConfig::try_from(complete_args).expect("config should build");
    let mut buffer = Vec::new();

    let err = run_loop_with(&config, &ScriptedBuilder(Reply::NoRoute), &mut buffer)
        .expect_err("no route anywhere");

    assert!(matches!(
        err,
        CliError::Search(SearchError::NoRouteFound { attempts: 20 })
    ));
    assert!(buffer.is_empty());
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "miles": "far" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "lng": 0.5,
            "lat": 51.5,
            "miles": 5.0,
            "access_token": "pk.file",
            "tolerance": 0.2,
        }),
        None,
    );
    composer.push_environment(json!({
        "miles": 4.0,
        "access_token": "pk.env",
    }));
    composer.push_cli(json!({ "miles": 6.0 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.target_miles, 6.0);
    assert_eq!(config.oracle.access_token, "pk.env");
    assert_eq!(config.search.tolerance, 0.2);
    assert_eq!(config.start.x, 0.5);
    assert_eq!(config.start.y, 51.5);
}
