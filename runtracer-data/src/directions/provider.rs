//! `RouteOracle` over the Mapbox Directions API.
//!
//! [`HttpRouteOracle`] requests a walking route through the supplied
//! coordinates and reports the first route's geometry and length in miles.
//! Access tokens travel in the query string, so every URL that leaves this
//! module (in logs or errors) has the token redacted.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::{Client, StatusCode};
use runtracer_core::{OracleError, RouteCandidate, RouteOracle, meters_to_miles};
use url::{Url, form_urlencoded};

use super::mapbox::{DirectionsResponse, ErrorBody};

/// Error type for [`HttpRouteOracle`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The configured base URL could not be parsed.
    BaseUrl(url::ParseError),
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseUrl(err) => write!(f, "invalid directions base URL: {err}"),
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BaseUrl(err) => Some(err),
            Self::HttpClient(err) => Some(err),
        }
    }
}

/// Default directions service.
pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Default routing profile.
pub const DEFAULT_PROFILE: &str = "mapbox/walking";

/// Default user agent for directions requests.
pub const DEFAULT_USER_AGENT: &str = "runtracer-directions/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Placeholder written in place of the access token.
const REDACTED: &str = "REDACTED";

/// Configuration for [`HttpRouteOracle`].
#[derive(Clone)]
pub struct HttpRouteOracleConfig {
    /// Base URL for the directions service (e.g., `"https://api.mapbox.com"`).
    pub base_url: String,
    /// Routing profile path, e.g. `"mapbox/walking"`.
    pub profile: String,
    /// Access token appended to every request.
    pub access_token: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpRouteOracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRouteOracleConfig")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .field("access_token", &REDACTED)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for HttpRouteOracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            access_token: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRouteOracleConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the access token.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    /// Set the routing profile, e.g. `"mapbox/cycling"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Directions oracle backed by an HTTP directions service.
///
/// Each call issues one `GET` request. The client is reused across calls and
/// is safe to share between concurrent searches.
#[derive(Debug)]
pub struct HttpRouteOracle {
    client: Client,
    config: HttpRouteOracleConfig,
}

impl HttpRouteOracle {
    /// Create an oracle for the default service with the given token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(access_token: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteOracleConfig::default().with_access_token(access_token))
    }

    /// Create an oracle with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or the HTTP client
    /// fails to build.
    pub fn with_config(config: HttpRouteOracleConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(ProviderBuildError::BaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpRouteOracleConfig {
        &self.config
    }

    /// Build the directions URL for `coordinates`, with `token` in the query.
    ///
    /// The URL format is:
    /// `{base_url}/directions/v5/{profile}/{coordinates}?geometries=geojson&access_token={token}`
    /// where coordinates are semicolon-separated `lng,lat` pairs.
    fn build_directions_url(&self, coordinates: &[Coord<f64>], token: &str) -> String {
        let coords: String = coordinates
            .iter()
            .map(|coord| format!("{},{}", coord.x, coord.y))
            .collect::<Vec<_>>()
            .join(";");
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("geometries", "geojson")
            .append_pair("access_token", token)
            .finish();

        format!(
            "{}/directions/v5/{}/{}?{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile.trim_matches('/'),
            coords,
            query
        )
    }

    /// Fetch and decode a route for `coordinates`.
    async fn fetch_route(
        &self,
        coordinates: &[Coord<f64>],
    ) -> Result<Option<RouteCandidate>, OracleError> {
        let url = self.build_directions_url(coordinates, &self.config.access_token);
        let display_url = self.build_directions_url(coordinates, REDACTED);
        debug!("requesting directions: {display_url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &display_url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &display_url))?;

        if !status.is_success() {
            return Self::convert_error_status(status, &body, display_url);
        }

        let directions: DirectionsResponse =
            serde_json::from_str(&body).map_err(|err| OracleError::Parse {
                message: err.to_string(),
            })?;
        Self::convert_response(directions)
    }

    /// Convert a reqwest error to an `OracleError`.
    ///
    /// The request URL is stripped from the error before it is rendered, as
    /// it carries the access token.
    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> OracleError {
        if error.is_timeout() {
            return OracleError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return OracleError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.without_url().to_string(),
            };
        }

        if error.is_decode() {
            return OracleError::Parse {
                message: error.without_url().to_string(),
            };
        }

        OracleError::Network {
            url: url.to_owned(),
            message: error.without_url().to_string(),
        }
    }

    /// Interpret a non-success HTTP status.
    ///
    /// Some services report "no route" with a client error status; that is
    /// still a routing answer rather than a failed request.
    fn convert_error_status(
        status: StatusCode,
        body: &str,
        url: String,
    ) -> Result<Option<RouteCandidate>, OracleError> {
        let error_body: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        if error_body.is_no_route() {
            debug!("directions service found no route (HTTP {status})");
            return Ok(None);
        }
        let message = error_body
            .message
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_default();
        Err(OracleError::Http {
            url,
            status: status.as_u16(),
            message,
        })
    }

    /// Convert a directions response to a route candidate.
    fn convert_response(
        response: DirectionsResponse,
    ) -> Result<Option<RouteCandidate>, OracleError> {
        if response.is_no_route() {
            debug!("directions service found no route ({})", response.code);
            return Ok(None);
        }
        if !response.is_ok() {
            return Err(OracleError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let Some(route) = response.routes.and_then(|routes| routes.into_iter().next()) else {
            debug!("directions service returned no routes");
            return Ok(None);
        };
        if !(route.distance.is_finite() && route.distance >= 0.0) {
            return Err(OracleError::Parse {
                message: format!("invalid route distance {}", route.distance),
            });
        }

        Ok(Some(RouteCandidate::new(
            route.geometry.to_coords(),
            meters_to_miles(route.distance),
        )))
    }
}

#[async_trait]
impl RouteOracle for HttpRouteOracle {
    async fn route(
        &self,
        coordinates: &[Coord<f64>],
    ) -> Result<Option<RouteCandidate>, OracleError> {
        if coordinates.len() < 2 {
            return Err(OracleError::EmptyInput);
        }
        self.fetch_route(coordinates).await
    }
}
