use thiserror::Error;

/// Errors from [`crate::oracle::RouteOracle::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Fewer than two coordinates were provided.
    ///
    /// A route needs at least an origin and a destination. The loop search
    /// never triggers this.
    #[error("at least two coordinates are required")]
    EmptyInput,

    /// Network-level failure (DNS, connection refused, TLS).
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL with credentials redacted.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The request exceeded the client timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL with credentials redacted.
        url: String,
        /// Timeout in seconds.
        timeout_secs: u64,
    },

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL with credentials redacted.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Description of the failure.
        message: String,
    },

    /// The service reported an error code in its response body.
    #[error("directions service error {code}: {message}")]
    Service {
        /// Service status code, e.g. `"InvalidInput"`.
        code: String,
        /// Human-readable message from the service.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse directions response: {message}")]
    Parse {
        /// Description of the decoding failure.
        message: String,
    },
}
