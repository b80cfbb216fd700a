use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the driver sends traffic unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Every simulated call is a GET.
pub const METHOD_GET: &str = "GET";

/// Sampled failure threshold of the flaky endpoint.
///
/// Some descriptions of the demo quote 15%; the sampled threshold has always been 30%.
/// Override with `--flaky-failure-rate`.
pub const FLAKY_FAILURE_PROBABILITY: f64 = 0.30;

/// Body of the flaky endpoint's 500 response.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "internal server error";

/// How far the sum of selection weights may drift from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Error types for SLO demo operations
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum SloDemoError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {0}: {1}")]
    HttpError(u16, String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

/// Result type for SLO demo operations
pub type Result<T> = std::result::Result<T, SloDemoError>;

/// One of the three simulated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Fast,
    Slow,
    Flaky,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Fast, Endpoint::Slow, Endpoint::Flaky];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fast" => Some(Endpoint::Fast),
            "slow" => Some(Endpoint::Slow),
            "flaky" => Some(Endpoint::Flaky),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            Endpoint::Fast => "fast",
            Endpoint::Slow => "slow",
            Endpoint::Flaky => "flaky",
        }
    }

    /// URL path, also used as the `endpoint` metric label.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Fast => "/fast",
            Endpoint::Slow => "/slow",
            Endpoint::Flaky => "/flaky",
        }
    }

    /// Position of this endpoint in [`Endpoint::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Static description of a simulated endpoint: how often the driver picks it,
/// how long it sleeps, and how often it fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointProfile {
    pub endpoint: Endpoint,
    pub weight: f64,
    pub latency_min_secs: f64,
    pub latency_max_secs: f64,
    pub failure_probability: f64,
}

impl EndpointProfile {
    /// Default profile for `endpoint`, matching [`DEFAULT_PROFILES`].
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        DEFAULT_PROFILES[endpoint.index()]
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    pub fn with_failure_probability(self, failure_probability: f64) -> Self {
        Self { failure_probability, ..self }
    }
}

/// The steady-state traffic mix: 70% fast, 10% slow, 20% flaky.
///
/// | Endpoint | Weight | Latency (s)  | Failure |
/// |----------|--------|--------------|---------|
/// | fast     |  0.70  | 0.01 - 0.05  |   0     |
/// | slow     |  0.10  | 1.0  - 3.0   |   0     |
/// | flaky    |  0.20  | 0.05 - 0.2   |  0.30   |
pub const DEFAULT_PROFILES: [EndpointProfile; 3] = [
    EndpointProfile {
        endpoint: Endpoint::Fast,
        weight: 0.70,
        latency_min_secs: 0.01,
        latency_max_secs: 0.05,
        failure_probability: 0.0,
    },
    EndpointProfile {
        endpoint: Endpoint::Slow,
        weight: 0.10,
        latency_min_secs: 1.0,
        latency_max_secs: 3.0,
        failure_probability: 0.0,
    },
    EndpointProfile {
        endpoint: Endpoint::Flaky,
        weight: 0.20,
        latency_min_secs: 0.05,
        latency_max_secs: 0.2,
        failure_probability: FLAKY_FAILURE_PROBABILITY,
    },
];

/// Check that `profiles` is non-empty, every weight lies in [0, 1] and the weights sum to 1.
pub fn validate_weights(profiles: &[EndpointProfile]) -> Result<()> {
    if profiles.is_empty() {
        return Err(SloDemoError::InvalidConfig("at least one endpoint profile is required".to_string()));
    }
    if let Some(p) = profiles.iter().find(|p| !(0.0..=1.0).contains(&p.weight)) {
        return Err(SloDemoError::InvalidConfig(format!(
            "weight for {} must be within [0, 1], got {}",
            p.endpoint.path(),
            p.weight
        )));
    }
    let total: f64 = profiles.iter().map(|p| p.weight).sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(SloDemoError::InvalidConfig(format!("weights must sum to 1, got {}", total)));
    }
    Ok(())
}

/// Check that a failure probability lies in [0, 1].
pub fn validate_failure_probability(p: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(SloDemoError::InvalidConfig(format!("failure probability must be within [0, 1], got {}", p)))
    }
}

/// Body of a successful simulated call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    pub status: String,
    pub latency_ms: f64,
}

impl OkResponse {
    pub fn new(latency_ms: f64) -> Self {
        Self { status: "ok".to_string(), latency_ms }
    }
}

/// Body of `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "healthy".to_string() }
    }
}

/// JSON error envelope returned by the service for all error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
