use slodemo_common::{
    Endpoint, ErrorResponse, HealthResponse, OkResponse, Result, SloDemoError, DEFAULT_BASE_URL,
};
use std::time::Duration;

/// Upper bound on a single request, so one stalled call cannot hang the driver.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Mock service client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

/// Result of a simulated call that answered 200.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    pub endpoint: Endpoint,
    /// Latency the service reports; `None` if the body was not the usual JSON.
    pub latency_ms: Option<f64>,
}

/// Mock service client
pub struct Client {
    pub config: ClientConfig,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Self {
        Self { config, http_client: reqwest::Client::new() }
    }

    /// Build the URL for `path` (which starts with `/`) against the configured base.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Call a simulated endpoint.
    ///
    /// Only HTTP 200 is a success. Any other status becomes `HttpError`, and
    /// connection failures or timeouts become `NetworkError`.
    pub async fn call(&self, endpoint: Endpoint) -> Result<CallResult> {
        let response = self.get(endpoint.path()).await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(parse_error_response(status, response).await);
        }

        let latency_ms = response.json::<OkResponse>().await.ok().map(|r| r.latency_ms);
        Ok(CallResult { endpoint, latency_ms })
    }

    /// Liveness probe.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.get("/health").await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(parse_error_response(status, response).await);
        }

        response.json::<HealthResponse>().await.map_err(|e| SloDemoError::NetworkError(e.to_string()))
    }

    /// Fetch the raw Prometheus exposition text.
    pub async fn metrics(&self) -> Result<String> {
        let response = self.get("/metrics").await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(parse_error_response(status, response).await);
        }

        response.text().await.map_err(|e| SloDemoError::NetworkError(e.to_string()))
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        self.http_client
            .get(self.build_url(path))
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| SloDemoError::NetworkError(e.to_string()))
    }
}

async fn parse_error_response(status: reqwest::StatusCode, response: reqwest::Response) -> SloDemoError {
    let error_msg = response
        .json::<ErrorResponse>()
        .await
        .map(|r| r.error)
        .unwrap_or_else(|_| format!("Server returned status: {}", status));

    SloDemoError::HttpError(status.as_u16(), error_msg)
}
