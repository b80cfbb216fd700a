use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use slodemo_common::{
    Endpoint, EndpointProfile, ErrorResponse, HealthResponse, OkResponse, DEFAULT_PROFILES,
    FLAKY_FAILURE_PROBABILITY, INTERNAL_SERVER_ERROR_MESSAGE,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

pub mod config;
pub mod entropy;
pub mod metrics;
pub mod simulate;

use entropy::{Entropy, RngEntropy};
use metrics::{MetricsRegistry, Observation};
use simulate::{decide_status, latency_ms, sample_latency};

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<MetricsRegistry>,
    pub entropy: Arc<dyn Entropy>,
    profiles: [EndpointProfile; 3],
}

impl AppState {
    pub fn new(metrics: Arc<MetricsRegistry>, entropy: Arc<dyn Entropy>) -> Self {
        Self { metrics, entropy, profiles: DEFAULT_PROFILES }
    }

    /// Replace the flaky endpoint's failure probability.
    pub fn with_flaky_failure_probability(mut self, p: f64) -> Self {
        let flaky = Endpoint::Flaky.index();
        self.profiles[flaky] = self.profiles[flaky].with_failure_probability(p);
        self
    }

    pub fn profile(&self, endpoint: Endpoint) -> EndpointProfile {
        self.profiles[endpoint.index()]
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub flaky_failure_probability: f64,
    /// Fixed seed for latency and failure draws; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self { address, flaky_failure_probability: FLAKY_FAILURE_PROBABILITY, seed: None }
    }
}

/// Mock responder serving the simulated endpoints
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Get the server's configured address
    pub fn address(&self) -> SocketAddr {
        self.config.address
    }

    /// Create the application router with the given state
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/fast", get(handle_fast))
            .route("/slow", get(handle_slow))
            .route("/flaky", get(handle_flaky))
            .route("/health", get(handle_health))
            .route("/metrics", get(handle_metrics))
            .with_state(state)
    }

    /// Run the server, signalling `ready_tx` with the bound address once accepting connections
    pub async fn run(self, ready_tx: tokio::sync::oneshot::Sender<SocketAddr>) -> Result<(), Box<dyn std::error::Error>> {
        let entropy: Arc<dyn Entropy> = match self.config.seed {
            Some(seed) => Arc::new(RngEntropy::seeded(seed)),
            None => Arc::new(RngEntropy::from_entropy()),
        };
        let state = AppState::new(Arc::new(MetricsRegistry::new()?), entropy)
            .with_flaky_failure_probability(self.config.flaky_failure_probability);
        let app = Self::create_router(state);
        let listener = tokio::net::TcpListener::bind(self.config.address).await?;
        let local_addr = listener.local_addr()?;
        info!(
            address = %local_addr,
            flaky_failure_probability = self.config.flaky_failure_probability,
            "mock responder listening"
        );
        ready_tx.send(local_addr).ok();
        axum::serve(listener, app).await?;
        Ok(())
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Sleep for the endpoint's latency, decide its outcome, record it, and answer.
async fn simulate_endpoint(state: &AppState, endpoint: Endpoint) -> Response {
    let profile = state.profile(endpoint);

    let start = Instant::now();
    sleep(sample_latency(&profile, state.entropy.as_ref())).await;
    let duration = start.elapsed();

    let status = decide_status(&profile, state.entropy.as_ref());
    state
        .metrics
        .record(&Observation::new(endpoint, status.as_u16(), duration.as_secs_f64()));

    let elapsed_ms = latency_ms(duration);
    debug!(endpoint = endpoint.path(), status = status.as_u16(), latency_ms = elapsed_ms, "simulated request");

    if status == StatusCode::OK {
        (StatusCode::OK, Json(OkResponse::new(elapsed_ms))).into_response()
    } else {
        error_response(status, INTERNAL_SERVER_ERROR_MESSAGE)
    }
}

/// Handler for GET /fast: 10-50 ms, never fails.
pub async fn handle_fast(State(state): State<AppState>) -> Response {
    simulate_endpoint(&state, Endpoint::Fast).await
}

/// Handler for GET /slow: 1-3 s, never fails.
pub async fn handle_slow(State(state): State<AppState>) -> Response {
    simulate_endpoint(&state, Endpoint::Slow).await
}

/// Handler for GET /flaky: 50-200 ms, answers 500 with the configured probability.
pub async fn handle_flaky(State(state): State<AppState>) -> Response {
    simulate_endpoint(&state, Endpoint::Flaky).await
}

/// Handler for GET /health: constant payload, no latency, nothing recorded.
pub async fn handle_health() -> Response {
    (StatusCode::OK, Json(HealthResponse::healthy())).into_response()
}

/// Handler for GET /metrics: Prometheus text exposition of every recorded observation.
pub async fn handle_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
