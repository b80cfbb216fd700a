/// Address the service listens on when `--bind` is not given.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Request counter, labelled by method, endpoint and status.
pub const REQUESTS_TOTAL: &str = "http_requests_total";

/// Request duration histogram, labelled by method and endpoint.
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Histogram upper bounds in seconds; `+Inf` is added by the encoder.
/// Tuned for a mix of fast and slow endpoints; anything past 5s is a problem.
pub const DURATION_BUCKETS: [f64; 10] = [0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
