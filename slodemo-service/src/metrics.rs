use prometheus::proto::Metric;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use slodemo_common::{Endpoint, Result, SloDemoError, METHOD_GET};

use crate::config::{DURATION_BUCKETS, REQUESTS_TOTAL, REQUEST_DURATION_SECONDS};

/// One recorded outcome of a single simulated call.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub method: &'static str,
    pub endpoint: Endpoint,
    pub status: u16,
    pub duration_secs: f64,
}

impl Observation {
    pub fn new(endpoint: Endpoint, status: u16, duration_secs: f64) -> Self {
        Self { method: METHOD_GET, endpoint, status, duration_secs }
    }
}

/// Request counter and duration histogram behind `/metrics`.
///
/// Each cell is atomic, so handlers running concurrently never lose an update.
/// Built once at startup and shared through `AppState`.
pub struct MetricsRegistry {
    registry: Registry,
    requests: IntCounterVec,
    durations: HistogramVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Total HTTP requests"),
            &["method", "endpoint", "status"],
        )
        .map_err(metrics_error)?;

        let durations = HistogramVec::new(
            HistogramOpts::new(REQUEST_DURATION_SECONDS, "Request duration in seconds")
                .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "endpoint"],
        )
        .map_err(metrics_error)?;

        registry.register(Box::new(requests.clone())).map_err(metrics_error)?;
        registry.register(Box::new(durations.clone())).map_err(metrics_error)?;

        Ok(Self { registry, requests, durations })
    }

    /// Add one observation: one counter increment and one histogram sample.
    pub fn record(&self, observation: &Observation) {
        let endpoint = observation.endpoint.path();
        let status = observation.status.to_string();
        self.durations
            .with_label_values(&[observation.method, endpoint])
            .observe(observation.duration_secs);
        self.requests
            .with_label_values(&[observation.method, endpoint, status.as_str()])
            .inc();
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer).map_err(metrics_error)
    }

    /// Current value of the request counter for `GET endpoint status`; 0 if never recorded.
    pub fn request_count(&self, endpoint: Endpoint, status: u16) -> u64 {
        let status = status.to_string();
        self.find(REQUESTS_TOTAL, &[("endpoint", endpoint.path()), ("status", status.as_str())])
            .iter()
            .map(|m| m.get_counter().get_value() as u64)
            .sum()
    }

    /// Every status recorded for `endpoint`, with its count, ordered by status.
    pub fn status_counts(&self, endpoint: Endpoint) -> Vec<(u16, u64)> {
        let mut counts: Vec<(u16, u64)> = self
            .find(REQUESTS_TOTAL, &[("endpoint", endpoint.path())])
            .iter()
            .filter_map(|m| {
                let status: u16 = label(m, "status")?.parse().ok()?;
                Some((status, m.get_counter().get_value() as u64))
            })
            .collect();
        counts.sort_unstable();
        counts
    }

    /// Number of durations observed for `endpoint`.
    pub fn duration_count(&self, endpoint: Endpoint) -> u64 {
        self.find(REQUEST_DURATION_SECONDS, &[("endpoint", endpoint.path())])
            .iter()
            .map(|m| m.get_histogram().get_sample_count())
            .sum()
    }

    // Reads gathered snapshots so lookups never create empty label sets.
    fn find(&self, family: &str, labels: &[(&str, &str)]) -> Vec<Metric> {
        self.registry
            .gather()
            .into_iter()
            .filter(|f| f.get_name() == family)
            .flat_map(|mut f| f.take_metric().into_vec())
            .filter(|m| labels.iter().all(|(name, value)| label(m, name) == Some(*value)))
            .collect()
    }
}

fn label<'m>(metric: &'m Metric, name: &str) -> Option<&'m str> {
    metric
        .get_label()
        .iter()
        .find(|pair| pair.get_name() == name)
        .map(|pair| pair.get_value())
}

fn metrics_error(e: impl std::fmt::Display) -> SloDemoError {
    SloDemoError::Metrics(e.to_string())
}
