use rand::rngs::StdRng;
use slodemo_client::{CallResult, Client};
use slodemo_common::{Endpoint, Result, SloDemoError};
use std::future::Future;
use std::io;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::PROGRESS_EVERY;
use crate::selector::WeightedSelector;
use crate::stats::RunStats;

/// How a single request ended, from the driver's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// HTTP 200.
    Success { latency_ms: Option<f64> },
    /// Any other status.
    Failure { status: u16, detail: String },
    /// No response at all.
    TransportError(String),
}

impl RequestOutcome {
    pub fn from_result(result: Result<CallResult>) -> Self {
        match result {
            Ok(r) => RequestOutcome::Success { latency_ms: r.latency_ms },
            Err(SloDemoError::HttpError(status, detail)) => RequestOutcome::Failure { status, detail },
            Err(e) => RequestOutcome::TransportError(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success { .. })
    }

    /// `✓` for success, `✗ <status>` or `✗ <error>` otherwise.
    pub fn symbol(&self) -> String {
        match self {
            RequestOutcome::Success { .. } => "✓".to_string(),
            RequestOutcome::Failure { status, .. } => format!("✗ {}", status),
            RequestOutcome::TransportError(e) => format!("✗ {}", e),
        }
    }
}

/// Returns `true` when `count` requests warrant a progress line.
pub fn is_progress_tick(count: u64) -> bool {
    count > 0 && count % PROGRESS_EVERY == 0
}

/// Sends one request at a time, sleeping a fixed interval after each.
///
/// The pause comes after the response, so slow endpoints drag the achieved
/// rate below the target.
pub struct Pacer {
    client: Client,
    selector: WeightedSelector,
    interval: Duration,
    rng: StdRng,
    stats: RunStats,
    started: Option<Instant>,
}

impl Pacer {
    pub fn new(client: Client, selector: WeightedSelector, interval: Duration, rng: StdRng) -> Self {
        Self { client, selector, interval, rng, stats: RunStats::default(), started: None }
    }

    /// Totals so far, with elapsed time measured from the first request.
    pub fn stats(&self) -> RunStats {
        RunStats {
            elapsed_secs: self.started.map(|s| s.elapsed().as_secs_f64()).unwrap_or(0.0),
            ..self.stats.clone()
        }
    }

    /// Loop until `limit` requests have been sent, or forever when `limit` is `None`.
    pub async fn run(&mut self, limit: Option<u64>) -> RunStats {
        while limit.map_or(true, |n| self.stats.sent < n) {
            self.step().await;
        }
        self.stats()
    }

    /// Like [`Pacer::run`], but stop early once `shutdown` resolves.
    ///
    /// A `shutdown` that fails (no Ctrl+C handler could be installed) is logged
    /// and ignored; the loop keeps going.
    pub async fn run_until<F>(&mut self, limit: Option<u64>, shutdown: F) -> RunStats
    where
        F: Future<Output = io::Result<()>>,
    {
        tokio::pin!(shutdown);
        let listen_failed = tokio::select! {
            _ = self.run(limit) => None,
            res = &mut shutdown => res.err(),
        };
        if let Some(e) = listen_failed {
            warn!(error = %e, "cannot listen for shutdown signal; continuing without it");
            self.run(limit).await;
        }
        self.stats()
    }

    /// Send one request, log its outcome, then sleep for the interval.
    pub async fn step(&mut self) -> (Endpoint, RequestOutcome) {
        self.started.get_or_insert_with(Instant::now);

        let endpoint = self.selector.pick(&mut self.rng);
        let outcome = RequestOutcome::from_result(self.client.call(endpoint).await);
        self.record(&outcome);

        if outcome.is_success() {
            info!(endpoint = endpoint.path(), "{}", outcome.symbol());
        } else {
            warn!(endpoint = endpoint.path(), "{}", outcome.symbol());
        }
        if is_progress_tick(self.stats.sent) {
            info!("  {} sent", self.stats.sent);
        }

        sleep(self.interval).await;
        (endpoint, outcome)
    }

    fn record(&mut self, outcome: &RequestOutcome) {
        self.stats.sent += 1;
        match outcome {
            RequestOutcome::Success { .. } => self.stats.succeeded += 1,
            RequestOutcome::Failure { .. } => self.stats.failed += 1,
            RequestOutcome::TransportError(_) => self.stats.transport_errors += 1,
        }
    }
}
