use axum::extract::State;
use axum::http::StatusCode;
use slodemo_common::{Endpoint, EndpointProfile};
use slodemo_service::entropy::{Entropy, RngEntropy};
use slodemo_service::metrics::MetricsRegistry;
use slodemo_service::simulate::{
    decide_status, latency_for_roll, latency_ms, sample_latency, status_for_roll,
};
use slodemo_service::{handle_fast, handle_flaky, handle_slow, AppState};
use std::sync::Arc;
use std::time::Duration;

// The timer wheel rounds sleeps up to the next millisecond.
const TIMER_SLACK_SECS: f64 = 0.001;

fn assert_within(profile: &EndpointProfile, secs: f64) {
    assert!(
        secs >= profile.latency_min_secs && secs <= profile.latency_max_secs + TIMER_SLACK_SECS,
        "{} latency {secs} outside [{}, {}]",
        profile.endpoint.path(),
        profile.latency_min_secs,
        profile.latency_max_secs,
    );
}

#[test]
fn test_latency_for_roll_spans_range() {
    let slow = EndpointProfile::for_endpoint(Endpoint::Slow);
    assert_eq!(latency_for_roll(&slow, 0.0), Duration::from_secs(1));
    assert_eq!(latency_for_roll(&slow, 0.5), Duration::from_secs(2));

    let fast = EndpointProfile::for_endpoint(Endpoint::Fast);
    let near_top = latency_for_roll(&fast, 0.999_999).as_secs_f64();
    assert!(near_top < 0.05 && near_top > 0.049);
}

#[test]
fn test_sampled_latency_stays_in_range() {
    let entropy = RngEntropy::seeded(11);
    for endpoint in Endpoint::ALL {
        let profile = EndpointProfile::for_endpoint(endpoint);
        for _ in 0..1_000 {
            let secs = sample_latency(&profile, &entropy).as_secs_f64();
            assert!(secs >= profile.latency_min_secs && secs <= profile.latency_max_secs);
        }
    }
}

#[test]
fn test_status_for_roll_boundaries() {
    let flaky = EndpointProfile::for_endpoint(Endpoint::Flaky);
    assert_eq!(status_for_roll(&flaky, 0.0), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(status_for_roll(&flaky, 0.299), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(status_for_roll(&flaky, 0.30), StatusCode::OK);
    assert_eq!(status_for_roll(&flaky, 0.99), StatusCode::OK);

    let fast = EndpointProfile::for_endpoint(Endpoint::Fast);
    assert_eq!(status_for_roll(&fast, 0.0), StatusCode::OK);
}

/// Counts how many draws were taken.
struct CountingEntropy(std::sync::atomic::AtomicU64);

impl Entropy for CountingEntropy {
    fn next_unit(&self) -> f64 {
        self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        0.0
    }
}

#[test]
fn test_endpoints_that_never_fail_skip_the_draw() {
    let entropy = CountingEntropy(Default::default());
    for endpoint in [Endpoint::Fast, Endpoint::Slow] {
        let profile = EndpointProfile::for_endpoint(endpoint);
        assert_eq!(decide_status(&profile, &entropy), StatusCode::OK);
    }
    assert_eq!(entropy.0.load(std::sync::atomic::Ordering::Relaxed), 0);
}

#[test]
fn test_flaky_failure_rate_converges() {
    const N: usize = 10_000;
    let entropy = RngEntropy::seeded(2024);
    let flaky = EndpointProfile::for_endpoint(Endpoint::Flaky);

    let failures = (0..N)
        .filter(|_| decide_status(&flaky, &entropy) == StatusCode::INTERNAL_SERVER_ERROR)
        .count();
    let rate = failures as f64 / N as f64;

    // Standard deviation at p = 0.3, n = 10k is ~0.0046; allow four of them.
    assert!((rate - 0.30).abs() < 0.02, "observed failure rate {rate}");
}

#[test]
fn test_seeded_entropy_is_reproducible() {
    let a = RngEntropy::seeded(5);
    let b = RngEntropy::seeded(5);
    let xs: Vec<f64> = (0..10).map(|_| a.next_unit()).collect();
    let ys: Vec<f64> = (0..10).map(|_| b.next_unit()).collect();
    assert_eq!(xs, ys);
    assert!(xs.iter().all(|x| (0.0..1.0).contains(x)));
}

#[test]
fn test_latency_ms_rounds_to_one_decimal() {
    assert_eq!(latency_ms(Duration::from_micros(23_456)), 23.5);
    assert_eq!(latency_ms(Duration::from_micros(23_449)), 23.4);
    assert_eq!(latency_ms(Duration::from_millis(1_500)), 1500.0);
    assert_eq!(latency_ms(Duration::ZERO), 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_handler_latencies_stay_in_range() {
    let state = AppState::new(
        Arc::new(MetricsRegistry::new().unwrap()),
        Arc::new(RngEntropy::seeded(99)),
    );

    for endpoint in Endpoint::ALL {
        let profile = state.profile(endpoint);
        for _ in 0..1_000 {
            let started = tokio::time::Instant::now();
            let response = match endpoint {
                Endpoint::Fast => handle_fast(State(state.clone())).await,
                Endpoint::Slow => handle_slow(State(state.clone())).await,
                Endpoint::Flaky => handle_flaky(State(state.clone())).await,
            };
            assert_within(&profile, started.elapsed().as_secs_f64());
            assert!(
                response.status() == StatusCode::OK
                    || (endpoint == Endpoint::Flaky
                        && response.status() == StatusCode::INTERNAL_SERVER_ERROR)
            );
        }
        assert_eq!(state.metrics.duration_count(endpoint), 1_000);
    }
}
