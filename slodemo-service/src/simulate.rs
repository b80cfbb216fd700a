use axum::http::StatusCode;
use slodemo_common::EndpointProfile;
use std::time::Duration;

use crate::entropy::Entropy;

/// Draw a sleep duration uniformly from the profile's latency range.
pub fn sample_latency(profile: &EndpointProfile, entropy: &dyn Entropy) -> Duration {
    latency_for_roll(profile, entropy.next_unit())
}

/// Map a roll in `[0, 1)` onto the profile's latency range.
/// Exposed for deterministic testing.
pub fn latency_for_roll(profile: &EndpointProfile, roll: f64) -> Duration {
    let span = profile.latency_max_secs - profile.latency_min_secs;
    Duration::from_secs_f64(profile.latency_min_secs + roll * span)
}

/// Decide the response status with one fresh draw. Endpoints that never fail skip the draw.
pub fn decide_status(profile: &EndpointProfile, entropy: &dyn Entropy) -> StatusCode {
    if profile.failure_probability <= 0.0 {
        return StatusCode::OK;
    }
    status_for_roll(profile, entropy.next_unit())
}

/// `500` when `roll` falls under the failure probability, `200` otherwise.
pub fn status_for_roll(profile: &EndpointProfile, roll: f64) -> StatusCode {
    if roll < profile.failure_probability {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// Milliseconds rounded to one decimal place, as reported in `latency_ms`.
pub fn latency_ms(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 10_000.0).round() / 10.0
}
