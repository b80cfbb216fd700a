use slodemo_common::{Result, SloDemoError};
use std::time::Duration;

/// Requests per second when no rate is given.
pub const DEFAULT_RPS: f64 = 5.0;

/// A progress line is logged every this many requests.
pub const PROGRESS_EVERY: u64 = 20;

/// Environment variable overriding the target base URL.
pub const BASE_URL_ENV: &str = "SLODEMO_BASE_URL";

/// Parse the optional positional rate argument. Missing means [`DEFAULT_RPS`].
pub fn parse_rate(raw: Option<&str>) -> Result<f64> {
    match raw {
        None => Ok(DEFAULT_RPS),
        Some(s) => {
            let rate = s
                .trim()
                .parse::<f64>()
                .map_err(|_| SloDemoError::InvalidConfig(format!("rate must be a number, got {:?}", s)))?;
            validate_rate(rate)
        }
    }
}

/// A rate must be finite, strictly positive, and slow enough that `1 / rate`
/// still fits in a [`Duration`].
pub fn validate_rate(rate: f64) -> Result<f64> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(SloDemoError::InvalidConfig(format!("rate must be a positive number, got {}", rate)));
    }
    interval_for(rate)?;
    Ok(rate)
}

/// Fixed pause after each request: `1 / rate` seconds.
pub fn interval_for(rate: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(1.0 / rate).map_err(|_| {
        SloDemoError::InvalidConfig(format!("rate {} gives an interval too long to represent", rate))
    })
}

/// Per-request timeout; zero would fail every request before it is sent.
pub fn request_timeout(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(SloDemoError::InvalidConfig("timeout must be at least 1 second".to_string()));
    }
    Ok(Duration::from_secs(secs))
}
