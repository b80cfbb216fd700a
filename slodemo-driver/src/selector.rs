use rand::Rng;
use slodemo_common::{validate_weights, Endpoint, EndpointProfile, Result};

/// Picks endpoints with probability proportional to their weights.
/// Each pick is independent of the last.
#[derive(Debug, Clone)]
pub struct WeightedSelector {
    profiles: Vec<EndpointProfile>,
}

impl WeightedSelector {
    /// Fails if the weights are out of range or do not sum to 1.
    pub fn new(profiles: Vec<EndpointProfile>) -> Result<Self> {
        validate_weights(&profiles)?;
        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[EndpointProfile] {
        &self.profiles
    }

    /// Draw a random endpoint using `rng`.
    pub fn pick(&self, rng: &mut impl Rng) -> Endpoint {
        self.endpoint_for_roll(rng.gen::<f64>())
    }

    /// Map a roll in `[0, 1)` to the first profile whose cumulative weight reaches it.
    /// Exposed for deterministic testing.
    pub fn endpoint_for_roll(&self, roll: f64) -> Endpoint {
        let mut cumulative = 0.0;
        for profile in &self.profiles {
            cumulative += profile.weight;
            if roll <= cumulative {
                return profile.endpoint;
            }
        }
        // Rounding left the total just under the roll.
        self.profiles[0].endpoint
    }
}
