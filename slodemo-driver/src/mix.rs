use slodemo_common::{EndpointProfile, DEFAULT_PROFILES};

/// Named traffic mixes.
///
/// | Mix     | fast  | slow  | flaky |
/// |---------|-------|-------|-------|
/// | Steady  | 0.70  | 0.10  | 0.20  |
/// | Recover | 0.875 | 0.125 | 0.0   |
/// | Burn    | 0.40  | 0.10  | 0.50  |
///
/// `Recover` drops flaky traffic so the error budget refills; `Burn` cranks it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficMix {
    Steady,
    Recover,
    Burn,
}

impl TrafficMix {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "steady" => Some(TrafficMix::Steady),
            "recover" => Some(TrafficMix::Recover),
            "burn" => Some(TrafficMix::Burn),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            TrafficMix::Steady => "steady",
            TrafficMix::Recover => "recover",
            TrafficMix::Burn => "burn",
        }
    }

    /// Endpoint profiles carrying this mix's weights, in fast, slow, flaky order.
    pub fn profiles(&self) -> Vec<EndpointProfile> {
        let [fast, slow, flaky] = DEFAULT_PROFILES;
        let (w_fast, w_slow, w_flaky) = match self {
            TrafficMix::Steady => (0.70, 0.10, 0.20),
            TrafficMix::Recover => (0.875, 0.125, 0.0),
            TrafficMix::Burn => (0.40, 0.10, 0.50),
        };
        vec![fast.with_weight(w_fast), slow.with_weight(w_slow), flaky.with_weight(w_flaky)]
    }
}
