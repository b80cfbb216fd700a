/// Running totals for one driver session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub sent: u64,
    pub succeeded: u64,
    /// Answered with a status other than 200.
    pub failed: u64,
    /// Never got an answer: refused, reset, timed out.
    pub transport_errors: u64,
    pub elapsed_secs: f64,
}

impl RunStats {
    /// Fraction of sent requests that did not succeed; 0 before anything is sent.
    pub fn error_rate(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        (self.failed + self.transport_errors) as f64 / self.sent as f64
    }

    pub fn throughput_rps(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.sent as f64 / self.elapsed_secs
    }
}
