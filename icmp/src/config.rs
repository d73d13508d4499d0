use std::time::Duration;

/// Per-instance probe configuration, replacing the reference source's
/// module-level `__DEBUG_*` flags and hard-coded TTL/timeout (SPEC_FULL.md
/// S9, "Global debug flags").
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub ttl: u32,
    pub timeout: Duration,
    pub verbose: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            ttl: 64,
            timeout: Duration::from_secs(5),
            verbose: false,
        }
    }
}

impl ProbeConfig {
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}
