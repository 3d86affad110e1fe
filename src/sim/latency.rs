//! Artificial network latency injected before each simulated response.

use std::fmt;
use std::time::Duration;

use crate::endpoints::EndpointDefinition;

/// How long a simulated call waits before its handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatencyPolicy {
    /// Each endpoint's own default delay.
    #[default]
    Endpoint,
    /// The same delay for every endpoint.
    Fixed(Duration),
    /// No delay; used by tests.
    Off,
}

impl LatencyPolicy {
    /// Delay applied to calls on `definition`.
    pub fn delay_for(&self, definition: &EndpointDefinition) -> Duration {
        match self {
            Self::Endpoint => definition.latency(),
            Self::Fixed(delay) => *delay,
            Self::Off => Duration::ZERO,
        }
    }

    /// Sleeps for the delay of `definition` on the tokio timer.
    pub async fn wait(&self, definition: &EndpointDefinition) {
        let delay = self.delay_for(definition);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl fmt::Display for LatencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endpoint => f.write_str("endpoint defaults"),
            Self::Fixed(delay) => write!(f, "fixed {} ms", delay.as_millis()),
            Self::Off => f.write_str("none"),
        }
    }
}
