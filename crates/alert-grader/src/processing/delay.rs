//! Delay before a simulated result is written

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the producer waits before writing a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultDelay {
    /// Always the same delay
    Fixed(Duration),
    /// Uniformly distributed in `[min, max]`
    Uniform { min: Duration, max: Duration },
}

impl ResultDelay {
    /// No delay at all
    pub fn immediate() -> Self {
        Self::Fixed(Duration::ZERO)
    }

    /// Draw the delay for one job
    pub fn sample(&self) -> Duration {
        match self {
            ResultDelay::Fixed(delay) => *delay,
            ResultDelay::Uniform { min, max } if min >= max => *min,
            ResultDelay::Uniform { min, max } => rand::thread_rng().gen_range(*min..=*max),
        }
    }
}
