use std::time::Duration;

use alloy_primitives::U256;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the per-authorization nonce is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum NonceStrategy {
    /// Unix milliseconds plus a random offset in `0..10`.
    ///
    /// Cheap and readable, but two calls within the same few milliseconds may collide.
    #[default]
    Timestamp,
    /// Uniformly random 128-bit value.
    Random,
}

impl NonceStrategy {
    /// `now` is the time since the Unix epoch.
    pub fn generate(&self, now: Duration) -> U256 {
        let mut rng = rand::thread_rng();
        match self {
            Self::Timestamp => U256::from(now.as_millis()) + U256::from(rng.gen_range(0u64..10)),
            Self::Random => U256::from(rng.gen::<u128>()),
        }
    }
}
