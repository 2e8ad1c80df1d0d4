//! Pacing for embedding requests

use crate::config::{ThrottleConfig, ThrottleMode};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::trace;

/// Paces consecutive provider requests
///
/// Call [`Throttle::before_request`] right before and [`Throttle::after_request`]
/// right after every request, whether or not it succeeded.
pub enum Throttle {
    /// Sleep a fixed delay after every request
    FixedDelay(Duration),
    /// Wait for a permit before every request
    TokenBucket(RateLimiter<NotKeyed, InMemoryState, DefaultClock>),
}

impl Throttle {
    pub fn from_config(config: &ThrottleConfig) -> Self {
        match config.mode {
            ThrottleMode::Fixed => Throttle::FixedDelay(Duration::from_millis(config.delay_ms)),
            ThrottleMode::TokenBucket => {
                let rpm = NonZeroU32::new(config.requests_per_minute).unwrap_or(nonzero!(1u32));
                // Burst of one keeps requests evenly spaced
                let quota = Quota::per_minute(rpm).allow_burst(nonzero!(1u32));
                Throttle::TokenBucket(RateLimiter::direct(quota))
            }
        }
    }

    /// No pacing at all
    pub fn none() -> Self {
        Throttle::FixedDelay(Duration::ZERO)
    }

    pub async fn before_request(&self) {
        if let Throttle::TokenBucket(limiter) = self {
            limiter.until_ready().await;
        }
    }

    pub async fn after_request(&self) {
        if let Throttle::FixedDelay(delay) = self {
            if !delay.is_zero() {
                trace!("Throttling: waiting {:?}", delay);
                tokio::time::sleep(*delay).await;
            }
        }
    }
}
