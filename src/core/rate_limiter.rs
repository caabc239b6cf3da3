use crate::core::{Pace, RateLimiter};
use std::time::Duration;

/// Constant sleep per pace. The defaults keep a single client under the
/// Admin REST bucket of two calls per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    pub metafield_fetch: Duration,
    pub metafield_create: Duration,
    pub record: Duration,
}

impl FixedDelay {
    pub fn new(metafield_fetch: Duration, metafield_create: Duration, record: Duration) -> Self {
        Self {
            metafield_fetch,
            metafield_create,
            record,
        }
    }

    pub fn delay_for(&self, pace: Pace) -> Duration {
        match pace {
            Pace::MetafieldFetch => self.metafield_fetch,
            Pace::MetafieldCreate => self.metafield_create,
            Pace::Record => self.record,
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(300),
            Duration::from_millis(200),
            Duration::from_millis(500),
        )
    }
}

impl RateLimiter for FixedDelay {
    async fn pause(&self, pace: Pace) {
        let delay = self.delay_for(pace);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl RateLimiter for NoDelay {
    async fn pause(&self, _pace: Pace) {}
}
