use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter};

pub type KeyedRateLimiter = RateLimiter<i64, DashMapStateStore<i64>, DefaultClock>;

pub struct RateLimiters {
    /// Keyed by user id
    pub commands: KeyedRateLimiter,
    /// Keyed by chat id
    pub digest: KeyedRateLimiter,
}

impl RateLimiters {
    pub fn new() -> Self {
        let burst = NonZeroU32::MIN.saturating_add(2);

        Self {
            commands: RateLimiter::keyed(Quota::per_second(NonZeroU32::MIN).allow_burst(burst)),
            digest: RateLimiter::keyed(Quota::per_minute(NonZeroU32::MIN)),
        }
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new()
    }
}
