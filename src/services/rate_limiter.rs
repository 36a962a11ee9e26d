use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

pub const DEFAULT_MAX_REQUESTS: u32 = 20;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Key used when no client address could be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct RateBucket {
    reset_at: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: Instant,
}

impl RateDecision {
    /// Whole seconds until the window resets, never less than one.
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        let wait = self.reset_at.saturating_duration_since(now);
        let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
        secs.max(1)
    }
}

/// Fixed-window request counter per client key.
///
/// A client can land up to `max_requests` at the end of one window and
/// another `max_requests` at the start of the next; that boundary burst is
/// accepted.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, RateBucket>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            max_requests: max_requests.max(1),
            window,
        }
    }

    pub fn check(&self, client_key: Option<&str>) -> RateDecision {
        self.check_at(client_key, Instant::now())
    }

    fn check_at(&self, client_key: Option<&str>, now: Instant) -> RateDecision {
        let key = client_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(UNKNOWN_CLIENT);

        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        match buckets.get_mut(key) {
            Some(bucket) if bucket.reset_at > now => {
                if bucket.count >= self.max_requests {
                    return RateDecision {
                        allowed: false,
                        remaining: 0,
                        reset_at: bucket.reset_at,
                    };
                }
                bucket.count += 1;
                RateDecision {
                    allowed: true,
                    remaining: self.max_requests - bucket.count,
                    reset_at: bucket.reset_at,
                }
            }
            _ => {
                let bucket = RateBucket {
                    reset_at: now + self.window,
                    count: 1,
                };
                buckets.insert(key.to_string(), bucket);
                RateDecision {
                    allowed: true,
                    remaining: self.max_requests - 1,
                    reset_at: bucket.reset_at,
                }
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}
