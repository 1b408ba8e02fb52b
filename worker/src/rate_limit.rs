use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Per-source rate limiting enforced at the ingestion boundary via a
/// small in-memory map, keyed by chat id. A message from a chat seen
/// within `window_seconds` of its last message is blocked.
pub struct RateLimiter {
    window_seconds: i64,
    last_seen: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(window_seconds: u64) -> Self {
        Self {
            window_seconds: window_seconds as i64,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` if this key should be allowed through. Only allowed
    /// attempts update the timestamp, so a blocked burst doesn't keep
    /// pushing the window back.
    pub fn allow(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut last_seen = self.last_seen.lock().unwrap();
        let allowed = match last_seen.get(key) {
            Some(previous) => (now - *previous).num_seconds() >= self.window_seconds,
            None => true,
        };
        if allowed {
            last_seen.insert(key.to_string(), now);
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_rapid_repeat_from_same_key() {
        let limiter = RateLimiter::new(3);
        let now = Utc::now();
        assert!(limiter.allow("chat-1", now));
        assert!(!limiter.allow("chat-1", now + chrono::Duration::seconds(1)));
    }

    #[test]
    fn allows_after_window_elapses() {
        let limiter = RateLimiter::new(3);
        let now = Utc::now();
        assert!(limiter.allow("chat-1", now));
        assert!(limiter.allow("chat-1", now + chrono::Duration::seconds(4)));
    }

    #[test]
    fn different_keys_do_not_interfere() {
        let limiter = RateLimiter::new(3);
        let now = Utc::now();
        assert!(limiter.allow("chat-1", now));
        assert!(limiter.allow("chat-2", now));
    }
}
