//! Login rate limiter against password guessing

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed per window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

#[derive(Debug)]
struct Attempts {
    count: u32,
    last_attempt: Instant,
    ban_expires: Option<Instant>,
}

impl Attempts {
    /// Neither banned nor inside the counting window any more
    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        self.ban_expires.is_none_or(|expires| now >= expires)
            && now.duration_since(self.last_attempt) >= window
    }
}

/// Per-key attempt counter, shared across handlers
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, Attempts>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key` and report whether it may proceed
    pub async fn check(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        // Unknown usernames would otherwise accumulate forever
        entries.retain(|_, entry| !entry.is_stale(now, window));

        let entry = entries.entry(key.to_string()).or_insert(Attempts {
            count: 0,
            last_attempt: now,
            ban_expires: None,
        });

        if let Some(ban_expires) = entry.ban_expires {
            if now < ban_expires {
                return false;
            }
            entry.count = 0;
            entry.ban_expires = None;
        }

        if now.duration_since(entry.last_attempt) >= window {
            entry.count = 0;
        }

        if entry.count >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                key,
                ban_seconds = self.config.ban_duration_seconds,
                "Too many login attempts, banning"
            );
            return false;
        }

        entry.count += 1;
        entry.last_attempt = now;
        true
    }

    /// Forget the attempts for `key`, e.g. after a successful login
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_max_attempts() {
        let limiter = RateLimiter::new(RateLimiterConfig::default());

        for _ in 0..5 {
            assert!(limiter.check("ash").await);
        }
        assert!(!limiter.check("ash").await);
        assert!(!limiter.check("ash").await);

        // Other keys are unaffected
        assert!(limiter.check("misty").await);
    }

    #[tokio::test]
    async fn test_reset_clears_attempts() {
        let limiter = RateLimiter::new(RateLimiterConfig::default());

        for _ in 0..5 {
            assert!(limiter.check("brock").await);
        }
        limiter.reset("brock").await;
        assert!(limiter.check("brock").await);
    }

    #[tokio::test]
    async fn test_ban_expires() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 1,
            window_seconds: 300,
            ban_duration_seconds: 0,
        });

        assert!(limiter.check("gary").await);
        assert!(!limiter.check("gary").await);
        // Zero-length ban has already lapsed
        assert!(limiter.check("gary").await);
    }

    #[tokio::test]
    async fn test_stale_keys_are_evicted() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 5,
            window_seconds: 0,
            ban_duration_seconds: 0,
        });

        for i in 0..100 {
            assert!(limiter.check(&format!("random_user_{}", i)).await);
        }
        // Every earlier key had already lapsed when the next one arrived
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn test_banned_keys_are_kept_until_the_ban_lapses() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 0,
            window_seconds: 0,
            ban_duration_seconds: 3600,
        });

        assert!(!limiter.check("gary").await);
        assert!(!limiter.check("ash").await);
        assert!(!limiter.check("gary").await);
        assert_eq!(limiter.tracked_keys().await, 2);
    }
}
