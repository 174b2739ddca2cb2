//! Rate limiting middleware
//!
//! This module provides a sliding-window rate limiter used to slow down
//! credential guessing against the login endpoint. Entries are keyed by
//! the attempted email address.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use crate::utils::errors::{Result, VentyTimeError};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_duration: Duration::from_secs(60),
            burst_allowance: 3,
        }
    }
}

/// Rate limit entry tracking requests for one key
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);

        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = Instant::now();
        }
    }

    /// Check if request is allowed
    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        let current_requests = self.requests.len() as u32;

        if current_requests < config.max_requests {
            return true;
        }

        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    /// Record a new request
    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Sliding-window rate limiter keyed by string
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

impl RateLimiter {
    /// Create a new RateLimiter instance
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check and record an attempt for a key
    pub fn check(&self, key: &str) -> Result<()> {
        let key = key.trim().to_lowercase();
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(key.clone()).or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record_request();
            debug!(key = %key, "Rate limit check passed");
            Ok(())
        } else {
            warn!(key = %key, "Rate limit exceeded");
            Err(VentyTimeError::RateLimitExceeded)
        }
    }

    /// Cleanup old entries (should be called periodically)
    pub fn cleanup_old_entries(&self) {
        let mut entries = self.entries.lock().unwrap();
        let cutoff = Instant::now() - self.config.window_duration * 2;

        entries.retain(|_, entry| entry.requests.iter().any(|&time| time > cutoff));

        debug!(remaining_entries = entries.len(), "Cleaned up old rate limit entries");
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_basic() {
        let config = RateLimitConfig {
            max_requests: 3,
            window_duration: Duration::from_secs(60),
            burst_allowance: 1,
        };

        let limiter = RateLimiter::new(config);

        // First 3 requests should pass
        assert!(limiter.check("alice@example.com").is_ok());
        assert!(limiter.check("alice@example.com").is_ok());
        assert!(limiter.check("alice@example.com").is_ok());

        // 4th request should use burst allowance
        assert!(limiter.check("alice@example.com").is_ok());

        // 5th request should fail
        assert!(limiter.check("alice@example.com").is_err());
    }

    #[test]
    fn test_keys_are_independent() {
        let config = RateLimitConfig {
            max_requests: 1,
            window_duration: Duration::from_secs(60),
            burst_allowance: 0,
        };

        let limiter = RateLimiter::new(config);

        assert!(limiter.check("alice@example.com").is_ok());
        assert!(limiter.check("alice@example.com").is_err());

        // Another key is unaffected
        assert!(limiter.check("bob@example.com").is_ok());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let config = RateLimitConfig {
            max_requests: 1,
            window_duration: Duration::from_secs(60),
            burst_allowance: 0,
        };

        let limiter = RateLimiter::new(config);

        assert!(limiter.check("Alice@Example.com").is_ok());
        assert!(limiter.check("alice@example.com").is_err());
    }

    #[test]
    fn test_cleanup() {
        let limiter = RateLimiter::default();

        limiter.check("alice@example.com").unwrap();
        limiter.check("alice@example.com").unwrap();

        // Cleanup should not remove recent entries
        limiter.cleanup_old_entries();
        let entries = limiter.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
    }
}
