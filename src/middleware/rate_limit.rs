//! Per-client fixed-window rate limiting
//!
//! Counts live in process memory only. Entries are never evicted, and two
//! gateway instances do not share counts.

use axum::http::HeaderMap;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::RateLimitConfig;

/// Key used when the request carries no forwarding header
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Counter state for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: Instant,
}

/// Fixed-window request counter keyed by client
pub struct FixedWindowRateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
    enabled: bool,
}

impl FixedWindowRateLimiter {
    /// Create a limiter allowing `max_requests` per `window`
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
            enabled: true,
        }
    }

    /// Create a limiter from configuration
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            ..Self::new(config.max_requests, Duration::from_secs(config.window_secs))
        }
    }

    /// A limiter that admits everything
    pub fn unlimited() -> Self {
        Self {
            enabled: false,
            ..Self::new(u32::MAX, Duration::from_secs(1))
        }
    }

    /// Admit or reject a request from `client_key`
    pub fn admit(&self, client_key: &str) -> bool {
        self.admit_at(client_key, Instant::now())
    }

    /// Admission decision at an explicit instant
    pub fn admit_at(&self, client_key: &str, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }

        // The entry guard holds the shard lock, so check-and-increment is atomic per key.
        let mut entry = self
            .entries
            .entry(client_key.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_reset_at: now,
            });

        if entry.count == 0 || now >= entry.window_reset_at {
            *entry = RateLimitEntry {
                count: 1,
                window_reset_at: now + self.window,
            };
            return true;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            return true;
        }

        debug!(client = %client_key, count = entry.count, "Rate limit exceeded");
        false
    }

    /// Current entry for a client, if any
    pub fn entry(&self, client_key: &str) -> Option<RateLimitEntry> {
        self.entries.get(client_key).map(|e| *e.value())
    }

    /// Number of tracked clients
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Derive the client key from `X-Forwarded-For`, using its first address
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
