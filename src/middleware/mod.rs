//! Request admission

pub mod rate_limit;

pub use rate_limit::{client_key, FixedWindowRateLimiter, RateLimitEntry};
