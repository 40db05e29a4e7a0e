//! HTTP client module
//!
//! The concrete fetch capability behind every stream.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket limiter sized to Trello's published limits
//! - **Key/token auth**: Credentials applied as query parameters
//! - **Shape checking**: List endpoints must return JSON arrays; anything
//!   else is a fatal schema error, not a retry candidate

mod client;
mod rate_limit;

pub use client::{ClientConfig, TrelloApi, TrelloClient};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
