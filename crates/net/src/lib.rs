#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for mirrorcheck
//!
//! This crate owns the single HTTP client shared by every comparison task.
//! All requests leave through one global rate limiter so that consecutive
//! departures are spaced by at least the configured minimum distance,
//! regardless of how many tasks are issuing requests.

mod client;
mod limiter;

pub use client::{status_line, NetClient, NetConfig};
pub use limiter::RateLimiter;
