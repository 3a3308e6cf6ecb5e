//! Reusable patterns built on top of the error layer

pub mod retry;

pub use retry::{retry, RetryConfig};
