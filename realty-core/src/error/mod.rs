//! Error model for the listings data layer
//!
//! Every failure the data-fetching code sees is reduced to exactly one
//! [`AppError`] before anything else looks at it.
//!
//! ## Error Taxonomy
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┬────────┬───────────┐
//! │ Kind                 │ Code                 │ Status │ Retryable │
//! ├──────────────────────┼──────────────────────┼────────┼───────────┤
//! │ Validation           │ VALIDATION_ERROR     │ 400    │ no        │
//! │ Authentication       │ AUTHENTICATION_ERROR │ 401    │ no        │
//! │ Authorization        │ AUTHORIZATION_ERROR  │ 403    │ no        │
//! │ NotFound             │ NOT_FOUND_ERROR      │ 404    │ no        │
//! │ Database             │ DATABASE_ERROR       │ 500    │ yes       │
//! │ Network              │ NETWORK_ERROR        │ 0      │ yes       │
//! └──────────────────────┴──────────────────────┴────────┴───────────┘
//! ```
//!
//! Failures that have not been classified yet travel as a [`Failure`] until
//! the [`ErrorHandler`](crate::error_handler::ErrorHandler) normalizes them.

pub mod constructors;
pub mod conversions;
pub mod failure;
pub mod types;


pub use constructors::{ORIGINAL_ERROR_KEY, STACK_KEY};
pub use failure::Failure;
pub use types::{format_error_chain, AppError, AppResult, ErrorDetails, ErrorKind};
