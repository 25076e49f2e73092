//! Centralized error handling for the channel logo updater
//!
//! Every component returns [`AppResult`] for conditions that abort a pass
//! (parse and serialization failures, unreadable inputs). Conditions the
//! pipeline can continue through are not errors: they travel as
//! [`Outcome::Degraded`](crate::models::Outcome::Degraded) values or
//! [`Degradation`](crate::models::Degradation) entries on pass results.
//!
//! # Usage
//!
//! ```rust
//! use channel_logo_updater::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("no inputs configured"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
