//! Fit scoring and ranking of bench candidates against client requirements.
//!
//! The [`matching`] module holds the pure scoring engine together with the
//! service facade, cache, candidate directory and HTTP router built around it.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
