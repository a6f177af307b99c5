//! # Examiner Analytics Engine
//!
//! This crate provides the filter and statistics stages of the results
//! pipeline. It acts as the "unbiased judge" of a set of graded exams.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of external systems. It
//!   depends only on `core-types` and performs no I/O.
//! - **Stateless Calculation:** The `StatisticsEngine` is a stateless
//!   calculator. It takes a filtered record set as input and produces a
//!   `ScoreSummary` as output, which makes it highly reliable and easy to
//!   test. Statistics are recomputed from scratch on every filter change;
//!   there is deliberately no incremental state to go stale.
//!
//! ## Public API
//!
//! - `apply_filters`: Narrows the loaded record set by exam membership and
//!   inclusive date range, preserving order.
//! - `StatisticsEngine`: The struct that contains the calculation logic.
//! - `ScoreSummary`: The standardized struct holding the descriptive
//!   statistics.
//! - `AnalyticsError`: The specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use engine::StatisticsEngine;
pub use error::AnalyticsError;
pub use filter::apply_filters;
pub use summary::ScoreSummary;
