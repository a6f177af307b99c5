//! # Examiner Chart Renderer
//!
//! Renders the two result visualizations (the score-distribution histogram
//! and the per-student ranking bar chart) side by side into one in-memory
//! PNG buffer, ready for embedding into the paginated report.
//!
//! ## Architectural Principles
//!
//! - **Deterministic Output:** Identical input produces identical bytes.
//!   There is no randomized layout, and labels are stamped from a built-in
//!   pixel font rather than system fonts, so the output does not vary across
//!   machines either.
//! - **Pure Logic:** The renderer produces a buffer and nothing else; it
//!   never touches the filesystem or network.
//!
//! ## Public API
//!
//! - `render_overview`: Renders both charts for a filtered record set.
//! - `ChartImage`: The finished composite with its pixel dimensions.
//! - `ChartError`: The specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod error;
mod glyphs;
pub mod overview;

// Re-export the key components to create a clean, public-facing API.
pub use error::ChartError;
pub use overview::{render_overview, ChartImage};
