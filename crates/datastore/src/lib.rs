//! # Examiner Datastore Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL results database. It is the system's read-only archive of
//! graded exams.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. It
//!   provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL.
//! - **Read-Only:** The grading pipeline writes results; this system only
//!   consumes them. There is deliberately no insert/update surface here, and
//!   no schema management of the foreign table.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses
//!   a connection pool (`PgPool`) for concurrent database access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `ResultsRepository`: The main struct that holds the connection pool and
//!   provides the high-level data access methods (e.g., `fetch_all_results`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use repository::ResultsRepository;
