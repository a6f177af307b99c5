use crate::error::DbError;
use core_types::ExamResultRecord;
use sqlx::postgres::PgPool;

/// The `ResultsRepository` provides a high-level, read-only interface to the
/// exam-results table. It encapsulates all SQL and performs the data-quality
/// check on every fetched record; this crate never writes to the datastore.
#[derive(Debug, Clone)]
pub struct ResultsRepository {
    pool: PgPool,
}

impl ResultsRepository {
    /// Creates a new `ResultsRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches every persisted exam result, newest first.
    ///
    /// The newest-first order is the global ordering the rest of the pipeline
    /// relies on; downstream filtering preserves it. A record violating the
    /// score invariant turns the whole fetch into an error rather than being
    /// dropped on the floor.
    pub async fn fetch_all_results(&self) -> Result<Vec<ExamResultRecord>, DbError> {
        let records = sqlx::query_as::<_, ExamResultRecord>(
            "SELECT timestamp, student_id, exam_id, percent_correct \
             FROM exam_results ORDER BY timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        for record in &records {
            record.validate()?;
        }

        tracing::debug!(count = records.len(), "Loaded exam results from datastore.");
        Ok(records)
    }

    /// Fetches the distinct exam identifiers present in the datastore, sorted
    /// ascending. Used to populate the exam filter choices.
    pub async fn fetch_exam_ids(&self) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT exam_id FROM exam_results ORDER BY exam_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
