//! Database migration runner for the memory backend.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::error::BackendError;
use crate::memory::MemoryBackend;

/// Initial schema: 5 tables, 4 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl MemoryBackend {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), BackendError> {
        self.conn()
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| BackendError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
