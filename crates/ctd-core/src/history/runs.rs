//! Run ledger operations: start, finish, fail, recover, list.

use anyhow::Result;
use sqlx::Row;

use super::db::{unix_timestamp, RunDb};
use super::types::{RunId, RunRecord, RunState, RunStats};

impl RunDb {
    /// Insert a new run in the `running` state and return its id.
    pub async fn start_run(&self, fields: &str, page_size: i64) -> Result<RunId> {
        let now = unix_timestamp();
        let row_id = sqlx::query(
            r#"
            INSERT INTO runs (started_at, finished_at, state, fields, page_size)
            VALUES (?1, NULL, ?2, ?3, ?4)
            "#,
        )
        .bind(now)
        .bind(RunState::Running.as_str())
        .bind(fields)
        .bind(page_size)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(row_id)
    }

    /// Mark a run completed and record its statistics.
    pub async fn finish_run(&self, id: RunId, stats: &RunStats) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE runs
            SET state = ?1,
                finished_at = ?2,
                study_count = ?3,
                page_count = ?4,
                archive_bytes = ?5,
                archive_sha256 = ?6
            WHERE id = ?7
            "#,
        )
        .bind(RunState::Completed.as_str())
        .bind(now)
        .bind(stats.study_count)
        .bind(stats.page_count)
        .bind(stats.archive_bytes)
        .bind(&stats.archive_sha256)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mark a run failed with an error message.
    pub async fn fail_run(&self, id: RunId, error: &str) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE runs
            SET state = ?1,
                finished_at = ?2,
                error = ?3
            WHERE id = ?4
            "#,
        )
        .bind(RunState::Error.as_str())
        .bind(now)
        .bind(error)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Normalize any run left in `running` to `error` (e.g. after a crash).
    /// Call before starting a new run. Returns the number of runs touched.
    pub async fn recover_stale_runs(&self) -> Result<u64> {
        let now = unix_timestamp();
        let r = sqlx::query(
            r#"
            UPDATE runs
            SET state = 'error',
                finished_at = ?1,
                error = 'interrupted'
            WHERE state = 'running'
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }

    /// List the most recent runs, newest first.
    pub async fn list_runs(&self, limit: i64) -> Result<Vec<RunRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, started_at, finished_at, state, fields, page_size,
                   study_count, page_count, archive_bytes, archive_sha256, error
            FROM runs
            ORDER BY started_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(record_from_row(&row));
        }
        Ok(out)
    }

    /// The most recent run, if any.
    pub async fn latest_run(&self) -> Result<Option<RunRecord>> {
        Ok(self.list_runs(1).await?.into_iter().next())
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> RunRecord {
    let state_str: String = row.get("state");
    RunRecord {
        id: row.get("id"),
        started_at: row.get("started_at"),
        finished_at: row.get("finished_at"),
        state: RunState::from_str(&state_str),
        fields: row.get("fields"),
        page_size: row.get("page_size"),
        study_count: row.get("study_count"),
        page_count: row.get("page_count"),
        archive_bytes: row.get("archive_bytes"),
        archive_sha256: row.get("archive_sha256"),
        error: row.get("error"),
    }
}
