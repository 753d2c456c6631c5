//! Types used by the run ledger.

/// Run identifier.
pub type RunId = i64;

/// High-level run state stored as a string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Error,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "running" => RunState::Running,
            "completed" => RunState::Completed,
            _ => RunState::Error,
        }
    }
}

/// Statistics recorded when a run completes.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub study_count: i64,
    pub page_count: i64,
    pub archive_bytes: i64,
    pub archive_sha256: String,
}

/// One row of the ledger, as shown by `status` and `history`.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: RunId,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub state: RunState,
    /// Field preset name ("brief", "slim", "full").
    pub fields: String,
    pub page_size: i64,
    pub study_count: Option<i64>,
    pub page_count: Option<i64>,
    pub archive_bytes: Option<i64>,
    pub archive_sha256: Option<String>,
    pub error: Option<String>,
}
