//! Persistent run ledger (SQLite via sqlx).
//!
//! Records every download run with its timestamps, field preset, study and
//! page counts, archive size, and digest so `status` and `history` can answer
//! what was downloaded and when without touching the archive itself.

pub mod db;
pub mod types;

mod runs;

pub use db::*;
pub use types::*;
