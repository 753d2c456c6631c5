//! `ctd history` – list recent download runs.

use anyhow::Result;
use ctd_core::history::RunDb;
use std::time::{SystemTime, UNIX_EPOCH};

pub async fn run_history(db: &RunDb, limit: i64) -> Result<()> {
    let runs = db.list_runs(limit).await?;
    if runs.is_empty() {
        println!("No recorded runs.");
        return Ok(());
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    println!(
        "{:<6} {:<10} {:<8} {:<10} {:<7} {}",
        "ID", "STATE", "AGE", "STUDIES", "PAGES", "FIELDS"
    );
    for r in runs {
        let studies = r
            .study_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let pages = r
            .page_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<10} {:<8} {:<10} {:<7} {}",
            r.id,
            r.state.as_str(),
            fmt_age(now.saturating_sub(r.started_at)),
            studies,
            pages,
            r.fields
        );
    }
    Ok(())
}

/// Compact age like "42s", "5m", "3h", "2d".
pub(crate) fn fmt_age(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
