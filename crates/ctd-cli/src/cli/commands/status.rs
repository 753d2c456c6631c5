//! `ctd status` – show the archive and the latest recorded run.

use anyhow::Result;
use ctd_core::cache::CachePaths;
use ctd_core::history::RunDb;

use super::history::fmt_age;

pub async fn run_status(db: &RunDb) -> Result<()> {
    let paths = CachePaths::default_paths()?;

    if paths.archive.exists() {
        let meta = std::fs::metadata(&paths.archive)?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.elapsed().ok())
            .map(|d| format!("modified {} ago", fmt_age(d.as_secs() as i64)))
            .unwrap_or_else(|| "mtime unavailable".to_string());
        println!(
            "Archive: {} ({} bytes, {})",
            paths.archive.display(),
            meta.len(),
            modified
        );
    } else {
        println!("Archive: not downloaded (run `ctd download`).");
    }
    if paths.sample.exists() {
        println!("Sample:  {}", paths.sample.display());
    }

    match db.latest_run().await? {
        None => println!("No recorded runs."),
        Some(run) => {
            println!(
                "Last run: #{} {} (fields {}, page size {})",
                run.id,
                run.state.as_str(),
                run.fields,
                run.page_size
            );
            if let Some(n) = run.study_count {
                println!("  studies: {}", n);
            }
            if let Some(sha) = &run.archive_sha256 {
                println!("  sha256:  {}", sha);
            }
            if let Some(err) = &run.error {
                println!("  error:   {}", err);
            }
        }
    }
    Ok(())
}
