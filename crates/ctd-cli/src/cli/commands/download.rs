//! `ctd download` – fetch the registry and persist the archive.

use anyhow::{Context, Result};
use ctd_core::api;
use ctd_core::api::fields::FieldPreset;
use ctd_core::cache::{self, ArchiveOutcome, CachePaths};
use ctd_core::checksum;
use ctd_core::config::CtdConfig;
use ctd_core::history::{RunDb, RunId, RunStats};
use ctd_core::progress::ProgressStats;
use std::time::Instant;
use tokio::sync::mpsc;

pub async fn run_download(
    db: &RunDb,
    cfg: &CtdConfig,
    force: bool,
    page_size: Option<usize>,
    fields: Option<FieldPreset>,
    limit: Option<usize>,
) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(n) = page_size {
        cfg.page_size = n;
    }
    if let Some(preset) = fields {
        cfg.fields = preset;
    }

    // Bounded fetch for inspection: no archive, no ledger entry.
    if let Some(max) = limit {
        let (tx, printer) = spawn_progress_printer();
        let batch = tokio::task::spawn_blocking(move || api::download_all(&cfg, Some(max), Some(&tx)))
            .await
            .context("download task panicked")??;
        let _ = printer.await;
        println!(
            "Fetched {} of up to {} studies; archive not written.",
            batch.studies.len(),
            max
        );
        return Ok(());
    }

    let paths = CachePaths::default_paths()?;
    if paths.archive.exists() && !force {
        println!(
            "Archive already present at {} (use --force to re-download).",
            paths.archive.display()
        );
        return Ok(());
    }

    let recovered = db.recover_stale_runs().await?;
    if recovered > 0 {
        tracing::info!("marked {} interrupted run(s) as error", recovered);
    }

    let run_id = db.start_run(cfg.fields.as_str(), cfg.page_size as i64).await?;
    let (tx, printer) = spawn_progress_printer();
    let task_cfg = cfg.clone();
    let task_paths = paths.clone();
    let res = tokio::task::spawn_blocking(move || {
        cache::download_and_archive(&task_cfg, &task_paths, Some(&tx))
    })
    .await
    .context("download task panicked")?;
    let _ = printer.await;

    // Every failure past start_run must leave the ledger row in a terminal
    // state, checksum and finish_run errors included.
    let res = match res {
        Ok(outcome) => finalize_run(db, run_id, &paths, &outcome)
            .await
            .map(|digest| (outcome, digest)),
        Err(e) => Err(e),
    };

    match res {
        Ok((outcome, digest)) => {
            println!(
                "Downloaded {} studies in {} page(s).",
                outcome.studies.len(),
                outcome.pages
            );
            println!(
                "Archive: {} ({} bytes, sha256 {})",
                paths.archive.display(),
                outcome.archive_bytes,
                digest
            );
            println!("Sample:  {}", paths.sample.display());
            Ok(())
        }
        Err(e) => {
            db.fail_run(run_id, &format!("{e:#}")).await?;
            Err(e)
        }
    }
}

/// Digest the archive and mark the run completed. Returns the digest.
async fn finalize_run(
    db: &RunDb,
    run_id: RunId,
    paths: &CachePaths,
    outcome: &ArchiveOutcome,
) -> Result<String> {
    let digest = checksum::sha256_path(&paths.archive)?;
    db.finish_run(
        run_id,
        &RunStats {
            study_count: outcome.studies.len() as i64,
            page_count: outcome.pages as i64,
            archive_bytes: outcome.archive_bytes as i64,
            archive_sha256: digest.clone(),
        },
    )
    .await?;
    Ok(digest)
}

/// Spawn the task that renders progress snapshots from the download loop.
fn spawn_progress_printer() -> (
    mpsc::Sender<ProgressStats>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::channel::<ProgressStats>(16);
    const PROGRESS_INTERVAL_MS: u64 = 500;
    let handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        while let Some(stats) = rx.recv().await {
            let now = Instant::now();
            let finished = stats
                .total_studies
                .is_some_and(|t| stats.studies_done >= t);
            if now.duration_since(last_print).as_millis() as u64 >= PROGRESS_INTERVAL_MS || finished
            {
                let total = stats
                    .total_studies
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let pct = stats
                    .fraction()
                    .map(|f| format!("{:.1}%", f * 100.0))
                    .unwrap_or_else(|| "?".to_string());
                let eta = stats
                    .eta_secs()
                    .map(|s| format!("{:.0}s", s))
                    .unwrap_or_else(|| "?".to_string());
                println!(
                    "\r  {} / {} studies ({})  {:.0} studies/s  ETA {}  ",
                    stats.studies_done,
                    total,
                    pct,
                    stats.studies_per_sec(),
                    eta
                );
                last_print = now;
            }
        }
        println!();
    });
    (tx, handle)
}
