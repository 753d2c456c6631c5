//! Cache-or-download orchestration.

use anyhow::Result;
use tokio::sync::mpsc;

use crate::api::{self, page::RawStudy};
use crate::config::CtdConfig;
use crate::progress::ProgressStats;

use super::archive::{load_archive, write_archive, write_sample};
use super::CachePaths;

/// Result of a full download-and-persist pass.
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub studies: Vec<RawStudy>,
    pub pages: u64,
    pub archive_bytes: u64,
}

/// Download the whole registry and persist it: sample first, then the
/// archive (atomically). Blocking; call from `spawn_blocking` in async code.
pub fn download_and_archive(
    cfg: &CtdConfig,
    paths: &CachePaths,
    progress: Option<&mpsc::Sender<ProgressStats>>,
) -> Result<ArchiveOutcome> {
    let batch = api::download_all(cfg, None, progress)?;
    write_sample(&paths.sample, &batch.studies)?;
    let archive_bytes = write_archive(&paths.archive, &batch.studies)?;
    Ok(ArchiveOutcome {
        studies: batch.studies,
        pages: batch.pages,
        archive_bytes,
    })
}

/// Get the full study dump, from the local archive when present.
///
/// With `force` the archive is ignored and re-downloaded. The registry does
/// not guarantee record order between requests, so there is no incremental
/// refresh; periodically re-run with `force` to pick up new records.
pub fn get_studies(
    cfg: &CtdConfig,
    paths: &CachePaths,
    force: bool,
    progress: Option<&mpsc::Sender<ProgressStats>>,
) -> Result<Vec<RawStudy>> {
    if paths.archive.exists() && !force {
        return load_archive(&paths.archive);
    }
    let outcome = download_and_archive(cfg, paths, progress)?;
    Ok(outcome.studies)
}
