//! Archive and sample file I/O.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use crate::api::page::RawStudy;

use super::{temp_path, SAMPLE_STUDIES};

/// Write the full dump as gzipped JSON. Goes to `<path>.part` first and is
/// renamed into place so a crash never leaves a truncated archive behind.
/// Returns the size of the finished archive in bytes.
pub fn write_archive(path: &Path, studies: &[RawStudy]) -> Result<u64> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);

    let file = File::create(&tmp)
        .with_context(|| format!("failed to create temp archive: {}", tmp.display()))?;
    let mut enc = GzEncoder::new(file, Compression::default());
    serde_json::to_writer(&mut enc, studies).context("failed to encode studies")?;
    let file = enc.finish().context("failed to finish gzip stream")?;
    file.sync_all().context("archive sync failed")?;
    drop(file);

    fs::rename(&tmp, path)
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))?;

    let bytes = fs::metadata(path)?.len();
    tracing::info!(
        bytes,
        count = studies.len(),
        "wrote archive to {}",
        path.display()
    );
    Ok(bytes)
}

/// Load the full dump from a gzipped JSON archive.
pub fn load_archive(path: &Path) -> Result<Vec<RawStudy>> {
    let t = Instant::now();
    let file =
        File::open(path).with_context(|| format!("failed to open archive: {}", path.display()))?;
    let dec = GzDecoder::new(BufReader::new(file));
    let studies: Vec<RawStudy> = serde_json::from_reader(BufReader::new(dec))
        .with_context(|| format!("failed to decode archive: {}", path.display()))?;
    tracing::info!(
        count = studies.len(),
        elapsed_secs = t.elapsed().as_secs_f64(),
        "loaded cached studies"
    );
    Ok(studies)
}

/// Write the first few studies pretty-printed, for eyeballing record shape.
pub fn write_sample(path: &Path, studies: &[RawStudy]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let head = &studies[..studies.len().min(SAMPLE_STUDIES)];
    let pretty = serde_json::to_vec_pretty(head).context("failed to encode sample")?;
    fs::write(&tmp, pretty)
        .with_context(|| format!("failed to write sample: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))?;
    Ok(())
}
