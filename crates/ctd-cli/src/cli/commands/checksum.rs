//! `ctd checksum` – compute SHA-256 of the archive (or an explicit file).

use anyhow::Result;
use ctd_core::cache::CachePaths;
use ctd_core::checksum;
use std::path::Path;

pub async fn run_checksum(path: Option<&Path>) -> Result<()> {
    let default_archive;
    let path = match path {
        Some(p) => p,
        None => {
            default_archive = CachePaths::default_paths()?.archive;
            &default_archive
        }
    };
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
