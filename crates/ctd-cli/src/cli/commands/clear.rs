//! `ctd clear` – delete the local archive and sample.

use anyhow::{Context, Result};
use ctd_core::cache::CachePaths;

pub async fn run_clear() -> Result<()> {
    let paths = CachePaths::default_paths()?;
    let mut removed = 0u32;
    for path in [&paths.archive, &paths.sample] {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            println!("Removed {}", path.display());
            removed += 1;
        }
    }
    if removed == 0 {
        println!("Nothing to remove.");
    }
    Ok(())
}
