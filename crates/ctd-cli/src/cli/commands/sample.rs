//! `ctd sample` – print the pretty-printed sample of the last download.

use anyhow::{Context, Result};
use ctd_core::cache::CachePaths;

pub async fn run_sample() -> Result<()> {
    let paths = CachePaths::default_paths()?;
    let text = std::fs::read_to_string(&paths.sample).with_context(|| {
        format!(
            "no sample at {} (run `ctd download` first)",
            paths.sample.display()
        )
    })?;
    println!("{}", text);
    Ok(())
}
