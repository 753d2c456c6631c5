//! Local archive store.
//!
//! The full dump lives as gzipped JSON in the XDG data directory, next to a
//! small pretty-printed sample so the record shape can be inspected without
//! decompressing the whole archive. Writes go to a `.part` file first and are
//! renamed into place.

mod archive;
mod studies;

pub use archive::{load_archive, write_archive, write_sample};
pub use studies::{download_and_archive, get_studies, ArchiveOutcome};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// File name of the gzipped full dump.
pub const ARCHIVE_NAME: &str = "studies.json.gz";

/// File name of the pretty-printed sample.
pub const SAMPLE_NAME: &str = "studies_sample.json";

/// Number of studies kept in the sample file.
pub const SAMPLE_STUDIES: usize = 5;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Where the archive and sample live.
#[derive(Debug, Clone)]
pub struct CachePaths {
    pub archive: PathBuf,
    pub sample: PathBuf,
}

impl CachePaths {
    /// Paths under the XDG data directory (`~/.local/share/ctd/`), creating it
    /// if needed.
    pub fn default_paths() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("ctd")?;
        let data_dir = xdg_dirs.get_data_home();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self::in_dir(&data_dir))
    }

    /// Paths inside an explicit directory (tests, alternate data roots).
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            archive: dir.join(ARCHIVE_NAME),
            sample: dir.join(SAMPLE_NAME),
        }
    }
}

/// Path for the temp file: appends `.part` to the final path.
pub(crate) fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
