//! CLI for the ctd registry downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ctd_core::api::fields::FieldPreset;
use ctd_core::config;
use ctd_core::history::RunDb;
use std::path::PathBuf;

use commands::{
    run_checksum, run_clear, run_completions, run_download, run_history, run_sample, run_status,
};

/// Top-level CLI for the ctd registry downloader.
#[derive(Debug, Parser)]
#[command(name = "ctd")]
#[command(about = "ctd: bulk downloader for the ClinicalTrials.gov registry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the full study registry into the local archive.
    Download {
        /// Re-download even if an archive is already present.
        #[arg(long)]
        force: bool,
        /// Studies per page (the API caps this at 1000).
        #[arg(long, value_name = "N")]
        page_size: Option<usize>,
        /// Field preset to request: brief, slim, or full.
        #[arg(long, value_name = "PRESET")]
        fields: Option<FieldPreset>,
        /// Stop after N studies and skip the archive (debugging aid).
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Show the archive and the latest recorded run.
    Status,

    /// List recent download runs.
    History {
        /// How many runs to show.
        #[arg(long, default_value = "10", value_name = "N")]
        limit: i64,
    },

    /// Print the pretty-printed sample of the last download.
    Sample,

    /// Compute SHA-256 of the archive (or an explicit file).
    Checksum {
        /// Path to hash; defaults to the archive.
        path: Option<PathBuf>,
    },

    /// Delete the local archive and sample.
    Clear,

    /// Generate a shell completion script on stdout.
    Completions {
        /// Shell to generate for.
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Completions don't need config or the ledger; handle before touching disk.
        if let CliCommand::Completions { shell } = &cli.command {
            return run_completions(*shell);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let db = RunDb::open_default().await?;

        match cli.command {
            CliCommand::Download {
                force,
                page_size,
                fields,
                limit,
            } => run_download(&db, &cfg, force, page_size, fields, limit).await?,
            CliCommand::Status => run_status(&db).await?,
            CliCommand::History { limit } => run_history(&db, limit).await?,
            CliCommand::Sample => run_sample().await?,
            CliCommand::Checksum { path } => run_checksum(path.as_deref()).await?,
            CliCommand::Clear => run_clear().await?,
            CliCommand::Completions { .. } => unreachable!("handled above"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
