//! `ctd completions` – emit a shell completion script.

use anyhow::Result;
use clap::CommandFactory;

pub fn run_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    clap_complete::generate(shell, &mut cmd, "ctd", &mut std::io::stdout());
    Ok(())
}
