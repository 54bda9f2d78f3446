//! CLI for ariadl: queue episodes of a video site on an aria2 daemon.

mod commands;

use anyhow::{Context, Result};
use ariadl_core::config;
use ariadl_core::flow::Action;
use ariadl_core::settings::SettingsStore;
use ariadl_core::store::ValueDb;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_cleanup, run_collection, run_completions, run_episode, run_settings};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ariadl")]
#[command(about = "Send a video site's episodes to an aria2 daemon", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    #[command(about = Action::Settings.label())]
    Settings {
        /// Replace the stored record with this JSON object.
        #[arg(long, value_name = "JSON", conflicts_with_all = ["set_file", "reset"])]
        set: Option<String>,
        /// Replace the stored record with the contents of a file.
        #[arg(long, value_name = "PATH", conflicts_with = "reset")]
        set_file: Option<PathBuf>,
        /// Forget the stored record; defaults apply again.
        #[arg(long)]
        reset: bool,
    },

    #[command(about = Action::DownloadEpisode.label())]
    Episode {
        /// Watch page URL.
        url: String,
        /// Queue what resolves instead of aborting on the first failed episode.
        #[arg(long)]
        skip_failed: bool,
    },

    #[command(about = Action::DownloadCollection.label())]
    Collection {
        /// Watch page URL.
        url: String,
        /// Queue what resolves instead of aborting on the first failed episode.
        #[arg(long)]
        skip_failed: bool,
    },

    /// Remove store keys left with a null value.
    Cleanup,

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Needs neither config nor store.
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell, &mut Cli::command());
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let db = ValueDb::open_default()
            .await
            .context("opening value store")?;
        // Startup housekeeping; `cleanup` itself reports what it removes.
        if !matches!(cli.command, CliCommand::Cleanup) {
            SettingsStore::new(&db).cleanup().await?;
        }

        match cli.command {
            CliCommand::Settings {
                set,
                set_file,
                reset,
            } => run_settings(&db, set, set_file, reset).await?,
            CliCommand::Episode { url, skip_failed } => {
                run_episode(db, &cfg, &url, skip_failed).await?
            }
            CliCommand::Collection { url, skip_failed } => {
                run_collection(db, &cfg, &url, skip_failed).await?
            }
            CliCommand::Cleanup => run_cleanup(&db).await?,
            CliCommand::Completions { .. } => unreachable!("handled above"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
