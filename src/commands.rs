use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::AppState;

/// Inspect, export or reset the study data recorded on this machine.
#[derive(Debug, Parser)]
#[command(name = "bitvoyager", version, about)]
pub struct Cli {
    /// Directory holding the tracker database and settings.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current metrics snapshot as JSON.
    Show,
    /// Write the metrics snapshot to a JSON file named after the session.
    Export {
        /// Directory to write into instead of the configured export directory.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Start a new session with zeroed counters.
    Reset,
    /// Forget the session, its metrics and the learning profile.
    ResetStudy,
}

impl Command {
    pub fn export_override(&self) -> Option<PathBuf> {
        match self {
            Command::Export { out } => out.clone(),
            _ => None,
        }
    }
}

pub fn dispatch(state: &AppState, command: &Command) -> Result<()> {
    match command {
        Command::Show => {
            let snapshot = state.tracker.get_metrics_data();
            let rendered = serde_json::to_string_pretty(&snapshot)
                .context("failed to render metrics snapshot")?;
            println!("{rendered}");
        }
        Command::Export { .. } => {
            let (snapshot, path) = state
                .tracker
                .try_export_metrics()
                .with_context(|| format!("export to {} failed", state.export_dir.display()))?;
            println!(
                "{} ({} completed challenges)",
                path.display(),
                snapshot.metrics.completed_challenges
            );
        }
        Command::Reset => {
            let session_id = state.tracker.reset_metrics();
            println!("{session_id}");
        }
        Command::ResetStudy => {
            let session_id = state.tracker.reset_study();
            println!("{session_id}");
        }
    }
    Ok(())
}
