//! scoutbook CLI - offline scouting data collection from the terminal
//!
//! Edits land in the local store immediately; `scoutbook sync` reconciles
//! them with the team server when a connection exists.

mod cli;
mod commands;
mod error;

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scoutbook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let image_db_path = resolve_image_db_path(cli.image_db_path, &db_path);

    match cli.command {
        Commands::Name { name } => commands::name::run_name(name.as_deref(), &db_path)?,
        Commands::Set {
            target,
            field,
            value,
        } => commands::entry::run_set(&target, &field, &value, &db_path)?,
        Commands::Clear { target, field } => {
            commands::entry::run_clear(&target, &field, &db_path)?;
        }
        Commands::Show { target } => commands::entry::run_show(&target, &db_path)?,
        Commands::Attach {
            target,
            field,
            file,
        } => commands::entry::run_attach(&target, &field, &file, &db_path, &image_db_path)?,
        Commands::Scouts { target } => commands::entry::run_scouts(&target, &db_path)?,
        Commands::Status { json } => commands::status::run_status(json, &db_path)?,
        Commands::Sync { server } => {
            commands::sync::run_sync(server, &db_path, &image_db_path).await?;
        }
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("SCOUTBOOK_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn resolve_image_db_path(cli_image_db_path: Option<PathBuf>, db_path: &Path) -> PathBuf {
    cli_image_db_path
        .or_else(|| env::var_os("SCOUTBOOK_IMAGE_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(|| {
            db_path
                .parent()
                .map_or_else(|| PathBuf::from("images.db"), |dir| dir.join("images.db"))
        })
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scoutbook")
        .join("scoutbook.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path_prefers_cli_flag() {
        let flag = PathBuf::from("/tmp/custom.db");
        assert_eq!(resolve_db_path(Some(flag.clone())), flag);
    }

    #[test]
    fn test_resolve_image_db_path_sits_next_to_db() {
        let db_path = PathBuf::from("/data/scoutbook/scoutbook.db");
        assert_eq!(
            resolve_image_db_path(None, &db_path),
            PathBuf::from("/data/scoutbook/images.db")
        );
    }

    #[test]
    fn test_default_db_path_is_defined() {
        assert!(default_db_path().ends_with("scoutbook/scoutbook.db"));
    }
}
