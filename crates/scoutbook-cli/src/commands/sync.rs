//! Sync command

use std::env;
use std::path::Path;

use scoutbook_core::store::BlobStore;
use scoutbook_core::sync::{HttpScoutApi, SyncEngine, SyncOutcome};

use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_sync(
    server: Option<String>,
    db_path: &Path,
    image_db_path: &Path,
) -> Result<(), CliError> {
    let server = resolve_server_url(server).ok_or(CliError::ServerNotConfigured)?;
    tracing::debug!(%server, "starting sync run");

    let db = open_database(db_path)?;
    let blobs = BlobStore::new(image_db_path);
    let api = HttpScoutApi::new(server)?;
    let engine = SyncEngine::new(&db, &blobs, api);

    match engine.sync().await {
        SyncOutcome::Completed(report) => {
            for kind in &report.kinds {
                println!(
                    "{:<8} {} uploaded, {} pulled, {} images promoted, {} images pending",
                    kind.kind.label(),
                    kind.uploaded,
                    kind.pulled,
                    kind.promoted_images,
                    kind.failed_images
                );
            }
            if report.fully_synced() {
                println!("Sync completed");
            } else {
                println!("Sync completed with errors; remaining work retries on the next run");
            }
            Ok(())
        }
        SyncOutcome::AlreadyRunning => {
            println!("Sync already in progress");
            Ok(())
        }
        SyncOutcome::Failed => Err(CliError::SyncFailed),
    }
}

fn resolve_server_url(flag: Option<String>) -> Option<String> {
    flag.or_else(|| env::var("SCOUTBOOK_SERVER_URL").ok())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_server_url_prefers_flag() {
        assert_eq!(
            resolve_server_url(Some("https://scouting.example.com".to_string())).as_deref(),
            Some("https://scouting.example.com")
        );
        assert!(resolve_server_url(Some("   ".to_string())).is_none());
    }
}
