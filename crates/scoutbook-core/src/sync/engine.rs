//! Sync engine
//!
//! The offline-to-online reconciliation protocol. One sync run refreshes the
//! server-held configuration, pushes locally changed records (promoting any
//! local-only image attachments first), and pulls records the server holds
//! newer versions of via the known-entries diff.
//!
//! Incoming records overwrite the local copy wholesale: there is no
//! field-level merge of concurrent edits by two scouts on the same identity,
//! the last write observed by the server wins.

use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    now_ms, DriverEntryIdData, EntryData, EntryRecord, EntryValue, EventInfo, ImageUpload,
    MatchEntryIdData, PitEntryIdData, RecordKind,
};
use crate::store::{BlobStore, Database, EntryStore, SettingsStore, MATCH_LIST_KEY};

use super::api::ScoutApi;

/// Result of one [`SyncEngine::sync`] call.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The run executed; per-kind results are in the report.
    Completed(SyncReport),
    /// Another sync run was already in flight; nothing was done.
    AlreadyRunning,
    /// The run failed before reaching the per-kind phases.
    Failed,
}

/// Per-run accounting, one entry per record kind.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub kinds: Vec<KindReport>,
}

impl SyncReport {
    /// Whether every push succeeded and every attachment promoted.
    pub fn fully_synced(&self) -> bool {
        self.kinds
            .iter()
            .all(|kind| kind.push_ok && kind.failed_images == 0)
    }
}

/// Sync accounting for one record kind.
#[derive(Debug)]
pub struct KindReport {
    pub kind: RecordKind,
    /// Records included in a successful bulk upload
    pub uploaded: usize,
    /// Attachments promoted (uploaded and flipped to non-local)
    pub promoted_images: usize,
    /// Attachments that failed to promote and stay local
    pub failed_images: usize,
    /// Records pulled from the server and written locally
    pub pulled: usize,
    /// Whether the bulk upload succeeded (watermark advanced)
    pub push_ok: bool,
}

/// Orchestrates sync runs over the local stores and the server API.
pub struct SyncEngine<'a, A: ScoutApi> {
    db: &'a Database,
    blobs: &'a BlobStore,
    api: A,
    busy: AtomicBool,
}

/// Clears the busy flag on every exit path, including failures.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<'a, A: ScoutApi> SyncEngine<'a, A> {
    pub const fn new(db: &'a Database, blobs: &'a BlobStore, api: A) -> Self {
        Self {
            db,
            blobs,
            api,
            busy: AtomicBool::new(false),
        }
    }

    /// Execute one sync run.
    ///
    /// Re-entrant calls while a run is in flight are complete no-ops.
    /// Network failures never escape this method: they freeze the affected
    /// watermark and surface in the outcome.
    pub async fn sync(&self) -> SyncOutcome {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::debug!("sync already in progress; ignoring trigger");
            return SyncOutcome::AlreadyRunning;
        }
        let _guard = BusyGuard(&self.busy);

        match self.run().await {
            Ok(report) => {
                tracing::info!(fully_synced = report.fully_synced(), "sync run finished");
                SyncOutcome::Completed(report)
            }
            Err(error) => {
                tracing::warn!(%error, "sync run failed");
                SyncOutcome::Failed
            }
        }
    }

    async fn run(&self) -> Result<SyncReport> {
        self.refresh_config().await?;

        let settings = SettingsStore::new(self.db);
        let info = settings.event_info()?.ok_or(Error::SyncRequired)?;

        let mut report = SyncReport::default();
        report
            .kinds
            .push(self.sync_kind::<MatchEntryIdData>(&info).await?);
        report
            .kinds
            .push(self.sync_kind::<PitEntryIdData>(&info).await?);
        report
            .kinds
            .push(self.sync_kind::<DriverEntryIdData>(&info).await?);
        Ok(report)
    }

    /// Replace the cached configuration; the server is authoritative.
    async fn refresh_config(&self) -> Result<()> {
        let settings = SettingsStore::new(self.db);

        let matches = self.api.event_matches().await?;
        // the roster payload must at least carry the event context
        serde_json::from_str::<EventInfo>(&matches)?;
        settings.set_raw(MATCH_LIST_KEY, &matches)?;

        for kind in RecordKind::ALL {
            let fields = self.api.entry_fields(kind).await?;
            settings.set_raw(kind.fields_key(), &fields)?;
        }
        Ok(())
    }

    /// Outgoing diff, attachment promotion, and incoming diff for one kind.
    async fn sync_kind<R: EntryRecord>(&self, info: &EventInfo) -> Result<KindReport> {
        let kind = R::KIND;
        let entries = EntryStore::new(self.db);
        let settings = SettingsStore::new(self.db);

        let run_start = now_ms();
        let watermark = settings.watermark(kind)?;

        // snapshot: edits committed after this read land in the next run
        let mut all: Vec<R> = entries.list_all(info.year, &info.event)?;
        let markers: Vec<R::Marker> = all.iter().map(EntryRecord::marker).collect();

        // promotion scans every record, not just changed ones: an attachment
        // whose upload failed on an earlier run must still retry after that
        // run advanced the watermark
        let mut promoted_images = 0;
        let mut failed_images = 0;
        for record in &mut all {
            let (promoted, failed) = self.promote_images(record, &entries).await?;
            promoted_images += promoted;
            failed_images += failed;
        }

        let changed: Vec<R> = all
            .into_iter()
            .filter(|record| record.data().timestamp_ms > watermark)
            .collect();
        tracing::debug!(
            kind = kind.label(),
            changed = changed.len(),
            watermark,
            "outgoing diff"
        );

        let push_ok = match self.api.upload_entries(&changed).await {
            Ok(()) => {
                settings.set_watermark(kind, run_start)?;
                true
            }
            Err(error) => {
                tracing::warn!(
                    kind = kind.label(),
                    %error,
                    "record upload failed; watermark unchanged"
                );
                false
            }
        };

        let pulled = match self.api.filtered_entries::<R>(&markers).await {
            Ok(records) => {
                for record in &records {
                    entries.put(record)?;
                }
                records.len()
            }
            Err(error) => {
                tracing::warn!(kind = kind.label(), %error, "incoming diff failed");
                0
            }
        };

        Ok(KindReport {
            kind,
            uploaded: if push_ok { changed.len() } else { 0 },
            promoted_images,
            failed_images,
            pulled,
            push_ok,
        })
    }

    /// Upload every local-only attachment referenced by `record`.
    ///
    /// Each success flips the reference to non-local and re-persists the
    /// record, so the following bulk upload ships already-promoted
    /// references. Failures are isolated per attachment and retried on the
    /// next run.
    async fn promote_images<R: EntryRecord>(
        &self,
        record: &mut R,
        entries: &EntryStore<'_>,
    ) -> Result<(usize, usize)> {
        let pending: Vec<(String, Uuid, String)> = record
            .data()
            .entries
            .iter()
            .filter_map(|(field_id, value)| match value {
                EntryValue::Image(entry) => Some(
                    entry
                        .images
                        .iter()
                        .filter(|image| image.local)
                        .map(|image| (field_id.clone(), image.image_id, image.image_mime.clone()))
                        .collect::<Vec<_>>(),
                ),
                _ => None,
            })
            .flatten()
            .collect();

        let mut promoted = 0;
        let mut failed = 0;
        for (field_id, image_id, image_mime) in pending {
            let Some(image_data) = self.blobs.get(&image_id)? else {
                tracing::warn!(%image_id, "attachment payload missing from blob store");
                failed += 1;
                continue;
            };

            let upload = ImageUpload {
                image_id,
                image_mime,
                image_data,
            };
            match self.api.upload_image(&upload).await {
                Ok(()) => {
                    mark_uploaded(record.data_mut(), &field_id, image_id);
                    entries.put(record)?;
                    promoted += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        %image_id,
                        %error,
                        "attachment upload failed; will retry next sync"
                    );
                    failed += 1;
                }
            }
        }
        Ok((promoted, failed))
    }
}

fn mark_uploaded(data: &mut EntryData, field_id: &str, image_id: Uuid) {
    if let Some(EntryValue::Image(entry)) = data.entries.get_mut(field_id) {
        for image in &mut entry.images {
            if image.image_id == image_id {
                image.local = false;
            }
        }
    }
}
