//! The upload queue.
//!
//! [`UploadQueue`] owns the ordered list of [`FileRecord`]s and drives each one
//! through gating and transfer. Asynchronous work (deferred hooks, transfers)
//! runs on the tokio runtime the queue was created on and reports back over a
//! channel; the records themselves are only touched by the queue owner, when
//! it calls [`UploadQueue::sync`] (once per UI frame) or awaits
//! [`UploadQueue::settle`].
//!
//! # Lifecycle
//!
//! ```text
//! intake ──gate──► Ready ──(auto / trigger_all)──► Loading ──► Success | Error
//!          │
//!          └─ reject: dropped, nothing recorded
//! ```
//!
//! A hook or transport that panics is contained in its own task: the file is
//! dropped (hook) or the record fails (transfer).
//!
//! `remove` detaches a record in any state. An in-flight transfer for a removed
//! record keeps running; its result is discarded when it arrives.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinError;

use crate::config::{ListType, UploaderConfig};
use crate::error::UploadError;
use crate::file::RawFile;
use crate::gate::{self, Evaluation, GateResult};
use crate::ingest::IngestAdapter;
use crate::record::{FileRecord, RecordId, UploadStatus};
use crate::transfer::{HttpTransport, TransferExecutor, TransferOutcome, Transport};

/// Counts for one intake call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntakeSummary {
    /// Files that became records right away.
    pub accepted: usize,
    /// Files the hook turned down synchronously.
    pub rejected: usize,
    /// Files waiting on an asynchronous hook.
    pub deferred: usize,
}

/// Intake-time options, captured once per call.
#[derive(Debug, Clone, Copy)]
struct IntakeMode {
    auto_upload: bool,
    list_type: ListType,
}

/// Results reported by spawned work.
#[derive(Debug)]
enum QueueEvent {
    Gated { result: GateResult, mode: IntakeMode },
    Transferred { id: RecordId, outcome: TransferOutcome },
}

pub struct UploadQueue {
    config: UploaderConfig,
    executor: TransferExecutor,
    records: Vec<FileRecord>,
    last_uploaded: Option<Value>,
    events_tx: flume::Sender<QueueEvent>,
    events_rx: flume::Receiver<QueueEvent>,
    runtime: Handle,
    pending: usize,
}

impl std::fmt::Debug for UploadQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadQueue")
            .field("config", &self.config)
            .field("records", &self.records.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl UploadQueue {
    /// Creates a queue on the current tokio runtime.
    pub fn new(
        config: UploaderConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, UploadError> {
        let runtime = Handle::try_current().map_err(|_| UploadError::NoRuntime)?;
        Ok(Self::with_runtime(config, transport, runtime))
    }

    /// Creates a queue posting files over HTTP.
    pub fn with_http(config: UploaderConfig) -> Result<Self, UploadError> {
        Self::new(config, Arc::new(HttpTransport::new()))
    }

    /// Creates a queue that spawns its work on `runtime`.
    pub fn with_runtime(
        config: UploaderConfig,
        transport: Arc<dyn Transport>,
        runtime: Handle,
    ) -> Self {
        let (events_tx, events_rx) = flume::unbounded();
        Self {
            config,
            executor: TransferExecutor::new(transport),
            records: Vec::new(),
            last_uploaded: None,
            events_tx,
            events_rx,
            runtime,
            pending: 0,
        }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Changes take effect from the next intake on.
    pub fn config_mut(&mut self) -> &mut UploaderConfig {
        &mut self.config
    }

    /// Records in display order (oldest first).
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of hooks and transfers whose results have not been applied yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// True while any record is transferring.
    pub fn is_uploading(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.status() == UploadStatus::Loading)
    }

    /// Payload of the most recent successful upload.
    pub fn last_uploaded(&self) -> Option<&Value> {
        self.last_uploaded.as_ref()
    }

    /// Gates each file and appends the accepted ones.
    ///
    /// With auto-upload on, accepted records start transferring immediately;
    /// otherwise they stay `Ready` until [`Self::trigger_all`].
    pub fn intake(&mut self, files: impl IntoIterator<Item = RawFile>) -> IntakeSummary {
        let mode = IntakeMode {
            auto_upload: self.config.settings.auto_upload,
            list_type: self.config.settings.list_type,
        };
        let mut summary = IntakeSummary::default();

        for file in files {
            match gate::evaluate(self.config.before_upload.as_ref(), file) {
                Evaluation::Settled(GateResult::Accept(file)) => {
                    self.admit(file, mode);
                    summary.accepted += 1;
                }
                Evaluation::Settled(GateResult::Reject) => summary.rejected += 1,
                Evaluation::Pending(decision) => {
                    let events = self.events_tx.clone();
                    self.pending += 1;
                    self.runtime.spawn(async move {
                        let result = tokio::spawn(decision).await.unwrap_or_else(|e| {
                            log::warn!(
                                target: "pagecraft_uploader::queue",
                                "gate_aborted reason={}",
                                join_failure(e)
                            );
                            GateResult::Reject
                        });
                        if events.send(QueueEvent::Gated { result, mode }).is_err() {
                            log::debug!(
                                target: "pagecraft_uploader::queue",
                                "queue_dropped_before_gate_settled"
                            );
                        }
                    });
                    summary.deferred += 1;
                }
            }
        }

        summary
    }

    /// Feeds one adapter event through intake.
    pub fn ingest<A: IngestAdapter>(&mut self, adapter: &mut A, event: A::Event) -> IntakeSummary {
        let files = adapter.accept(event);
        if files.is_empty() {
            return IntakeSummary::default();
        }
        self.intake(files)
    }

    /// Starts every `Ready` record. Returns how many were started.
    pub fn trigger_all(&mut self) -> usize {
        let ready: Vec<RecordId> = self
            .records
            .iter()
            .filter(|r| r.status() == UploadStatus::Ready)
            .map(FileRecord::id)
            .collect();

        ready.into_iter().filter(|id| self.start(*id)).count()
    }

    /// Detaches a record regardless of its status. Unknown ids are ignored.
    pub fn remove(&mut self, id: RecordId) -> Option<FileRecord> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        let record = self.records.remove(index);
        log::debug!(
            target: "pagecraft_uploader::queue",
            "removed id={id} name={} status={}",
            record.name(),
            record.status()
        );
        Some(record)
    }

    /// Applies every result that has already arrived, without waiting.
    ///
    /// Returns the number of results applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits until no hook or transfer is outstanding.
    ///
    /// A transfer that never settles keeps this waiting; see [`Self::settle_for`].
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.events_rx.recv_async().await {
                Ok(event) => self.apply(event),
                Err(_) => break,
            }
        }
    }

    /// [`Self::settle`] with an upper bound. Returns `false` on timeout, with
    /// whatever arrived in the meantime applied.
    pub async fn settle_for(&mut self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.settle()).await.is_ok()
    }

    fn admit(&mut self, file: RawFile, mode: IntakeMode) {
        let record = FileRecord::create(file, mode.list_type);
        let id = record.id();
        log::info!(
            target: "pagecraft_uploader::queue",
            "admitted id={id} name={} size={}",
            record.name(),
            record.size()
        );
        self.records.push(record);

        if mode.auto_upload {
            self.start(id);
        }
    }

    fn start(&mut self, id: RecordId) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id() == id) else {
            return false;
        };
        if !record.begin() {
            return false;
        }

        let transfer = self.executor.send(&self.config.settings, record);
        let events = self.events_tx.clone();
        self.pending += 1;
        self.runtime.spawn(async move {
            let outcome = tokio::spawn(transfer).await.unwrap_or_else(|e| {
                let reason = join_failure(e);
                log::warn!(
                    target: "pagecraft_uploader::queue",
                    "transfer_aborted id={id} reason={reason}"
                );
                TransferOutcome::Failure(format!("Upload aborted: {reason}"))
            });
            if events
                .send(QueueEvent::Transferred { id, outcome })
                .is_err()
            {
                log::debug!(
                    target: "pagecraft_uploader::queue",
                    "queue_dropped_before_transfer_settled id={id}"
                );
            }
        });
        true
    }

    fn apply(&mut self, event: QueueEvent) {
        self.pending = self.pending.saturating_sub(1);

        match event {
            QueueEvent::Gated {
                result: GateResult::Accept(file),
                mode,
            } => self.admit(file, mode),
            QueueEvent::Gated {
                result: GateResult::Reject,
                ..
            } => {}
            QueueEvent::Transferred { id, outcome } => {
                let Some(record) = self.records.iter_mut().find(|r| r.id() == id) else {
                    log::debug!(
                        target: "pagecraft_uploader::queue",
                        "discarded_result id={id} reason=record_removed"
                    );
                    return;
                };

                match outcome {
                    TransferOutcome::Success(payload) => {
                        if record.succeed(payload.clone()) {
                            self.last_uploaded = Some(payload);
                        }
                    }
                    TransferOutcome::Failure(detail) => {
                        record.fail(detail);
                    }
                }
            }
        }
    }
}

/// Panic message (or cancellation) of a task that never produced a result.
fn join_failure(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;
    use crate::gate::BeforeUpload;
    use crate::transfer::{TransferFuture, TransferRequest};
    use serde_json::json;

    fn png() -> RawFile {
        RawFile::new("test.png", "image/png", b"xyz".to_vec())
    }

    fn ok_transport() -> Arc<dyn Transport> {
        Arc::new(|_request: TransferRequest| -> TransferFuture {
            Box::pin(async { Ok(json!({ "url": "dummy.url" })) })
        })
    }

    fn failing_transport() -> Arc<dyn Transport> {
        Arc::new(|_request: TransferRequest| -> TransferFuture {
            Box::pin(async { Err(TransferError::request("boom")) })
        })
    }

    #[test]
    fn test_new_without_runtime() {
        let result = UploadQueue::new(UploaderConfig::new("test.url"), ok_transport());
        assert!(matches!(result, Err(UploadError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_auto_upload_starts_immediately() {
        let mut queue = UploadQueue::new(UploaderConfig::new("test.url"), ok_transport())
            .expect("runtime is available");

        let summary = queue.intake([png()]);
        assert_eq!(summary.accepted, 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.records()[0].status(), UploadStatus::Loading);
        assert!(queue.is_uploading());

        queue.settle().await;
        assert_eq!(queue.records()[0].status(), UploadStatus::Success);
        assert!(!queue.is_uploading());
        assert_eq!(queue.last_uploaded(), Some(&json!({ "url": "dummy.url" })));
    }

    #[tokio::test]
    async fn test_sync_rejection_records_nothing() {
        let config = UploaderConfig::new("test.url")
            .before_upload(BeforeUpload::check(|file| file.size() <= 2));
        let mut queue = UploadQueue::new(config, ok_transport()).expect("runtime is available");

        let summary = queue.intake([png()]);
        assert_eq!(summary.rejected, 1);
        assert!(queue.is_empty());
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn test_manual_mode_waits_for_trigger() {
        let config = UploaderConfig::new("test.url").auto_upload(false);
        let mut queue = UploadQueue::new(config, ok_transport()).expect("runtime is available");

        queue.intake([png(), png()]);
        assert_eq!(queue.pending(), 0);
        assert!(
            queue
                .records()
                .iter()
                .all(|r| r.status() == UploadStatus::Ready)
        );

        assert_eq!(queue.trigger_all(), 2);
        assert!(
            queue
                .records()
                .iter()
                .all(|r| r.status() == UploadStatus::Loading)
        );
        // Nothing left to start.
        assert_eq!(queue.trigger_all(), 0);

        queue.settle().await;
        assert!(
            queue
                .records()
                .iter()
                .all(|r| r.status() == UploadStatus::Success)
        );
    }

    #[tokio::test]
    async fn test_failure_is_contained() {
        let mut queue = UploadQueue::new(UploaderConfig::new("test.url"), failing_transport())
            .expect("runtime is available");

        queue.intake([png()]);
        queue.settle().await;

        let record = &queue.records()[0];
        assert_eq!(record.status(), UploadStatus::Error);
        assert_eq!(record.error(), Some("Upload request failed: boom"));
        assert!(queue.last_uploaded().is_none());
    }

    #[tokio::test]
    async fn test_remove_unknown_is_noop() {
        let config = UploaderConfig::new("test.url").auto_upload(false);
        let mut queue = UploadQueue::new(config, ok_transport()).expect("runtime is available");
        queue.intake([png()]);

        let other = FileRecord::create(png(), ListType::Text).id();
        assert!(queue.remove(other).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_late_result_for_removed_record_is_discarded() {
        let mut queue = UploadQueue::new(UploaderConfig::new("test.url"), ok_transport())
            .expect("runtime is available");
        queue.intake([png()]);
        let id = queue.records()[0].id();

        let removed = queue.remove(id).expect("record exists");
        assert_eq!(removed.status(), UploadStatus::Loading);

        queue.settle().await;
        assert!(queue.is_empty());
        assert_eq!(queue.pending(), 0);
        assert!(queue.last_uploaded().is_none());
    }

    #[tokio::test]
    async fn test_sync_applies_without_waiting() {
        let mut queue = UploadQueue::new(UploaderConfig::new("test.url"), ok_transport())
            .expect("runtime is available");
        assert_eq!(queue.sync(), 0);

        queue.intake([png()]);
        // Give the spawned transfer a chance to finish.
        while queue.pending() > 0 {
            tokio::task::yield_now().await;
            queue.sync();
        }
        assert_eq!(queue.records()[0].status(), UploadStatus::Success);
    }
}
