//! Upload queue engine.
//!
//! Files enter through an [`IngestAdapter`] (or [`UploadQueue::intake`]
//! directly), pass an optional [`BeforeUpload`] hook, and are sent by a
//! [`Transport`] while the queue tracks each one as a [`FileRecord`].

mod config;
mod error;
mod file;
mod gate;
mod ingest;
mod queue;
mod record;
mod transfer;

pub use config::{ENV_PREFIX, ListType, UploaderConfig, UploaderSettings};
pub use error::{GateError, TransferError, UploadError};
pub use file::RawFile;
pub use gate::{
    BeforeUpload, Evaluation, GateFuture, GateResult, GateReturn, GateValue, evaluate,
};
pub use ingest::{DragAdapter, DragEvent, IngestAdapter, PickerAdapter, PickerEvent};
pub use queue::{IntakeSummary, UploadQueue};
pub use record::{FileRecord, Preview, RecordId, UploadStatus, payload_url};
pub use transfer::{
    HttpTransport, Response, TransferExecutor, TransferFuture, TransferOutcome, TransferRequest,
    Transport,
};
