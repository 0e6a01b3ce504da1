//! The per-file unit tracked by the upload queue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::config::ListType;
use crate::file::RawFile;

/// Identifier assigned to a record at intake time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl RecordId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a record is in its lifecycle.
///
/// `Ready -> Loading -> {Success, Error}`. The last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    Ready,
    Loading,
    Success,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Renderable preview of a record's content, only built in picture mode.
///
/// `uri` is unique per record; renderers that cache decoded images by URI
/// (egui's loaders do) can use it as the cache key alongside `bytes`.
#[derive(Clone)]
pub struct Preview {
    pub uri: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("uri", &self.uri)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// One file moving through the upload pipeline.
#[derive(Debug, Clone)]
pub struct FileRecord {
    id: RecordId,
    raw: RawFile,
    status: UploadStatus,
    added_at: DateTime<Utc>,
    preview: Option<Preview>,
    response: Option<Value>,
    error: Option<String>,
}

impl FileRecord {
    /// Creates a `Ready` record with a fresh id.
    ///
    /// The preview is only derived when the list is displayed as pictures.
    pub fn create(raw: RawFile, list_type: ListType) -> Self {
        let id = RecordId::generate();
        let preview = match list_type {
            ListType::Picture => Some(Preview {
                uri: format!("bytes://upload-preview/{id}/{}", raw.name()),
                bytes: raw.shared_bytes(),
            }),
            ListType::Text => None,
        };

        Self {
            id,
            raw,
            status: UploadStatus::Ready,
            added_at: Utc::now(),
            preview,
            response: None,
            error: None,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn raw(&self) -> &RawFile {
        &self.raw
    }

    pub fn name(&self) -> &str {
        self.raw.name()
    }

    pub fn size(&self) -> usize {
        self.raw.size()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Server payload, present only once the record reached `Success`.
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// Failure detail, present only once the record reached `Error`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// URL the server reported for this upload, if any.
    ///
    /// Understands a bare `{ "url": .. }` payload as well as the
    /// `{ "errno": 0, "data": { "urls": [..] } }` envelope.
    pub fn uploaded_url(&self) -> Option<&str> {
        self.response.as_ref().and_then(payload_url)
    }

    pub(crate) fn begin(&mut self) -> bool {
        if self.status != UploadStatus::Ready {
            log::warn!(
                target: "pagecraft_uploader::record",
                "refused_transition id={} from={} to=loading",
                self.id,
                self.status
            );
            return false;
        }
        self.status = UploadStatus::Loading;
        true
    }

    pub(crate) fn succeed(&mut self, payload: Value) -> bool {
        if self.status != UploadStatus::Loading {
            log::warn!(
                target: "pagecraft_uploader::record",
                "refused_transition id={} from={} to=success",
                self.id,
                self.status
            );
            return false;
        }
        self.status = UploadStatus::Success;
        self.response = Some(payload);
        true
    }

    pub(crate) fn fail(&mut self, detail: impl Into<String>) -> bool {
        if self.status != UploadStatus::Loading {
            log::warn!(
                target: "pagecraft_uploader::record",
                "refused_transition id={} from={} to=error",
                self.id,
                self.status
            );
            return false;
        }
        self.status = UploadStatus::Error;
        self.error = Some(detail.into());
        true
    }
}

/// Extracts the display URL from an upload payload.
pub fn payload_url(payload: &Value) -> Option<&str> {
    if let Some(url) = payload.get("url").and_then(Value::as_str) {
        return Some(url);
    }
    let data = payload.get("data")?;
    data.get("urls")
        .and_then(Value::as_array)
        .and_then(|urls| urls.first())
        .and_then(Value::as_str)
        .or_else(|| data.get("url").and_then(Value::as_str))
}
