//! Raw file payloads handed to the upload queue.
//!
//! A [`RawFile`] is source-agnostic: it can come from a native file dialog,
//! a drag-and-drop event, the command line, or be produced by a before-upload
//! hook that substitutes the original file.

use std::path::Path;
use std::sync::Arc;

use crate::error::UploadError;

/// An in-memory file: display name, MIME type and content.
///
/// The content is shared, so cloning a `RawFile` never copies the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for RawFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Builds a file whose MIME type is guessed from the name's extension.
    pub fn guessed(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self::new(name, mime_type, bytes)
    }

    /// Reads a file from disk.
    ///
    /// The display name is the final path component and the MIME type is
    /// guessed from its extension (`application/octet-stream` when unknown).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| UploadError::InvalidFileName(path.to_path_buf()))?;

        let bytes = std::fs::read(path).map_err(|e| UploadError::io(path, e))?;

        log::debug!(
            target: "pagecraft_uploader::file",
            "read_file path={path:?} bytes={}",
            bytes.len()
        );

        Ok(Self::guessed(name, bytes))
    }

    /// Same content and MIME type under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: self.mime_type.clone(),
            bytes: Arc::clone(&self.bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the content, for consumers that keep it around (previews).
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercased extension of the display name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}
