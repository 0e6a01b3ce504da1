//! Command implementations for the Pagecraft CLI.

pub mod completions;
pub mod upload;

pub use completions::generate_completions;
pub use upload::{UploadReport, run_upload, run_upload_with};
