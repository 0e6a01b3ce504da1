mod upload_list;
pub mod uploader;

pub use upload_list::upload_list;
pub use uploader::{UploaderState, uploader};
