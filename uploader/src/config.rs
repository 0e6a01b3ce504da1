//! Uploader settings, read from `PAGECRAFT_UPLOAD_*` variables or built in code.

use std::collections::HashMap;
use std::env::vars;

use serde::Deserialize;

use crate::error::UploadError;
use crate::gate::BeforeUpload;

/// Prefix for environment variables read by [`UploaderSettings::from_env`].
pub const ENV_PREFIX: &str = "PAGECRAFT_UPLOAD_";

/// How the upload list is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    Text,
    Picture,
}

/// Plain, serializable uploader settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploaderSettings {
    /// Endpoint every file is posted to.
    pub action: String,
    /// Start transferring as soon as a file passes the before-upload hook.
    pub auto_upload: bool,
    pub list_type: ListType,
    /// Show a drop area instead of a plain button.
    pub drag: bool,
    /// Multipart field name carrying the file.
    pub field_name: String,
    /// Extra request headers.
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            action: String::new(),
            auto_upload: true,
            list_type: ListType::Text,
            drag: false,
            field_name: "file".to_owned(),
            headers: HashMap::new(),
        }
    }
}

impl UploaderSettings {
    /// Reads `PAGECRAFT_UPLOAD_*` environment variables, e.g.
    /// `PAGECRAFT_UPLOAD_ACTION` or `PAGECRAFT_UPLOAD_AUTO_UPLOAD=false`.
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_vars(vars())
    }

    /// Same as [`Self::from_env`] over an explicit variable list.
    ///
    /// Variables without the prefix are ignored.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, UploadError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_owned(), value.as_ref().to_owned()))
            })
            .collect();

        let settings: Self = serde_env::from_iter(scoped)?;
        log::info!(
            target: "pagecraft_uploader::config",
            "loaded_settings action={} auto_upload={} list_type={:?} drag={}",
            settings.action,
            settings.auto_upload,
            settings.list_type,
            settings.drag
        );
        Ok(settings)
    }
}

/// Settings plus the optional before-upload hook.
#[derive(Clone, Default)]
pub struct UploaderConfig {
    pub settings: UploaderSettings,
    pub before_upload: Option<BeforeUpload>,
}

impl std::fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("settings", &self.settings)
            .field("before_upload", &self.before_upload.is_some())
            .finish()
    }
}

impl From<UploaderSettings> for UploaderConfig {
    fn from(settings: UploaderSettings) -> Self {
        Self {
            settings,
            before_upload: None,
        }
    }
}

impl UploaderConfig {
    pub fn new(action: impl Into<String>) -> Self {
        Self::from(UploaderSettings {
            action: action.into(),
            ..UploaderSettings::default()
        })
    }

    pub fn auto_upload(mut self, auto_upload: bool) -> Self {
        self.settings.auto_upload = auto_upload;
        self
    }

    pub fn list_type(mut self, list_type: ListType) -> Self {
        self.settings.list_type = list_type;
        self
    }

    pub fn drag(mut self, drag: bool) -> Self {
        self.settings.drag = drag;
        self
    }

    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.settings.field_name = field_name.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.headers.insert(name.into(), value.into());
        self
    }

    pub fn before_upload(mut self, hook: BeforeUpload) -> Self {
        self.before_upload = Some(hook);
        self
    }

    pub fn clear_before_upload(mut self) -> Self {
        self.before_upload = None;
        self
    }
}
