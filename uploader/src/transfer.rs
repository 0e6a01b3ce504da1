//! Network transfer of a single file.
//!
//! The queue talks to the network through the [`Transport`] trait so tests and
//! embedders can swap the HTTP client out. [`HttpTransport`] is the default:
//! a multipart `POST` of the file to the configured endpoint.
//!
//! Transport futures are boxed and `Send` so they can be spawned on the
//! runtime the queue was created on.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::config::UploaderSettings;
use crate::error::TransferError;
use crate::file::RawFile;
use crate::record::FileRecord;

/// Future returned by [`Transport::send`].
pub type TransferFuture = Pin<Box<dyn Future<Output = Result<Value, TransferError>> + Send>>;

/// Everything a transport needs to send one file.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub endpoint: String,
    pub field_name: String,
    pub headers: HashMap<String, String>,
    pub file: RawFile,
}

/// Sends one file and resolves with the server payload.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransferRequest) -> TransferFuture;
}

impl<F> Transport for F
where
    F: Fn(TransferRequest) -> TransferFuture + Send + Sync,
{
    fn send(&self, request: TransferRequest) -> TransferFuture {
        self(request)
    }
}

/// A response reduced to Send-safe owned data.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    fn lossy_text(&self) -> String {
        self.text()
            .unwrap_or_else(|_| String::from_utf8_lossy(&self.body).into_owned())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Maps the response to an upload payload or a failure.
    ///
    /// - non-2xx: [`TransferError::Status`]
    /// - JSON object with a non-zero numeric `errno`: [`TransferError::Rejected`]
    /// - empty body: `null`
    /// - body declared as something other than JSON: the body as a JSON string
    /// - JSON body: the parsed value
    /// - anything else: the body as a JSON string
    pub fn into_payload(self) -> Result<Value, TransferError> {
        if !self.is_success() {
            return Err(TransferError::Status {
                status: self.status,
                body: self.lossy_text(),
            });
        }

        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        let declared_json = self
            .header("content-type")
            .is_none_or(|ct| ct.to_ascii_lowercase().contains("json"));
        if !declared_json {
            return Ok(Value::String(self.lossy_text()));
        }

        let payload = match self.json::<Value>() {
            Ok(value) => value,
            Err(_) => return Ok(Value::String(self.lossy_text())),
        };

        match payload.get("errno").and_then(Value::as_i64) {
            Some(errno) if errno != 0 => Err(TransferError::Rejected {
                errno,
                message: payload
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
            }),
            _ => Ok(payload),
        }
    }
}

/// Multipart HTTP upload through `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (proxy, timeouts, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post(
        client: reqwest::Client,
        request: TransferRequest,
    ) -> Result<Response, TransferError> {
        let TransferRequest {
            endpoint,
            field_name,
            headers,
            file,
        } = request;

        let part = reqwest::multipart::Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_owned())
            .mime_str(file.mime_type())
            .map_err(|e| TransferError::request(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(field_name, part);

        let mut builder = client.post(&endpoint).multipart(form);
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransferError::request(e.to_string()))?;

        let status = response.status().as_u16();
        let mut response_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                response_headers.insert(name.as_str().to_lowercase(), v.to_owned());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransferError::request(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers: response_headers,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: TransferRequest) -> TransferFuture {
        let client = self.client.clone();
        Box::pin(async move { Self::post(client, request).await?.into_payload() })
    }
}

/// How a transfer ended, with every error already absorbed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Success(Value),
    Failure(String),
}

/// Binds a transport to the queue's destination settings.
#[derive(Clone)]
pub struct TransferExecutor {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for TransferExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferExecutor").finish_non_exhaustive()
    }
}

impl TransferExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn request_for(settings: &UploaderSettings, record: &FileRecord) -> TransferRequest {
        TransferRequest {
            endpoint: settings.action.clone(),
            field_name: settings.field_name.clone(),
            headers: settings.headers.clone(),
            file: record.raw().clone(),
        }
    }

    /// Starts sending `record`. The returned future owns everything it needs.
    pub fn send(
        &self,
        settings: &UploaderSettings,
        record: &FileRecord,
    ) -> Pin<Box<dyn Future<Output = TransferOutcome> + Send>> {
        let id = record.id();
        let name = record.name().to_owned();
        let transport = Arc::clone(&self.transport);
        let request = Self::request_for(settings, record);

        Box::pin(async move {
            match transport.send(request).await {
                Ok(payload) => {
                    log::info!(
                        target: "pagecraft_uploader::transfer",
                        "uploaded id={id} name={name}"
                    );
                    TransferOutcome::Success(payload)
                }
                Err(e) => {
                    log::warn!(
                        target: "pagecraft_uploader::transfer",
                        "upload_failed id={id} name={name} error={e}"
                    );
                    TransferOutcome::Failure(e.to_string())
                }
            }
        })
    }
}
