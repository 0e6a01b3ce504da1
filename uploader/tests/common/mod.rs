//! Shared helpers for upload queue integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagecraft_uploader::{RawFile, TransferError, TransferFuture, TransferRequest, Transport};
use serde_json::Value;

/// What the scripted transport answers for one file name.
#[derive(Debug, Clone)]
pub struct Reply {
    pub delay: Duration,
    pub result: Result<Value, TransferError>,
}

impl Reply {
    pub fn ok(payload: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(payload),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(TransferError::request(message)),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Transport answering from a per-file-name script and recording every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    fallback: Option<Reply>,
    sent: Arc<Mutex<Vec<TransferRequest>>>,
}

impl ScriptedTransport {
    /// Every file gets the same reply.
    pub fn always(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    pub fn reply_for(self, name: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("replies lock poisoned")
            .insert(name.to_owned(), reply);
        self
    }

    /// Names of the files sent so far, in send order.
    pub fn sent_names(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .iter()
            .map(|r| r.file.name().to_owned())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("sent lock poisoned").len()
    }

    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: TransferRequest) -> TransferFuture {
        let reply = self
            .replies
            .lock()
            .expect("replies lock poisoned")
            .get(request.file.name())
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Reply::fail("no scripted reply"));
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push(request);

        Box::pin(async move {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            reply.result
        })
    }
}

/// The file most tests upload.
pub fn test_png() -> RawFile {
    RawFile::new("test.png", "image/png", b"xyz".to_vec())
}
