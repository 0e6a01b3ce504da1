//! Before-upload gating.
//!
//! A caller may install a hook that runs once per file before it enters the
//! queue. The hook can answer right away (a boolean or any other value) or
//! hand back a future that settles later, possibly with a replacement file.
//! [`evaluate`] is the single place where those shapes are turned into a
//! [`GateResult`]; the queue never looks at hook return values itself.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::GateError;
use crate::file::RawFile;

/// Future returned by an asynchronous hook.
pub type GateFuture = Pin<Box<dyn Future<Output = Result<GateValue, GateError>> + Send>>;

/// What a hook produced.
#[derive(Debug, Clone)]
pub enum GateValue {
    Bool(bool),
    File(RawFile),
    /// Anything else (a string, a number, an object, ...).
    Other(Value),
}

/// Immediate or deferred hook return.
pub enum GateReturn {
    Ready(GateValue),
    Deferred(GateFuture),
}

impl From<bool> for GateReturn {
    fn from(value: bool) -> Self {
        Self::Ready(GateValue::Bool(value))
    }
}

/// Normalized gate decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// Continue with this file: the original, or the hook's replacement.
    Accept(RawFile),
    /// Drop the file silently.
    Reject,
}

/// Result of [`evaluate`]: either decided now or after the hook settles.
pub enum Evaluation {
    Settled(GateResult),
    Pending(Pin<Box<dyn Future<Output = GateResult> + Send>>),
}

type HookFn = dyn Fn(&RawFile) -> GateReturn + Send + Sync;

/// A shareable before-upload hook.
#[derive(Clone)]
pub struct BeforeUpload(Arc<HookFn>);

impl std::fmt::Debug for BeforeUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BeforeUpload").finish_non_exhaustive()
    }
}

impl BeforeUpload {
    /// Wraps a hook that may answer in any [`GateReturn`] shape.
    pub fn new(hook: impl Fn(&RawFile) -> GateReturn + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    /// Synchronous predicate: `false` drops the file.
    pub fn check(predicate: impl Fn(&RawFile) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |file| GateReturn::from(predicate(file)))
    }

    /// Asynchronous hook. Only resolving with [`GateValue::File`] lets the
    /// upload continue, and that file replaces the original.
    pub fn deferred<F, Fut>(hook: F) -> Self
    where
        F: Fn(RawFile) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GateValue, GateError>> + Send + 'static,
    {
        Self::new(move |file| GateReturn::Deferred(Box::pin(hook(file.clone()))))
    }

    fn call(&self, file: &RawFile) -> GateReturn {
        (self.0)(file)
    }
}

/// Runs the hook (if any) for one file and normalizes its answer.
///
/// The hook is invoked exactly once. Without a hook every file is accepted.
pub fn evaluate(hook: Option<&BeforeUpload>, file: RawFile) -> Evaluation {
    let Some(hook) = hook else {
        return Evaluation::Settled(GateResult::Accept(file));
    };

    match hook.call(&file) {
        GateReturn::Ready(GateValue::Bool(false)) => {
            log::debug!(
                target: "pagecraft_uploader::gate",
                "rejected name={}",
                file.name()
            );
            Evaluation::Settled(GateResult::Reject)
        }
        // A synchronous answer never substitutes the file.
        GateReturn::Ready(_) => Evaluation::Settled(GateResult::Accept(file)),
        GateReturn::Deferred(pending) => {
            let name = file.name().to_owned();
            Evaluation::Pending(Box::pin(async move { settle(&name, pending.await) }))
        }
    }
}

fn settle(name: &str, outcome: Result<GateValue, GateError>) -> GateResult {
    match outcome {
        Ok(GateValue::File(replacement)) => {
            if replacement.name() != name {
                log::debug!(
                    target: "pagecraft_uploader::gate",
                    "substituted name={name} replacement={}",
                    replacement.name()
                );
            }
            GateResult::Accept(replacement)
        }
        Ok(other) => {
            log::debug!(
                target: "pagecraft_uploader::gate",
                "rejected name={name} reason=non_file_resolution value={other:?}"
            );
            GateResult::Reject
        }
        Err(e) => {
            log::debug!(
                target: "pagecraft_uploader::gate",
                "rejected name={name} reason={e}"
            );
            GateResult::Reject
        }
    }
}
