use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum ShareOperation {
    Native(SharePayload),
    CopyToClipboard { text: String },
}

impl Operation for ShareOperation {
    type Output = ShareResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareOutput {
    Shared,
    Copied,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareError {
    #[error("native share is not supported on this platform")]
    NotSupported,

    #[error("share dismissed by user")]
    Dismissed,

    #[error("clipboard copy failed: {reason}")]
    ClipboardFailed { reason: String },
}

impl ShareError {
    /// Whether the core should retry through the clipboard.
    #[must_use]
    pub const fn wants_clipboard_fallback(&self) -> bool {
        matches!(self, Self::NotSupported)
    }
}

pub type ShareResult = Result<ShareOutput, ShareError>;

pub struct Share<E> {
    context: CapabilityContext<ShareOperation, E>,
}

impl<Ev> Capability<Ev> for Share<Ev> {
    type Operation = ShareOperation;
    type MappedSelf<MappedEv> = Share<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Share::new(self.context.map_event(f))
    }
}

impl<E> Share<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<ShareOperation, E>) -> Self {
        Self { context }
    }

    pub fn native<F>(&self, payload: SharePayload, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        self.request(ShareOperation::Native(payload), callback);
    }

    pub fn copy_to_clipboard<F>(&self, text: impl Into<String>, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        self.request(ShareOperation::CopyToClipboard { text: text.into() }, callback);
    }

    fn request<F>(&self, operation: ShareOperation, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}
