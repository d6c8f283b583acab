//! # Upload Gateway
//!
//! Async boundary that turns a raw file into a durable URL.
//!
//! Every user action issues its own call. Nothing here queues, dedups,
//! coalesces or cancels uploads, and no timeout is applied; a hung
//! endpoint leaves the upload pending.
//!
//! An upload is split in two so the caller can decide when to yield:
//!
//! ```text
//! begin_*  →  PendingUpload  →  send().await  →  CompletedUpload  →  complete_upload
//! (sync)      (owns file)       (suspends)       (owns result)       (sync)
//! ```

use async_trait::async_trait;
use base64::Engine;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Where the uploaded image ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPurpose {
    /// Embedded image block
    Inline,
    /// Document-level featured image
    Featured,
}

impl fmt::Display for UploadPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPurpose::Inline => f.write_str("inline"),
            UploadPurpose::Featured => f.write_str("featured"),
        }
    }
}

/// Raw file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content_type: "application/octet-stream".to_string(),
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Why an upload did not produce a URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// Endpoint unreachable or the request could not complete
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint answered without a success flag
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// Normalized gateway answer. A URL exists exactly when the upload succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Uploaded { url: String },
    Failed(UploadFailure),
}

impl UploadResult {
    pub fn success(&self) -> bool {
        matches!(self, UploadResult::Uploaded { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadResult::Uploaded { url } => Some(url),
            UploadResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&UploadFailure> {
        match self {
            UploadResult::Uploaded { .. } => None,
            UploadResult::Failed(failure) => Some(failure),
        }
    }
}

/// Image upload backend
///
/// Implementations never return an error: transport and server failures are
/// folded into [`UploadResult::Failed`].
#[async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(&self, file: &RawFile, purpose: UploadPurpose) -> UploadResult;
}

/// Local stand-in shown before the upload resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPreview {
    pub file_name: String,
    pub content_type: String,
    bytes: Arc<[u8]>,
}

impl LocalPreview {
    pub fn from_file(file: &RawFile) -> Self {
        Self {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            bytes: Arc::clone(&file.bytes),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:` URL built from the file contents
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Upload issued but not yet sent
pub struct PendingUpload {
    pub(crate) ticket: UploadTicket,
    pub(crate) file: RawFile,
    pub(crate) gateway: Arc<dyn UploadGateway>,
}

/// Bookkeeping that travels with an upload from issue to completion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UploadTicket {
    pub seq: u64,
    pub generation: u64,
    pub purpose: UploadPurpose,
    pub target: UploadTarget,
}

/// Where a resolved URL is spliced in
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UploadTarget {
    FeaturedImage,
    ImageBlock {
        index: usize,
        caption: Option<String>,
    },
}

impl PendingUpload {
    pub fn purpose(&self) -> UploadPurpose {
        self.ticket.purpose
    }

    /// Issue order within the surface
    pub fn seq(&self) -> u64 {
        self.ticket.seq
    }

    pub fn file(&self) -> &RawFile {
        &self.file
    }

    /// Send the file to the gateway and wait for it to resolve
    pub async fn send(self) -> CompletedUpload {
        tracing::debug!(
            seq = self.ticket.seq,
            purpose = %self.ticket.purpose,
            file = %self.file.name,
            bytes = self.file.len(),
            "Sending upload"
        );
        let result = self.gateway.upload(&self.file, self.ticket.purpose).await;
        CompletedUpload {
            ticket: self.ticket,
            result,
        }
    }
}

impl fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingUpload")
            .field("ticket", &self.ticket)
            .field("file", &self.file.name)
            .finish()
    }
}

/// Upload that has resolved, waiting to be applied to the surface
#[derive(Debug, Clone)]
pub struct CompletedUpload {
    pub(crate) ticket: UploadTicket,
    pub(crate) result: UploadResult,
}

impl CompletedUpload {
    pub fn purpose(&self) -> UploadPurpose {
        self.ticket.purpose
    }

    pub fn seq(&self) -> u64 {
        self.ticket.seq
    }

    pub fn result(&self) -> &UploadResult {
        &self.result
    }
}
