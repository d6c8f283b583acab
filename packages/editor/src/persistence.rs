//! Persistence seam: where a finished document goes on save or publish.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Document;

/// Why the document is being handed off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveIntent {
    Draft,
    Publish,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    #[error("Document rejected: {0}")]
    Rejected(String),
}

/// Receives serialized documents from the editing surface
#[async_trait]
pub trait PersistenceAction: Send + Sync {
    async fn persist(&self, document: &Document, intent: SaveIntent) -> Result<(), PersistError>;
}

/// Logs the serialized document and reports success
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPersistence;

#[async_trait]
impl PersistenceAction for LogPersistence {
    async fn persist(&self, document: &Document, intent: SaveIntent) -> Result<(), PersistError> {
        let json = document
            .to_json()
            .map_err(|e| PersistError::Rejected(e.to_string()))?;
        tracing::info!(?intent, blocks = document.blocks.len(), "Saved content: {}", json);
        Ok(())
    }
}
