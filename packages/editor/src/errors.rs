//! Error types for the editor

use thiserror::Error;

use crate::mutations::MutationError;

/// The block list could not be turned into its wire form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Canvas has been released")]
    CanvasReleased,

    #[error("JSON encoding failed: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SerializationError {
    fn from(e: serde_json::Error) -> Self {
        SerializationError::Json(e.to_string())
    }
}

/// Lifecycle misuse of the editing surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Editing surface is not ready")]
    NotReady,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}
