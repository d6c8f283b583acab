//! # Blockpress Editor
//!
//! Block document editing core for Blockpress.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ canvas: block list + mutations              │
//! └─────────────────────────────────────────────┘
//!                     ↓ change
//! ┌─────────────────────────────────────────────┐
//! │ surface: lifecycle, metrics, uploads, save  │
//! │  - Mount/unmount a single canvas            │
//! │  - Recompute word/char counts on change     │
//! │  - Splice upload URLs into blocks/metadata  │
//! │  - Hand the Document to persistence         │
//! └─────────────────────────────────────────────┘
//!            ↓                        ↓
//! ┌──────────────────────┐  ┌───────────────────┐
//! │ UploadGateway (HTTP) │  │ PersistenceAction │
//! └──────────────────────┘  └───────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Blocks are the source of truth**: metrics are always recomputed from them
//! 2. **Flat list**: blocks never nest
//! 3. **Stable ids**: edits, moves and type changes keep the block id
//! 4. **Failures are state, not errors**: uploads and saves report outcomes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpress_editor::{BlockData, Container, EditingSurface, LogPersistence};
//!
//! let mut surface = EditingSurface::new(gateway, Arc::new(LogPersistence));
//! surface.mount(Container::new("editorjs"));
//!
//! surface.push_block(BlockData::heading(1, "Intro"))?;
//! surface.push_block(BlockData::paragraph("Hello world"))?;
//! assert_eq!(surface.metrics().words, 3);
//!
//! surface.save().await;
//! ```

mod block;
mod canvas;
mod config;
mod document;
mod errors;
mod metadata;
mod metrics;
mod mutations;
mod persistence;
mod surface;
mod upload;

pub use block::{Block, BlockData, BlockId, BlockKind, ListStyle};
pub use canvas::{BlockCanvas, BlockCanvasFactory, Canvas, CanvasFactory, Container};
pub use config::{Config, MetadataDefaults, UploadConfig, DEFAULT_CONFIG_NAME};
pub use document::Document;
pub use errors::{EditorError, SerializationError, SurfaceError};
pub use metadata::{Category, MetadataPanel, TagSet, TagSubmit};
pub use metrics::{derive_metrics, Metrics};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use persistence::{LogPersistence, PersistError, PersistenceAction, SaveIntent};
pub use surface::{
    EditingSurface, EditorState, LastSaved, Lifecycle, Notice, SaveFailure, SaveOutcome,
    UploadApplied,
};
pub use upload::{
    CompletedUpload, LocalPreview, PendingUpload, RawFile, UploadFailure, UploadGateway,
    UploadPurpose, UploadResult,
};
