//! # Editing Surface
//!
//! Owns the canvas for its mounted lifetime and everything derived from
//! it: live metrics, the last-saved label, the featured-image slot and
//! upload bookkeeping.
//!
//! ## Lifecycle
//!
//! ```text
//! Unmounted ──mount──▶ Mounting ──canvas built──▶ Ready ──unmount──▶ Unmounted
//!                                                   │
//!                                              mount: no-op
//! ```
//!
//! ## Uploads
//!
//! Inline images only enter the block list once their upload resolves with
//! a URL. The featured image shows a local preview immediately and records
//! the URL only on success; after a failure the preview stays while the
//! URL does not, and callers can observe both through [`EditorState`].
//!
//! Two featured uploads in flight at once are not ordered: whichever
//! completes last overwrites the slot, even if it was issued first.
//! Uploads issued under a previous mount are dropped when they complete.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::block::{Block, BlockData, BlockId, BlockKind};
use crate::canvas::{BlockCanvasFactory, Canvas, CanvasFactory, Container};
use crate::config::{Config, MetadataDefaults};
use crate::document::Document;
use crate::errors::{EditorError, SerializationError, SurfaceError};
use crate::metadata::MetadataPanel;
use crate::metrics::{derive_metrics, Metrics};
use crate::mutations::{Mutation, MutationResult};
use crate::persistence::{PersistError, PersistenceAction, SaveIntent};
use crate::upload::{
    CompletedUpload, LocalPreview, PendingUpload, RawFile, UploadFailure, UploadGateway,
    UploadPurpose, UploadResult, UploadTarget, UploadTicket,
};

/// Canvas lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounting,
    Ready,
}

/// When the draft was last persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LastSaved {
    #[default]
    Never,
    At(DateTime<Utc>),
}

impl LastSaved {
    pub fn label(&self) -> String {
        self.label_at(Utc::now())
    }

    pub fn label_at(&self, now: DateTime<Utc>) -> String {
        let LastSaved::At(saved) = self else {
            return "never".to_string();
        };

        let minutes = (now - *saved).num_minutes();
        match minutes {
            m if m < 1 => "just now".to_string(),
            1 => "1 minute ago".to_string(),
            m if m < 60 => format!("{} minutes ago", m),
            m if m < 120 => "1 hour ago".to_string(),
            m => format!("{} hours ago", m / 60),
        }
    }
}

/// Most recent user-visible failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UploadFailed {
        purpose: UploadPurpose,
        failure: UploadFailure,
    },
    SaveFailed(String),
}

/// Surface-local state, only changed through surface transitions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub metrics: Metrics,
    pub last_saved: LastSaved,
    pub featured_preview: Option<LocalPreview>,
    pub featured_image_url: Option<String>,
    pub pending_uploads: usize,
    pub notice: Option<Notice>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveFailure {
    #[error("Editing surface is not ready")]
    NotReady,

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Result of a save or publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(SaveFailure),
}

/// What a completed upload did to the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadApplied {
    FeaturedImageSet(String),
    ImageBlockInserted(BlockId),
    Failed(UploadFailure),
    /// Issued under a mount that no longer exists
    Stale,
}

/// Single editing surface over one canvas
pub struct EditingSurface {
    lifecycle: Lifecycle,
    container: Option<Container>,
    canvas: Option<Box<dyn Canvas>>,
    factory: Arc<dyn CanvasFactory>,
    gateway: Arc<dyn UploadGateway>,
    persistence: Arc<dyn PersistenceAction>,
    defaults: MetadataDefaults,
    title: String,
    metadata: MetadataPanel,
    state: EditorState,
    generation: u64,
    next_upload_seq: u64,
}

impl EditingSurface {
    pub fn new(gateway: Arc<dyn UploadGateway>, persistence: Arc<dyn PersistenceAction>) -> Self {
        Self {
            lifecycle: Lifecycle::Unmounted,
            container: None,
            canvas: None,
            factory: Arc::new(BlockCanvasFactory),
            gateway,
            persistence,
            defaults: MetadataDefaults::default(),
            title: String::new(),
            metadata: MetadataPanel::default(),
            state: EditorState::default(),
            generation: 0,
            next_upload_seq: 0,
        }
    }

    /// Use config defaults for new drafts
    pub fn with_config(mut self, config: &Config) -> Self {
        self.defaults = config.metadata.clone();
        self
    }

    pub fn with_canvas_factory(mut self, factory: Arc<dyn CanvasFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn metrics(&self) -> Metrics {
        self.state.metrics
    }

    /// Mount a canvas into `container` and start an empty draft.
    ///
    /// Returns `false` without touching anything when already mounted.
    pub fn mount(&mut self, container: Container) -> bool {
        if self.lifecycle != Lifecycle::Unmounted {
            tracing::debug!(container = %container.id(), "Canvas already mounted, ignoring mount");
            return false;
        }

        self.lifecycle = Lifecycle::Mounting;
        self.generation += 1;
        self.title.clear();
        self.metadata = MetadataPanel::new(self.defaults.default_category, self.defaults.tags());
        self.state = EditorState::default();

        self.canvas = Some(self.factory.create(&container));
        tracing::debug!(container = %container.id(), generation = self.generation, "Canvas mounted");
        self.container = Some(container);
        self.lifecycle = Lifecycle::Ready;
        self.on_change();
        true
    }

    /// Release the canvas and discard the draft. No-op when unmounted.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }

        if let Some(mut canvas) = self.canvas.take() {
            canvas.destroy();
        }
        if let Some(container) = self.container.take() {
            tracing::debug!(container = %container.id(), "Canvas released");
        }
        self.state = EditorState::default();
        self.lifecycle = Lifecycle::Unmounted;
    }

    fn canvas_mut(&mut self) -> Result<&mut Box<dyn Canvas>, SurfaceError> {
        match (self.lifecycle, self.canvas.as_mut()) {
            (Lifecycle::Ready, Some(canvas)) => Ok(canvas),
            _ => Err(SurfaceError::NotReady),
        }
    }

    /// Apply a canvas mutation and refresh metrics
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let result = self.canvas_mut()?.apply(&mutation)?;
        tracing::debug!(op = mutation.name(), version = result.version, "Applied mutation");
        self.on_change();
        Ok(result)
    }

    fn on_change(&mut self) {
        match self.blocks() {
            Ok(blocks) => self.state.metrics = derive_metrics(&blocks),
            Err(e) => tracing::warn!("Could not serialize blocks for metrics: {}", e),
        }
    }

    pub fn insert_block(&mut self, index: usize, data: BlockData) -> Result<BlockId, EditorError> {
        let block = Block::new(data);
        let id = block.id.clone();
        self.apply(Mutation::InsertBlock { index, block })?;
        Ok(id)
    }

    /// Append a block after the current last block
    pub fn push_block(&mut self, data: BlockData) -> Result<BlockId, EditorError> {
        self.insert_block(usize::MAX, data)
    }

    pub fn update_block(&mut self, block_id: &BlockId, data: BlockData) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateBlock {
            block_id: block_id.clone(),
            data,
        })
        .map(|_| ())
    }

    pub fn delete_block(&mut self, block_id: &BlockId) -> Result<(), EditorError> {
        self.apply(Mutation::DeleteBlock {
            block_id: block_id.clone(),
        })
        .map(|_| ())
    }

    pub fn move_block(&mut self, block_id: &BlockId, index: usize) -> Result<(), EditorError> {
        self.apply(Mutation::MoveBlock {
            block_id: block_id.clone(),
            index,
        })
        .map(|_| ())
    }

    pub fn change_type(&mut self, block_id: &BlockId, kind: BlockKind) -> Result<(), EditorError> {
        self.apply(Mutation::ChangeType {
            block_id: block_id.clone(),
            kind,
        })
        .map(|_| ())
    }

    /// Current blocks in order
    pub fn blocks(&self) -> Result<Vec<Block>, SerializationError> {
        match (self.lifecycle, self.canvas.as_ref()) {
            (Lifecycle::Ready, Some(canvas)) => canvas.serialize(),
            _ => Err(SerializationError::CanvasReleased),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn metadata(&self) -> &MetadataPanel {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataPanel {
        &mut self.metadata
    }

    /// Snapshot of the draft as it would be persisted
    pub fn document(&self) -> Result<Document, SaveFailure> {
        if !self.is_ready() {
            return Err(SaveFailure::NotReady);
        }

        Ok(Document {
            title: self.title.clone(),
            category: self.metadata.category(),
            tags: self.metadata.tags().clone(),
            featured_image_url: self.state.featured_image_url.clone(),
            blocks: self.blocks()?,
        })
    }

    /// Persist the draft. `last_saved` only moves on success.
    pub async fn save(&mut self) -> SaveOutcome {
        self.persist(SaveIntent::Draft).await
    }

    pub async fn publish(&mut self) -> SaveOutcome {
        self.persist(SaveIntent::Publish).await
    }

    async fn persist(&mut self, intent: SaveIntent) -> SaveOutcome {
        let document = match self.document() {
            Ok(document) => document,
            Err(failure) => return self.save_failed(intent, failure),
        };

        let persistence = Arc::clone(&self.persistence);
        match persistence.persist(&document, intent).await {
            Ok(()) => {
                tracing::info!(?intent, blocks = document.blocks.len(), "Draft persisted");
                self.state.last_saved = LastSaved::At(Utc::now());
                if matches!(self.state.notice, Some(Notice::SaveFailed(_))) {
                    self.state.notice = None;
                }
                SaveOutcome::Saved
            }
            Err(e) => self.save_failed(intent, e.into()),
        }
    }

    fn save_failed(&mut self, intent: SaveIntent, failure: SaveFailure) -> SaveOutcome {
        tracing::error!(?intent, "Error saving content: {}", failure);
        self.state.notice = Some(Notice::SaveFailed(failure.to_string()));
        SaveOutcome::Failed(failure)
    }

    fn issue_upload(&mut self, file: RawFile, target: UploadTarget) -> PendingUpload {
        let purpose = match target {
            UploadTarget::FeaturedImage => UploadPurpose::Featured,
            UploadTarget::ImageBlock { .. } => UploadPurpose::Inline,
        };
        self.next_upload_seq += 1;
        self.state.pending_uploads += 1;

        PendingUpload {
            ticket: UploadTicket {
                seq: self.next_upload_seq,
                generation: self.generation,
                purpose,
                target,
            },
            file,
            gateway: Arc::clone(&self.gateway),
        }
    }

    /// Show a local preview right away and issue the featured upload
    pub fn begin_featured_upload(&mut self, file: RawFile) -> Result<PendingUpload, SurfaceError> {
        if !self.is_ready() {
            return Err(SurfaceError::NotReady);
        }
        self.state.featured_preview = Some(LocalPreview::from_file(&file));
        Ok(self.issue_upload(file, UploadTarget::FeaturedImage))
    }

    /// Issue an inline image upload. Nothing is added to the block list yet.
    pub fn begin_inline_image(
        &mut self,
        file: RawFile,
        index: usize,
        caption: Option<String>,
    ) -> Result<PendingUpload, SurfaceError> {
        if !self.is_ready() {
            return Err(SurfaceError::NotReady);
        }
        Ok(self.issue_upload(file, UploadTarget::ImageBlock { index, caption }))
    }

    /// Apply a resolved upload to its slot
    pub fn complete_upload(&mut self, done: CompletedUpload) -> UploadApplied {
        let CompletedUpload { ticket, result } = done;

        if ticket.generation != self.generation || !self.is_ready() {
            tracing::warn!(seq = ticket.seq, purpose = %ticket.purpose, "Dropping upload from a previous mount");
            return UploadApplied::Stale;
        }
        self.state.pending_uploads = self.state.pending_uploads.saturating_sub(1);

        let url = match result {
            UploadResult::Uploaded { url } => url,
            UploadResult::Failed(failure) => {
                tracing::warn!(seq = ticket.seq, purpose = %ticket.purpose, "Error uploading image: {}", failure);
                self.state.notice = Some(Notice::UploadFailed {
                    purpose: ticket.purpose,
                    failure: failure.clone(),
                });
                return UploadApplied::Failed(failure);
            }
        };

        match ticket.target {
            UploadTarget::FeaturedImage => {
                tracing::info!(seq = ticket.seq, %url, "Featured image uploaded");
                self.state.featured_image_url = Some(url.clone());
                UploadApplied::FeaturedImageSet(url)
            }
            UploadTarget::ImageBlock { index, caption } => {
                match self.insert_block(index, BlockData::image(url, caption)) {
                    Ok(id) => {
                        tracing::info!(seq = ticket.seq, block = %id, "Image block inserted");
                        UploadApplied::ImageBlockInserted(id)
                    }
                    Err(e) => {
                        let failure = UploadFailure::Rejected(e.to_string());
                        tracing::warn!(seq = ticket.seq, "Could not insert image block: {}", e);
                        self.state.notice = Some(Notice::UploadFailed {
                            purpose: ticket.purpose,
                            failure: failure.clone(),
                        });
                        UploadApplied::Failed(failure)
                    }
                }
            }
        }
    }

    /// Upload a featured image and wait for it
    pub async fn upload_featured_image(&mut self, file: RawFile) -> Result<UploadApplied, SurfaceError> {
        let pending = self.begin_featured_upload(file)?;
        let done = pending.send().await;
        Ok(self.complete_upload(done))
    }

    /// Upload an inline image and insert it at `index` once it resolves
    pub async fn insert_image(
        &mut self,
        file: RawFile,
        index: usize,
        caption: Option<String>,
    ) -> Result<UploadApplied, SurfaceError> {
        let pending = self.begin_inline_image(file, index, caption)?;
        let done = pending.send().await;
        Ok(self.complete_upload(done))
    }
}

impl Drop for EditingSurface {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::LogPersistence;
    use async_trait::async_trait;
    use chrono::Duration;

    struct NoGateway;

    #[async_trait]
    impl UploadGateway for NoGateway {
        async fn upload(&self, _file: &RawFile, _purpose: UploadPurpose) -> UploadResult {
            UploadResult::Failed(UploadFailure::Transport("offline".to_string()))
        }
    }

    fn surface() -> EditingSurface {
        EditingSurface::new(Arc::new(NoGateway), Arc::new(LogPersistence))
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut surface = surface();
        assert_eq!(surface.lifecycle(), Lifecycle::Unmounted);

        assert!(surface.mount(Container::new("editorjs")));
        assert_eq!(surface.lifecycle(), Lifecycle::Ready);
        assert_eq!(surface.container().map(Container::id), Some("editorjs"));

        surface.unmount();
        assert_eq!(surface.lifecycle(), Lifecycle::Unmounted);
        assert!(surface.container().is_none());

        surface.unmount();
        assert_eq!(surface.lifecycle(), Lifecycle::Unmounted);
    }

    #[test]
    fn test_mutations_require_ready() {
        let mut surface = surface();
        let err = surface.push_block(BlockData::paragraph("x")).unwrap_err();
        assert!(matches!(err, EditorError::Surface(SurfaceError::NotReady)));
    }

    #[test]
    fn test_metrics_follow_edits() {
        let mut surface = surface();
        surface.mount(Container::new("editorjs"));

        let id = surface.push_block(BlockData::paragraph("one two")).unwrap();
        assert_eq!(surface.metrics(), Metrics { words: 2, chars: 7 });

        surface.update_block(&id, BlockData::paragraph("one")).unwrap();
        assert_eq!(surface.metrics(), Metrics { words: 1, chars: 3 });

        surface.delete_block(&id).unwrap();
        assert_eq!(surface.metrics(), Metrics::default());
        assert!(surface.blocks().unwrap().is_empty());
    }

    #[test]
    fn test_remount_starts_empty_draft() {
        let mut surface = surface();
        surface.mount(Container::new("editorjs"));
        surface.set_title("Old");
        surface.push_block(BlockData::paragraph("gone")).unwrap();
        surface.unmount();

        surface.mount(Container::new("editorjs"));
        assert_eq!(surface.title(), "");
        assert!(surface.blocks().unwrap().is_empty());
        assert_eq!(surface.metrics(), Metrics::default());
    }

    #[test]
    fn test_last_saved_labels() {
        let now = Utc::now();
        assert_eq!(LastSaved::Never.label_at(now), "never");
        assert_eq!(LastSaved::At(now).label_at(now), "just now");
        assert_eq!(
            LastSaved::At(now - Duration::minutes(2)).label_at(now),
            "2 minutes ago"
        );
        assert_eq!(
            LastSaved::At(now - Duration::minutes(1)).label_at(now),
            "1 minute ago"
        );
        assert_eq!(
            LastSaved::At(now - Duration::hours(3)).label_at(now),
            "3 hours ago"
        );
    }

    #[tokio::test]
    async fn test_save_requires_ready() {
        let mut surface = surface();
        assert_eq!(surface.save().await, SaveOutcome::Failed(SaveFailure::NotReady));
        assert_eq!(surface.state().last_saved, LastSaved::Never);
    }

    #[tokio::test]
    async fn test_upload_after_unmount_is_stale() {
        let mut surface = surface();
        surface.mount(Container::new("editorjs"));

        let pending = surface
            .begin_featured_upload(RawFile::new("a.png", b"a".to_vec()))
            .unwrap();
        surface.unmount();
        surface.mount(Container::new("editorjs"));

        let done = pending.send().await;
        assert_eq!(surface.complete_upload(done), UploadApplied::Stale);
        assert!(surface.state().notice.is_none());
    }
}
