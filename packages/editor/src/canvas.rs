//! # Canvas
//!
//! The interactive surface that holds and edits the block sequence.
//!
//! Anything that can be mounted into a container, serialized, destroyed,
//! and that reports a change for every applied mutation can stand in for
//! the canvas. [`BlockCanvas`] is the in-memory implementation.

use crate::block::{Block, BlockId};
use crate::errors::{EditorError, SerializationError, SurfaceError};
use crate::mutations::{Mutation, MutationResult};

/// Mount point owned by the editing surface while mounted
#[derive(Debug, PartialEq, Eq)]
pub struct Container {
    id: String,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Canvas capability
pub trait Canvas: Send {
    /// Apply a mutation; the returned result is the change event
    fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError>;

    /// Current blocks in render order
    fn serialize(&self) -> Result<Vec<Block>, SerializationError>;

    /// Release everything held by the canvas. Calling twice is a no-op.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// Builds a canvas bound to a container
pub trait CanvasFactory: Send + Sync {
    fn create(&self, container: &Container) -> Box<dyn Canvas>;
}

/// In-memory block canvas
#[derive(Debug)]
pub struct BlockCanvas {
    holder: String,
    blocks: Vec<Block>,
    version: u64,
    destroyed: bool,
}

impl BlockCanvas {
    pub fn new(container: &Container) -> Self {
        Self {
            holder: container.id().to_string(),
            blocks: Vec::new(),
            version: 0,
            destroyed: false,
        }
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Current version number (increments on each applied mutation)
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Canvas for BlockCanvas {
    fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        if self.destroyed {
            return Err(SurfaceError::NotReady.into());
        }

        mutation.apply(&mut self.blocks)?;
        self.version += 1;

        Ok(MutationResult {
            version: self.version,
            block_id: touched_block(mutation),
        })
    }

    fn serialize(&self) -> Result<Vec<Block>, SerializationError> {
        if self.destroyed {
            return Err(SerializationError::CanvasReleased);
        }
        Ok(self.blocks.clone())
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.blocks.clear();
        self.destroyed = true;
        tracing::debug!(holder = %self.holder, "Canvas destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

fn touched_block(mutation: &Mutation) -> BlockId {
    match mutation {
        Mutation::InsertBlock { block, .. } => block.id.clone(),
        Mutation::UpdateBlock { block_id, .. }
        | Mutation::DeleteBlock { block_id }
        | Mutation::MoveBlock { block_id, .. }
        | Mutation::ChangeType { block_id, .. } => block_id.clone(),
    }
}

/// Factory for [`BlockCanvas`]
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockCanvasFactory;

impl CanvasFactory for BlockCanvasFactory {
    fn create(&self, container: &Container) -> Box<dyn Canvas> {
        Box::new(BlockCanvas::new(container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockData;
    use crate::mutations::MutationError;

    #[test]
    fn test_apply_bumps_version() {
        let mut canvas = BlockCanvas::new(&Container::new("editorjs"));
        let block = Block::with_id("p1", BlockData::paragraph("Hi"));

        let result = canvas
            .apply(&Mutation::InsertBlock { index: 0, block })
            .unwrap();

        assert_eq!(result.version, 1);
        assert_eq!(result.block_id.as_str(), "p1");
        assert_eq!(canvas.version(), 1);
        assert_eq!(canvas.holder(), "editorjs");
    }

    #[test]
    fn test_rejected_mutation_keeps_version() {
        let mut canvas = BlockCanvas::new(&Container::new("editorjs"));
        let err = canvas
            .apply(&Mutation::DeleteBlock {
                block_id: "ghost".into(),
            })
            .unwrap_err();

        assert!(matches!(
            err,
            EditorError::Mutation(MutationError::BlockNotFound(_))
        ));
        assert_eq!(canvas.version(), 0);
    }

    #[test]
    fn test_destroyed_canvas_refuses_work() {
        let mut canvas = BlockCanvas::new(&Container::new("editorjs"));
        canvas.destroy();
        canvas.destroy();

        assert!(canvas.is_destroyed());
        assert_eq!(canvas.serialize(), Err(SerializationError::CanvasReleased));
        assert!(matches!(
            canvas.apply(&Mutation::DeleteBlock {
                block_id: "x".into()
            }),
            Err(EditorError::Surface(SurfaceError::NotReady))
        ));
    }
}
