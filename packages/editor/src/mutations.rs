//! # Block Mutations
//!
//! The only ways the block list changes.
//!
//! ## Mutation Semantics
//!
//! ### InsertBlock
//! - Index is clamped to the list length (out-of-range appends)
//! - Fails if the id is already taken
//!
//! ### UpdateBlock
//! - Atomic payload replacement, same block type only
//! - Id is untouched
//!
//! ### MoveBlock
//! - Id and payload travel together
//! - Index is clamped
//!
//! ### ChangeType
//! - Converts the payload in place, id is kept
//!
//! ### DeleteBlock
//! - Deleting the last block leaves an empty list

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::{Block, BlockData, BlockId, BlockKind};

/// Block-level edits emitted by the canvas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a block at index
    InsertBlock { index: usize, block: Block },

    /// Replace the payload of an existing block
    UpdateBlock { block_id: BlockId, data: BlockData },

    /// Remove a block
    DeleteBlock { block_id: BlockId },

    /// Move a block to a new index
    MoveBlock { block_id: BlockId, index: usize },

    /// Convert a block to another type
    ChangeType { block_id: BlockId, kind: BlockKind },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Heading level {0} out of range 1..=4")]
    InvalidHeadingLevel(u8),

    #[error("Cannot change {from} block into {to}")]
    InvalidConversion { from: BlockKind, to: BlockKind },

    #[error("Payload type {found} does not match block type {expected}")]
    KindMismatch { expected: BlockKind, found: BlockKind },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl Mutation {
    /// Apply mutation to a block sequence with validation
    pub fn apply(&self, blocks: &mut Vec<Block>) -> Result<(), MutationError> {
        self.validate(blocks)?;

        match self {
            Mutation::InsertBlock { index, block } => {
                let at = (*index).min(blocks.len());
                blocks.insert(at, block.clone());
            }

            Mutation::UpdateBlock { block_id, data } => {
                let pos = position(blocks, block_id)?;
                blocks[pos].data = data.clone();
            }

            Mutation::DeleteBlock { block_id } => {
                let pos = position(blocks, block_id)?;
                blocks.remove(pos);
            }

            Mutation::MoveBlock { block_id, index } => {
                let pos = position(blocks, block_id)?;
                let block = blocks.remove(pos);
                let at = (*index).min(blocks.len());
                blocks.insert(at, block);
            }

            Mutation::ChangeType { block_id, kind } => {
                let pos = position(blocks, block_id)?;
                blocks[pos].data = blocks[pos].data.convert_to(*kind)?;
            }
        }

        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, blocks: &[Block]) -> Result<(), MutationError> {
        match self {
            Mutation::InsertBlock { block, .. } => {
                if blocks.iter().any(|b| b.id == block.id) {
                    return Err(MutationError::DuplicateId(block.id.clone()));
                }
                block.data.validate()
            }

            Mutation::UpdateBlock { block_id, data } => {
                let existing = find(blocks, block_id)?;
                if existing.kind() != data.kind() {
                    return Err(MutationError::KindMismatch {
                        expected: existing.kind(),
                        found: data.kind(),
                    });
                }
                data.validate()
            }

            Mutation::DeleteBlock { block_id } | Mutation::MoveBlock { block_id, .. } => {
                find(blocks, block_id).map(|_| ())
            }

            Mutation::ChangeType { block_id, kind } => {
                find(blocks, block_id)?.data.convert_to(*kind).map(|_| ())
            }
        }
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "insert_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::ChangeType { .. } => "change_type",
        }
    }
}

fn find<'a>(blocks: &'a [Block], id: &BlockId) -> Result<&'a Block, MutationError> {
    blocks
        .iter()
        .find(|b| &b.id == id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

fn position(blocks: &[Block], id: &BlockId) -> Result<usize, MutationError> {
    blocks
        .iter()
        .position(|b| &b.id == id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Block the mutation touched
    pub block_id: BlockId,
}
