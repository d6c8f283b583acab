//! # Blocks
//!
//! Typed units of document content. A document is a flat, ordered list of
//! blocks; no block holds another block.
//!
//! Wire form:
//!
//! ```text
//! { "id": "…", "type": "heading",   "data": { "level": 2, "text": "Intro" } }
//! { "id": "…", "type": "paragraph", "data": { "text": "Hello world" } }
//! { "id": "…", "type": "listItem",  "data": { "style": "ordered", "items": ["a", "b"] } }
//! { "id": "…", "type": "image",     "data": { "url": "https://…", "caption": "…" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

use crate::mutations::MutationError;

/// Opaque block identifier, stable across edits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BlockKind {
    Heading,
    Paragraph,
    ListItem,
    Image,
}

/// List rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

/// Type-specific block payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum BlockData {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    ListItem {
        style: ListStyle,
        items: Vec<String>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

impl BlockData {
    pub const MIN_HEADING_LEVEL: u8 = 1;
    pub const MAX_HEADING_LEVEL: u8 = 4;

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        BlockData::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockData::Paragraph { text: text.into() }
    }

    pub fn list<I, S>(style: ListStyle, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BlockData::ListItem {
            style,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn image(url: impl Into<String>, caption: Option<String>) -> Self {
        BlockData::Image {
            url: url.into(),
            caption,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockData::Heading { .. } => BlockKind::Heading,
            BlockData::Paragraph { .. } => BlockKind::Paragraph,
            BlockData::ListItem { .. } => BlockKind::ListItem,
            BlockData::Image { .. } => BlockKind::Image,
        }
    }

    /// The `text` field, for payloads that carry one
    pub fn text(&self) -> Option<&str> {
        match self {
            BlockData::Heading { text, .. } | BlockData::Paragraph { text } => Some(text),
            BlockData::ListItem { .. } | BlockData::Image { .. } => None,
        }
    }

    /// Check payload invariants
    pub fn validate(&self) -> Result<(), MutationError> {
        match self {
            BlockData::Heading { level, .. }
                if !(Self::MIN_HEADING_LEVEL..=Self::MAX_HEADING_LEVEL).contains(level) =>
            {
                Err(MutationError::InvalidHeadingLevel(*level))
            }
            BlockData::Image { url, .. } if url.trim().is_empty() => Err(
                MutationError::InvalidPayload("image url must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Convert this payload to another block type, carrying text across.
    ///
    /// Images cannot be produced from text; their url only ever comes from
    /// a resolved upload.
    pub fn convert_to(&self, kind: BlockKind) -> Result<BlockData, MutationError> {
        if self.kind() == kind {
            return Ok(self.clone());
        }

        let text = match self {
            BlockData::Heading { text, .. } | BlockData::Paragraph { text } => text.clone(),
            BlockData::ListItem { items, .. } => items.join(" "),
            BlockData::Image { caption, .. } => caption.clone().unwrap_or_default(),
        };

        match kind {
            BlockKind::Heading => Ok(BlockData::Heading {
                level: 2,
                text,
            }),
            BlockKind::Paragraph => Ok(BlockData::Paragraph { text }),
            BlockKind::ListItem => Ok(BlockData::ListItem {
                style: ListStyle::default(),
                items: if text.is_empty() { vec![] } else { vec![text] },
            }),
            BlockKind::Image => Err(MutationError::InvalidConversion {
                from: self.kind(),
                to: kind,
            }),
        }
    }
}

/// One block of document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(flatten)]
    pub data: BlockData,
}

impl Block {
    /// New block with a fresh id
    pub fn new(data: BlockData) -> Self {
        Self {
            id: BlockId::generate(),
            data,
        }
    }

    pub fn with_id(id: impl Into<BlockId>, data: BlockData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.data.kind()
    }
}
