//! # Document
//!
//! The serialized form of a post: metadata plus an ordered block list.
//! This is what the persistence action receives.
//!
//! ## Lifecycle
//!
//! ```text
//! mount → edit → save/publish → (unmount discards)
//!   ↓       ↓         ↓
//! empty   canvas   Document
//! ```

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::errors::SerializationError;
use crate::metadata::{Category, TagSet};
use crate::metrics::{derive_metrics, Metrics};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub category: Category,
    pub tags: TagSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn metrics(&self) -> Metrics {
        derive_metrics(&self.blocks)
    }

    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockData;

    #[test]
    fn test_document_wire_shape() {
        let doc = Document {
            title: "Hello".to_string(),
            category: Category::Environment,
            tags: ["News"].into_iter().collect(),
            featured_image_url: Some("https://cdn/f.png".to_string()),
            blocks: vec![Block::with_id("p1", BlockData::paragraph("Hi"))],
        };

        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["category"], "Environment");
        assert_eq!(json["tags"], serde_json::json!(["News"]));
        assert_eq!(json["featuredImageUrl"], "https://cdn/f.png");
        assert_eq!(json["blocks"][0]["type"], "paragraph");

        assert_eq!(Document::from_json(&doc.to_json().unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::default();
        assert_eq!(doc.category, Category::Ai);
        assert!(doc.blocks.is_empty());
        assert_eq!(doc.metrics(), Metrics::default());

        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert!(json.get("featuredImageUrl").is_none());
    }
}
