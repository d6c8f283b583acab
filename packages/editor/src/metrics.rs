//! Word and character counts derived from a block list.

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockData};

/// Live document counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub words: usize,
    pub chars: usize,
}

/// Whitespace as the browser sees it: Unicode white space plus the BOM
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

impl Metrics {
    /// `chars` is measured in UTF-16 code units, the length the user sees.
    fn add_text(&mut self, text: &str) {
        let trimmed = text.trim_matches(is_space);
        if trimmed.is_empty() {
            return;
        }
        self.words += trimmed.split(is_space).filter(|w| !w.is_empty()).count();
        self.chars += trimmed.encode_utf16().count();
    }
}

/// Count words and characters across all text-bearing blocks.
///
/// List items count as text, one pass per item. Images contribute nothing.
pub fn derive_metrics(blocks: &[Block]) -> Metrics {
    let mut metrics = Metrics::default();

    for block in blocks {
        match &block.data {
            BlockData::Heading { text, .. } | BlockData::Paragraph { text } => {
                metrics.add_text(text)
            }
            BlockData::ListItem { items, .. } => {
                for item in items {
                    metrics.add_text(item);
                }
            }
            BlockData::Image { .. } => {}
        }
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ListStyle;

    #[test]
    fn test_trimmed_paragraph() {
        let blocks = vec![Block::new(BlockData::paragraph("  hello   world  "))];
        assert_eq!(derive_metrics(&blocks), Metrics { words: 2, chars: 13 });
    }

    #[test]
    fn test_image_counts_nothing() {
        let blocks = vec![Block::new(BlockData::image(
            "https://cdn/x.png",
            Some("a long caption".to_string()),
        ))];
        assert_eq!(derive_metrics(&blocks), Metrics::default());
    }

    #[test]
    fn test_blank_text_counts_nothing() {
        let blocks = vec![
            Block::new(BlockData::paragraph("   ")),
            Block::new(BlockData::heading(1, "")),
        ];
        assert_eq!(derive_metrics(&blocks), Metrics::default());
    }

    #[test]
    fn test_list_items_count_per_item() {
        let blocks = vec![Block::new(BlockData::list(
            ListStyle::Unordered,
            [" milk ", "two eggs", "  "],
        ))];
        assert_eq!(derive_metrics(&blocks), Metrics { words: 3, chars: 12 });
    }

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = vec![
            Block::new(BlockData::heading(1, "Intro")),
            Block::new(BlockData::paragraph("Hello world")),
        ];
        assert_eq!(derive_metrics(&blocks), Metrics { words: 3, chars: 16 });
    }

    #[test]
    fn test_pure_and_idempotent() {
        let blocks = vec![
            Block::new(BlockData::paragraph("one two three")),
            Block::new(BlockData::list(ListStyle::Ordered, ["four"])),
        ];
        let snapshot = blocks.clone();

        let first = derive_metrics(&blocks);
        let second = derive_metrics(&blocks);

        assert_eq!(first, second);
        assert_eq!(blocks, snapshot);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let blocks = vec![Block::new(BlockData::paragraph("café"))];
        assert_eq!(derive_metrics(&blocks), Metrics { words: 1, chars: 4 });
    }

    #[test]
    fn test_astral_characters_count_as_two_units() {
        let blocks = vec![Block::new(BlockData::paragraph("naïve 😀"))];
        assert_eq!(derive_metrics(&blocks), Metrics { words: 2, chars: 8 });
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        let blocks = vec![
            Block::new(BlockData::paragraph("\u{feff}")),
            Block::new(BlockData::paragraph("\u{feff}one\u{feff}two ")),
        ];
        assert_eq!(derive_metrics(&blocks), Metrics { words: 2, chars: 7 });
    }
}
