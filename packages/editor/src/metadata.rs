//! # Metadata Panel
//!
//! Category and tags attached to a post, independent of block content.
//!
//! Tags are append-only for the lifetime of a draft. There is no removal
//! operation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Fixed category list
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    #[serde(rename = "AI")]
    #[strum(serialize = "AI")]
    Ai,
    #[serde(rename = "Computer Science")]
    #[strum(serialize = "Computer Science")]
    ComputerScience,
    Agents,
    Currency,
    Computer,
    Pollution,
    Environment,
}

impl Category {
    pub fn all() -> Vec<Category> {
        Category::iter().collect()
    }
}

/// Outcome of submitting the tag input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSubmit {
    Added,
    Empty,
    Duplicate,
}

/// Ordered, duplicate-free tag list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim and append. Matching is exact and case-sensitive.
    pub fn insert(&mut self, raw: &str) -> TagSubmit {
        let tag = raw.trim();
        if tag.is_empty() {
            return TagSubmit::Empty;
        }
        if self.contains(tag) {
            return TagSubmit::Duplicate;
        }
        self.0.push(tag.to_string());
        TagSubmit::Added
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

/// Category selector plus tag entry
#[derive(Debug, Clone, Default)]
pub struct MetadataPanel {
    category: Category,
    tags: TagSet,
    tag_input: String,
}

impl MetadataPanel {
    pub fn new(category: Category, tags: TagSet) -> Self {
        Self {
            category,
            tags,
            tag_input: String::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    pub fn set_tag_input(&mut self, value: impl Into<String>) {
        self.tag_input = value.into();
    }

    /// Submit the current tag input.
    ///
    /// Blank input is left in place; anything else clears the input,
    /// whether or not it was new.
    pub fn submit_tag(&mut self) -> TagSubmit {
        let outcome = self.tags.insert(&self.tag_input);
        if outcome != TagSubmit::Empty {
            self.tag_input.clear();
        }
        outcome
    }
}
