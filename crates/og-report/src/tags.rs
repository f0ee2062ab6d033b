// ABOUTME: RawTag and TagSet types holding the meta-like tags discovered in a rendered page.
// ABOUTME: TagSet keeps discovery order and only admits sharing-metadata properties.

use serde::{Deserialize, Serialize};

/// Property of the synthetic entry carrying the document `<title>` text.
pub const TITLE: &str = "title";
/// Property of the generic `<meta name="description">` tag.
pub const DESCRIPTION: &str = "description";
/// Property of the synthetic entry carrying the longest text block on the page.
pub const DESCRIPTION_FALLBACK: &str = "descriptionFallback";

/// Substrings marking Open Graph, Twitter Card and Facebook properties.
const SHARING_PREFIXES: &[&str] = &["og:", "twitter:", "fb:"];

/// A single (property, content) pair.
///
/// `content` is `None` when the element had no `content` attribute, which is
/// not the same thing as an empty attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    pub property: String,
    pub content: Option<String>,
}

impl RawTag {
    pub fn new(property: impl Into<String>, content: Option<String>) -> Self {
        Self {
            property: property.into(),
            content,
        }
    }

    /// Returns the content when it is present and non-empty.
    pub fn non_empty_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Returns true if a property counts as sharing metadata.
pub fn is_sharing_property(property: &str) -> bool {
    property == TITLE
        || property == DESCRIPTION
        || property == DESCRIPTION_FALLBACK
        || SHARING_PREFIXES.iter().any(|p| property.contains(p))
}

/// Ordered, filtered sequence of sharing-metadata tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<RawTag>,
}

impl TagSet {
    /// Build a TagSet from raw tags, dropping everything that is not sharing metadata.
    pub fn from_raw(raw: impl IntoIterator<Item = RawTag>) -> Self {
        Self {
            tags: raw
                .into_iter()
                .filter(|t| is_sharing_property(&t.property))
                .collect(),
        }
    }

    /// First tag whose property matches exactly. Duplicates are never merged.
    pub fn get(&self, property: &str) -> Option<&RawTag> {
        self.tags.iter().find(|t| t.property == property)
    }

    /// Content of the first tag whose property matches exactly, if present.
    pub fn content(&self, property: &str) -> Option<&str> {
        self.get(property).and_then(|t| t.content.as_deref())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawTag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn as_slice(&self) -> &[RawTag] {
        &self.tags
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a RawTag;
    type IntoIter = std::slice::Iter<'a, RawTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
