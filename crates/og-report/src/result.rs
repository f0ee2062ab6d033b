// ABOUTME: ReportModel and ResolvedField types produced by the resolver for one report run.
// ABOUTME: Includes the summary-line helper shared by the terminal and HTML renderers.

use serde::{Deserialize, Serialize};

use crate::tags::TagSet;

/// Marker appended to any value that did not come from its preferred source.
pub const INFERRED_MARKER: &str = "(inferred)";

/// A display value together with whether it was inferred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub value: String,
    pub inferred: bool,
}

impl ResolvedField {
    /// A value taken from the field's most-preferred source.
    pub fn authored(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inferred: false,
        }
    }

    /// A value taken from a lower-priority source.
    pub fn inferred(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inferred: true,
        }
    }

    /// The value followed by the inferred marker when applicable.
    pub fn display(&self) -> String {
        if self.inferred {
            format!("{} {}", self.value, INFERRED_MARKER)
        } else {
            self.value.clone()
        }
    }
}

/// Everything a presentation layer needs to render one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportModel {
    pub source_url: String,
    pub tags: TagSet,
    pub title: ResolvedField,
    pub description: ResolvedField,
    pub image: Option<ResolvedField>,
    pub hostname: ResolvedField,
}

impl ReportModel {
    /// One-line summary of the resolved fields.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("title: {}", self.title.display()),
            format!("description: {}", self.description.display()),
        ];
        if let Some(ref image) = self.image {
            parts.push(format!("image: {}", image.display()));
        }
        parts.push(format!("hostname: {}", self.hostname.display()));
        parts.join(" | ")
    }

    /// Returns true if the report has a preview image.
    pub fn has_image(&self) -> bool {
        self.image.as_ref().map_or(false, |i| !i.value.is_empty())
    }
}
