// ABOUTME: Resolver that turns a TagSet into a ReportModel using per-field priority chains.
// ABOUTME: Marks every value not taken from the top-priority source as inferred.

//! Field resolution.
//!
//! Each display field walks its candidates in priority order and takes the first
//! non-empty one:
//!
//! | field       | 1 (authored)     | 2                   | 3                     |
//! |-------------|------------------|---------------------|-----------------------|
//! | title       | `og:title`       | `title`             |                       |
//! | description | `og:description` | `description`       | `descriptionFallback` |
//! | image       | `og:image`       |                     |                       |
//! | hostname    | host of `og:url` | host of request URL |                       |
//!
//! Lookups take the first tag with an exactly matching property.

use url::Url;

use crate::error::ReportError;
use crate::result::{ReportModel, ResolvedField};
use crate::tags::{TagSet, DESCRIPTION, DESCRIPTION_FALLBACK, TITLE};

pub const OG_TITLE: &str = "og:title";
pub const OG_DESCRIPTION: &str = "og:description";
pub const OG_IMAGE: &str = "og:image";
pub const OG_URL: &str = "og:url";

const TITLE_CHAIN: &[&str] = &[OG_TITLE, TITLE];
const DESCRIPTION_CHAIN: &[&str] = &[OG_DESCRIPTION, DESCRIPTION, DESCRIPTION_FALLBACK];

/// Non-empty content of the first tag with the given property.
fn non_empty<'a>(tags: &'a TagSet, property: &str) -> Option<&'a str> {
    tags.get(property).and_then(|t| t.non_empty_content())
}

/// Walks a chain of properties; only the first entry counts as authored.
///
/// When no candidate has content the field is empty and inferred.
fn resolve_chain(tags: &TagSet, chain: &[&str]) -> ResolvedField {
    for (rank, property) in chain.iter().enumerate() {
        if let Some(value) = non_empty(tags, property) {
            return if rank == 0 {
                ResolvedField::authored(value)
            } else {
                ResolvedField::inferred(value)
            };
        }
    }
    ResolvedField::inferred(String::new())
}

/// Host component of an absolute URL.
pub fn host_of(candidate: &str) -> anyhow::Result<String> {
    let parsed = Url::parse(candidate)?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("URL has no host component"))
}

fn resolve_hostname(tags: &TagSet, source_url: &str) -> Result<ResolvedField, ReportError> {
    if let Some(og_url) = non_empty(tags, OG_URL) {
        let host = host_of(og_url)
            .map_err(|e| ReportError::malformed_candidate_url(og_url, "Resolve og:url", Some(e)))?;
        return Ok(ResolvedField::authored(host));
    }

    let host = host_of(source_url)
        .map_err(|e| ReportError::invalid_url(source_url, "Resolve", Some(e)))?;
    Ok(ResolvedField::inferred(host))
}

/// Resolves the display fields of a report.
///
/// Pure: the same TagSet and URL always produce the same model. Fails only when
/// `og:url` is present but not an absolute URL, or `source_url` has no host.
pub fn resolve(tags: &TagSet, source_url: &str) -> Result<ReportModel, ReportError> {
    let title = resolve_chain(tags, TITLE_CHAIN);
    let description = resolve_chain(tags, DESCRIPTION_CHAIN);
    let image = non_empty(tags, OG_IMAGE).map(ResolvedField::authored);
    let hostname = resolve_hostname(tags, source_url)?;

    Ok(ReportModel {
        source_url: source_url.to_string(),
        tags: tags.clone(),
        title,
        description,
        image,
        hostname,
    })
}
