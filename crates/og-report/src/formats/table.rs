// ABOUTME: Terminal report: a header naming the source URL, a property/content table, and a summary.
// ABOUTME: Column widths are measured in characters so multi-byte content lines up.

use crate::result::ReportModel;

const PROPERTY_HEADER: &str = "property";
const CONTENT_HEADER: &str = "content";
/// Shown in place of a content attribute that was missing entirely.
pub const ABSENT_CONTENT: &str = "(none)";

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Render the terminal report.
pub fn render_table(model: &ReportModel) -> String {
    let rows: Vec<(&str, &str)> = model
        .tags
        .iter()
        .map(|t| {
            (
                t.property.as_str(),
                t.content.as_deref().unwrap_or(ABSENT_CONTENT),
            )
        })
        .collect();

    let prop_width = rows
        .iter()
        .map(|(p, _)| p.chars().count())
        .chain(std::iter::once(PROPERTY_HEADER.len()))
        .max()
        .unwrap_or(0);
    let content_width = rows
        .iter()
        .map(|(_, c)| c.chars().count())
        .chain(std::iter::once(CONTENT_HEADER.len()))
        .max()
        .unwrap_or(0);

    let mut out = Vec::with_capacity(rows.len() + 6);
    out.push(format!("Open Graph report for {}", model.source_url));
    out.push(String::new());
    out.push(format!(
        "{} | {}",
        pad(PROPERTY_HEADER, prop_width),
        CONTENT_HEADER
    ));
    out.push(format!(
        "{}-+-{}",
        "-".repeat(prop_width),
        "-".repeat(content_width)
    ));
    for (property, content) in rows {
        out.push(format!("{} | {}", pad(property, prop_width), content));
    }
    out.push(String::new());
    out.push(model.summary());

    out.join("\n")
}
