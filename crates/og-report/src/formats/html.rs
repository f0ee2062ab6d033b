// ABOUTME: HTML report rendered through an askama template with automatic escaping.
// ABOUTME: Produces a preview card with inferred markers followed by the full tag table.

use askama::Template;

use crate::result::{ReportModel, ResolvedField};

struct Row<'a> {
    property: &'a str,
    content: &'a str,
    absent: bool,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage<'a> {
    source_url: &'a str,
    has_image: bool,
    image_url: &'a str,
    hostname: &'a ResolvedField,
    title: &'a ResolvedField,
    description: &'a ResolvedField,
    rows: Vec<Row<'a>>,
}

impl<'a> ReportPage<'a> {
    fn new(model: &'a ReportModel) -> Self {
        let rows = model
            .tags
            .iter()
            .map(|t| Row {
                property: &t.property,
                content: t.content.as_deref().unwrap_or_default(),
                absent: t.content.is_none(),
            })
            .collect();

        Self {
            source_url: &model.source_url,
            has_image: model.has_image(),
            image_url: model.image.as_ref().map_or("", |i| i.value.as_str()),
            hostname: &model.hostname,
            title: &model.title,
            description: &model.description,
            rows,
        }
    }
}

/// Render the self-contained HTML report. Every model value is HTML-escaped.
pub fn render_html(model: &ReportModel) -> askama::Result<String> {
    ReportPage::new(model).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect_html;
    use crate::resolver::resolve;

    fn report(html: &str) -> String {
        let model = resolve(&collect_html(html), "http://localhost:3000/").unwrap();
        render_html(&model).unwrap()
    }

    #[test]
    fn escapes_tag_content() {
        let out = report(
            r#"<html><head>
                <meta property="og:title" content="<script>alert(1)</script>">
                <meta property="og:description" content="&quot;quoted&quot; &amp; more">
            </head></html>"#,
        );
        assert!(!out.contains("<script>alert(1)</script>"));
        assert!(out.contains("&#60;script&#62;alert(1)&#60;/script&#62;"));
        assert!(!out.contains("\"quoted\""));
    }

    #[test]
    fn escapes_image_attribute() {
        let out = report(
            r#"<html><head>
                <meta property="og:image" content='x" onerror="alert(1)'>
            </head></html>"#,
        );
        assert!(out.contains("<img src=\"x"));
        assert!(!out.contains("onerror=\""));
    }

    #[test]
    fn marks_inferred_fields() {
        let out = report(
            r#"<html><head><title>Example</title>
               <meta property="og:description" content="Authored"></head></html>"#,
        );
        assert!(out.contains("<h2>Example <span class=\"inferred\">(inferred)</span></h2>"));
        assert!(out.contains("<p>Authored</p>"));
        assert!(out.contains("localhost <span class=\"inferred\">(inferred)</span>"));
    }

    #[test]
    fn omits_image_when_absent() {
        let out = report("<html><head><title>No image</title></head></html>");
        assert!(!out.contains("<img"));
    }

    #[test]
    fn shows_every_tag_and_absent_content() {
        let out = report(
            r#"<html><head>
                <meta name="twitter:card" content="summary">
                <meta property="og:image">
            </head></html>"#,
        );
        assert!(out.contains("<code>twitter:card</code></td><td>summary</td>"));
        assert!(out.contains("<code>og:image</code></td><td><span class=\"absent\">(none)</span>"));
        assert!(out.contains("<code>descriptionFallback</code>"));
    }
}
