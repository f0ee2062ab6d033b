// ABOUTME: Output formats for a ReportModel: terminal table, HTML document, and JSON.
// ABOUTME: Formatting only; no value in the model is changed on the way out.

//! Report output formats.
//!
//! - [`table`]: plain-text report for the terminal.
//! - [`html`]: self-contained HTML page with a preview card and tag table.
//! - [`to_json`]: the model as pretty-printed JSON.

pub mod html;
pub mod table;

use std::fmt;

use crate::result::ReportModel;

pub use self::html::render_html;
pub use self::table::render_table;

/// The output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Html,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Table => "table",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}

/// Serialize the model as pretty-printed JSON.
pub fn to_json(model: &ReportModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(model)
}

/// Render the model in the given format.
pub fn render(model: &ReportModel, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => render_table(model),
        OutputFormat::Html => render_html(model)?,
        OutputFormat::Json => to_json(model)?,
    })
}
