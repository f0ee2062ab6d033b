// ABOUTME: Main library entry point for og-report, a social-sharing metadata reporter.
// ABOUTME: Re-exports the public API: Client, Options, collect, resolve, ReportModel, and ReportError.

//! og-report renders a page, collects its Open Graph, Twitter Card, Facebook and
//! generic title/description tags, and resolves what a link unfurler would show.
//!
//! # Example
//!
//! ```no_run
//! use og_report::{formats, Client, Options, ReportError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ReportError> {
//!     let opts = Options::builder().url("localhost:3000").build()?;
//!     let model = Client::new(opts).report().await?;
//!     println!("{}", formats::render_table(&model));
//!     Ok(())
//! }
//! ```
//!
//! The core is usable without a browser:
//!
//! ```
//! use og_report::{collect_html, resolve};
//!
//! let tags = collect_html(r#"<title>Example</title><meta name="description" content="A page.">"#);
//! let model = resolve(&tags, "http://example.com/").unwrap();
//! assert_eq!(model.title.value, "Example");
//! assert!(model.title.inferred);
//! ```

pub mod client;
pub mod collector;
pub mod error;
pub mod formats;
pub mod options;
pub mod render;
pub mod resolver;
pub mod result;
pub mod save;
pub mod server;
pub mod tags;

pub use crate::client::Client;
pub use crate::collector::{collect, collect_html};
pub use crate::error::{ErrorCode, ReportError};
pub use crate::options::{Options, OptionsBuilder, RendererKind};
pub use crate::render::Renderer;
pub use crate::resolver::resolve;
pub use crate::result::{ReportModel, ResolvedField};
pub use crate::tags::{RawTag, TagSet};
