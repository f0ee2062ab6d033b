// ABOUTME: Render collaborator abstraction that turns a URL into serialized page markup.
// ABOUTME: Implemented by headless Chromium and by a plain HTTP fetcher for static pages.

//! Page rendering.
//!
//! A [`Renderer`] navigates to a URL and hands back the markup the core parses.
//! [`chromium::ChromiumRenderer`] runs the page's JavaScript and waits for the
//! network to settle; [`http::HttpRenderer`] returns the server's markup as-is.

pub mod chromium;
pub mod http;

use anyhow::Result;
use async_trait::async_trait;

pub use self::chromium::ChromiumRenderer;
pub use self::http::HttpRenderer;

/// Produces the serialized DOM of a page.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigate to `url` and return the page markup once it has settled.
    ///
    /// Dropping the returned future cancels the navigation.
    async fn render(&self, url: &str) -> Result<String>;

    /// Release any resources held by the renderer.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
