// ABOUTME: Static renderer that fetches page markup over HTTP without running JavaScript.
// ABOUTME: Handles size limits, HTTP error statuses, and charset decoding of the response body.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;

use super::Renderer;

/// Maximum accepted body size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

const USER_AGENT: &str = concat!("og-report/", env!("CARGO_PKG_VERSION"));

/// Renderer that returns the server's markup as delivered.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    /// Build a renderer. Requests carry no timeout of their own; the caller's
    /// deadline bounds them.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

/// Decode body bytes using the content-type charset, or detect it.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract the charset parameter from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
    })
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("server responded with HTTP {}", status.as_u16());
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_CONTENT_LENGTH {
                bail!("content too large ({len} bytes)");
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: Bytes = response.bytes().await.context("failed to read body")?;
        if body.len() > MAX_CONTENT_LENGTH {
            bail!("content too large ({} bytes)", body.len());
        }

        Ok(decode_body(&body, content_type.as_deref()))
    }
}
