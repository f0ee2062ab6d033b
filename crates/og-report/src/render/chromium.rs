// ABOUTME: Headless Chromium renderer built on chromiumoxide.
// ABOUTME: Navigates, waits for network activity to settle, then serializes the live DOM.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page;
use futures::stream::{self, BoxStream, Stream};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::Renderer;

/// Environment variable pointing at a Chromium binary.
pub const CHROMIUM_PATH_ENV: &str = "OG_REPORT_CHROMIUM_PATH";

/// How long the network must stay quiet before the page counts as settled.
const NETWORK_QUIET: Duration = Duration::from_millis(500);
/// Requests allowed to stay in flight on a settled page (long polls, beacons).
const MAX_IN_FLIGHT: usize = 2;

/// HTTP status of the main document, 0 when the browser does not expose it.
const DOCUMENT_STATUS_JS: &str =
    "(performance.getEntriesByType('navigation')[0] || {}).responseStatus || 0";

const SERIALIZE_JS: &str = "document.documentElement.outerHTML";

/// Find a Chromium binary: explicit env override first, then the PATH.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based renderer owning one headless browser process.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

impl std::fmt::Debug for ChromiumRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumRenderer").finish_non_exhaustive()
    }
}

impl ChromiumRenderer {
    /// Launch a headless Chromium instance.
    pub async fn launch() -> Result<Self> {
        let chrome_path = find_chromium().with_context(|| {
            format!(
                "Chromium not found; install it or set {} to its path",
                CHROMIUM_PATH_ENV
            )
        })?;
        tracing::debug!(path = %chrome_path.display(), "launching chromium");

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "chromium handler event error");
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
        })
    }
}

/// Closes the page when dropped, including when a render is cancelled mid-flight.
struct PageGuard(Page);

impl Drop for PageGuard {
    fn drop(&mut self) {
        let page = self.0.clone();
        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            rt.spawn(async move {
                let _ = page.close().await;
            });
        }
    }
}

async fn eval_u64(page: &Page, script: &str) -> Result<u64> {
    let value: serde_json::Value = page
        .evaluate(script)
        .await
        .with_context(|| format!("failed to evaluate `{script}`"))?
        .into_value()
        .map_err(|e| anyhow::anyhow!("failed to convert JS result: {e:?}"))?;
    Ok(value.as_u64().unwrap_or(0))
}

/// Request lifecycle change reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NetworkEvent {
    Started(String),
    Done(String),
}

/// Subscribes to the page's request start, finish and failure events.
///
/// Subscribe before navigating so requests made during the load are counted.
async fn network_events(page: &Page) -> Result<BoxStream<'static, NetworkEvent>> {
    let started = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .context("failed to watch network requests")?
        .map(|e| NetworkEvent::Started(e.request_id.inner().clone()));
    let finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .context("failed to watch network requests")?
        .map(|e| NetworkEvent::Done(e.request_id.inner().clone()));
    let failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .context("failed to watch network requests")?
        .map(|e| NetworkEvent::Done(e.request_id.inner().clone()));

    Ok(stream::select_all([started.boxed(), finished.boxed(), failed.boxed()]).boxed())
}

/// Waits until at most [`MAX_IN_FLIGHT`] requests are open and no request has
/// started or finished for [`NETWORK_QUIET`]. Returns early if the stream ends.
async fn wait_for_network_settled<S>(events: &mut S)
where
    S: Stream<Item = NetworkEvent> + Unpin,
{
    let mut in_flight: HashSet<String> = HashSet::new();
    loop {
        let next = if in_flight.len() <= MAX_IN_FLIGHT {
            match tokio::time::timeout(NETWORK_QUIET, events.next()).await {
                Ok(next) => next,
                Err(_) => return,
            }
        } else {
            events.next().await
        };

        match next {
            Some(NetworkEvent::Started(id)) => {
                in_flight.insert(id);
            }
            Some(NetworkEvent::Done(id)) => {
                in_flight.remove(&id);
            }
            None => return,
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .context("failed to open a browser tab")?
        };
        let guard = PageGuard(page);
        let mut events = network_events(&guard.0).await?;

        guard
            .0
            .goto(url)
            .await
            .with_context(|| format!("failed to load {url}"))?;
        wait_for_network_settled(&mut events).await;

        let status = eval_u64(&guard.0, DOCUMENT_STATUS_JS).await?;
        if status >= 400 {
            bail!("server responded with HTTP {status}");
        }

        let html: String = guard
            .0
            .evaluate(SERIALIZE_JS)
            .await
            .context("failed to serialize the document")?
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;

        Ok(html)
    }

    async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.context("failed to close Chromium")?;
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use tokio::time::Instant;

    fn started(id: &str) -> NetworkEvent {
        NetworkEvent::Started(id.to_string())
    }

    fn done(id: &str) -> NetworkEvent {
        NetworkEvent::Done(id.to_string())
    }

    #[tokio::test]
    async fn settles_with_two_requests_still_open() {
        let mut events = stream::iter([started("1"), started("2"), started("3"), done("3")])
            .chain(stream::pending());

        let begun = Instant::now();
        tokio::time::timeout(Duration::from_secs(5), wait_for_network_settled(&mut events))
            .await
            .expect("page never settled");
        assert!(begun.elapsed() >= NETWORK_QUIET);
    }

    #[tokio::test]
    async fn three_open_requests_keep_the_page_busy() {
        let mut events =
            stream::iter([started("1"), started("2"), started("3")]).chain(stream::pending());

        let waited =
            tokio::time::timeout(Duration::from_secs(2), wait_for_network_settled(&mut events))
                .await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn waits_for_slow_request_to_finish() {
        let (tx, mut rx) = mpsc::unbounded();
        for id in ["doc", "xhr-1", "xhr-2"] {
            tx.unbounded_send(started(id)).unwrap();
        }
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            tx.unbounded_send(done("xhr-2")).unwrap();
            std::future::pending::<()>().await;
        });

        let begun = Instant::now();
        tokio::time::timeout(Duration::from_secs(10), wait_for_network_settled(&mut rx))
            .await
            .expect("page never settled");
        assert!(begun.elapsed() >= Duration::from_millis(1500) + NETWORK_QUIET);
    }

    #[tokio::test]
    async fn redirected_request_counts_once() {
        let mut events = stream::iter([
            started("1"),
            started("2"),
            started("3"),
            started("3"),
            done("3"),
        ])
        .chain(stream::pending());

        tokio::time::timeout(Duration::from_secs(5), wait_for_network_settled(&mut events))
            .await
            .expect("page never settled");
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn renders_script_generated_meta() {
        let renderer = ChromiumRenderer::launch()
            .await
            .expect("failed to launch chromium");

        let html = renderer
            .render(
                "data:text/html,<title>Hi</title><script>\
                 var m=document.createElement('meta');\
                 m.setAttribute('property','og:title');\
                 m.setAttribute('content','From JS');\
                 document.head.appendChild(m);</script>",
            )
            .await
            .expect("render failed");

        assert!(html.contains("From JS"));
        renderer.shutdown().await.expect("shutdown failed");
    }
}
