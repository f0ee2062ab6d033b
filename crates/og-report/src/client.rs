// ABOUTME: The Client that runs one report: render, collect, and resolve under a single deadline.
// ABOUTME: Maps renderer failures to Navigation errors and deadline expiry to Timeout errors.

use std::time::Duration;

use anyhow::anyhow;
use tokio::time::Instant;

use crate::collector::collect_html;
use crate::error::ReportError;
use crate::options::{Options, RendererKind};
use crate::render::{ChromiumRenderer, HttpRenderer, Renderer};
use crate::resolver::resolve;
use crate::result::ReportModel;

/// Time a renderer gets to shut down once the report is done or has timed out.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Shut the renderer down, giving up after [`SHUTDOWN_GRACE`].
async fn shutdown_within_grace(renderer: &dyn Renderer) {
    match tokio::time::timeout(SHUTDOWN_GRACE, renderer.shutdown()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "failed to shut down renderer"),
        Err(_) => tracing::warn!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "renderer did not shut down in time"
        ),
    }
}

/// Runs the render → collect → resolve pipeline for one configured URL.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
}

impl Client {
    /// Create a new Client with validated options.
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Build the report using the configured renderer.
    ///
    /// Launching the browser counts against the deadline. The renderer is shut
    /// down whether the run succeeds, fails, or times out.
    pub async fn report(&self) -> Result<ReportModel, ReportError> {
        let url = self.opts.url.as_str();
        let deadline = Instant::now() + self.opts.timeout;
        match self.opts.renderer {
            RendererKind::Chromium => {
                let launch = tokio::time::timeout_at(deadline, ChromiumRenderer::launch());
                let renderer = match launch.await {
                    Ok(Ok(r)) => r,
                    Ok(Err(e)) => return Err(ReportError::navigation(url, "Launch", Some(e))),
                    Err(_) => return Err(self.timeout_error()),
                };
                let result = self.report_until(&renderer, deadline).await;
                shutdown_within_grace(&renderer).await;
                result
            }
            RendererKind::Http => {
                let renderer = HttpRenderer::new()
                    .map_err(|e| ReportError::navigation(url, "Render", Some(e)))?;
                self.report_until(&renderer, deadline).await
            }
        }
    }

    /// Build the report with a caller-supplied renderer.
    ///
    /// The whole pipeline runs as one future raced against the deadline; on
    /// expiry the future is dropped, which cancels the in-flight render.
    pub async fn report_with(&self, renderer: &dyn Renderer) -> Result<ReportModel, ReportError> {
        self.report_until(renderer, Instant::now() + self.opts.timeout)
            .await
    }

    async fn report_until(
        &self,
        renderer: &dyn Renderer,
        deadline: Instant,
    ) -> Result<ReportModel, ReportError> {
        let url = self.opts.url.as_str();
        tracing::info!(url, renderer = %self.opts.renderer, "generating report");

        let pipeline = async {
            let html = renderer
                .render(url)
                .await
                .map_err(|e| ReportError::navigation(url, "Render", Some(e)))?;
            tracing::debug!(bytes = html.len(), "page rendered");

            let tags = collect_html(&html);
            tracing::debug!(tags = tags.len(), "tags collected");
            resolve(&tags, url)
        };

        let result = match tokio::time::timeout_at(deadline, pipeline).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error()),
        };

        match &result {
            Ok(model) => tracing::info!(url, tags = model.tags.len(), "report ready"),
            Err(e) => tracing::error!(url, error = %e, "report failed"),
        }
        result
    }

    fn timeout_error(&self) -> ReportError {
        ReportError::timeout(
            &self.opts.url,
            "Report",
            Some(anyhow!(
                "no report within {} seconds",
                self.opts.timeout.as_secs_f64()
            )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResolvedField;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct FixedRenderer(&'static str);

    #[async_trait]
    impl Renderer for FixedRenderer {
        async fn render(&self, _url: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl Renderer for FailingRenderer {
        async fn render(&self, _url: &str) -> anyhow::Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    /// Never finishes; records whether its future was dropped before completing.
    struct HangingRenderer {
        dropped: Arc<AtomicBool>,
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Renderer for HangingRenderer {
        async fn render(&self, _url: &str) -> anyhow::Result<String> {
            let _guard = SetOnDrop(Arc::clone(&self.dropped));
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    /// Renders instantly but never finishes shutting down.
    struct StuckShutdownRenderer;

    #[async_trait]
    impl Renderer for StuckShutdownRenderer {
        async fn render(&self, _url: &str) -> anyhow::Result<String> {
            Ok(String::new())
        }

        async fn shutdown(&self) -> anyhow::Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn client(timeout: Duration) -> Client {
        Client::new(
            Options::builder()
                .url("http://localhost:4000/post")
                .timeout(timeout)
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn builds_report_from_rendered_markup() {
        let renderer = FixedRenderer(
            r#"<html><head>
                <title>Example</title>
                <meta property="og:title" content="OG Example">
                <meta property="og:url" content="https://example.com/post">
            </head></html>"#,
        );
        let model = client(Duration::from_secs(5))
            .report_with(&renderer)
            .await
            .unwrap();

        assert_eq!(model.title, ResolvedField::authored("OG Example"));
        assert_eq!(model.hostname, ResolvedField::authored("example.com"));
        assert_eq!(model.source_url, "http://localhost:4000/post");
    }

    #[tokio::test]
    async fn renderer_failure_is_navigation_error() {
        let err = client(Duration::from_secs(5))
            .report_with(&FailingRenderer)
            .await
            .unwrap_err();
        assert!(err.is_navigation());
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn deadline_expiry_is_timeout_and_cancels_render() {
        let dropped = Arc::new(AtomicBool::new(false));
        let renderer = HangingRenderer {
            dropped: Arc::clone(&dropped),
        };
        let err = client(Duration::from_millis(50))
            .report_with(&renderer)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(!err.is_navigation());
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn malformed_og_url_propagates() {
        let renderer = FixedRenderer(r#"<meta property="og:url" content="not a url">"#);
        let err = client(Duration::from_secs(5))
            .report_with(&renderer)
            .await
            .unwrap_err();
        assert!(err.is_malformed_candidate_url());
    }

    #[tokio::test]
    async fn stuck_shutdown_is_abandoned_after_grace() {
        let started = Instant::now();
        let bounded = tokio::time::timeout(
            SHUTDOWN_GRACE + Duration::from_secs(3),
            shutdown_within_grace(&StuckShutdownRenderer),
        )
        .await;

        assert!(bounded.is_ok());
        assert!(started.elapsed() >= SHUTDOWN_GRACE);
    }
}
