// ABOUTME: Local HTTP server that hosts one pre-rendered HTML report.
// ABOUTME: Every request, whatever its path, receives the same document.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Router;
use tokio::net::TcpListener;

use crate::error::ReportError;

/// Router answering every request with `document`.
pub fn router(document: Arc<str>) -> Router {
    Router::new().fallback(serve_document).with_state(document)
}

async fn serve_document(State(document): State<Arc<str>>) -> Html<String> {
    Html(document.to_string())
}

/// Bind the report listener on localhost.
pub async fn bind(port: u16) -> Result<TcpListener, ReportError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpListener::bind(addr).await.map_err(|e| {
        ReportError::io(
            format!("http://{}", addr),
            "Serve",
            Some(anyhow::anyhow!("failed to bind: {}", e)),
        )
    })
}

/// Serve `document` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    document: String,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ReportError> {
    let addr = listener
        .local_addr()
        .map(|a| format!("http://{}", a))
        .unwrap_or_default();

    axum::serve(listener, router(Arc::from(document)))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ReportError::io(addr, "Serve", Some(anyhow::anyhow!(e))))
}

/// Resolves when the process receives Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
