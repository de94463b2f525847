//! HTTP Server
//!
//! Binds the router to a TCP port and serves until the cancellation token fires.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::controller::{AppState, create_router};

/// Quote proxy HTTP server.
pub struct HttpServer {
    port: u16,
    state: AppState,
    cancel: CancellationToken,
}

impl HttpServer {
    /// Create a new server.
    #[must_use]
    pub const fn new(port: u16, state: AppState, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the server until cancelled, draining in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = create_router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ServerError::ServerFailed(e.to_string()))?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::application::ports::MockQuoteSource;
    use crate::application::services::QuoteService;
    use crate::domain::quote::ScoredQuote;
    use crate::infrastructure::cache::TtlCache;
    use crate::infrastructure::passthrough::PassthroughFetcher;

    fn state() -> AppState {
        AppState {
            quotes: Arc::new(QuoteService::new(
                Arc::new(MockQuoteSource::new()),
                Arc::new(TtlCache::<ScoredQuote>::new(1, Duration::from_secs(1))),
            )),
            passthrough: Arc::new(PassthroughFetcher::new(
                reqwest::Client::new(),
                Arc::new(TtlCache::new(1, Duration::from_secs(1))),
            )),
        }
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let cancel = CancellationToken::new();
        let server = HttpServer::new(0, state(), cancel.clone());
        let handle = tokio::spawn(server.run());

        cancel.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let occupied = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let result = HttpServer::new(port, state(), CancellationToken::new())
            .run()
            .await;

        assert!(matches!(result, Err(ServerError::BindFailed(p, _)) if p == port));
    }
}
