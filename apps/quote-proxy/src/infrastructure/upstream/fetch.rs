//! Quote Fetch Orchestrator
//!
//! Drives one end-to-end upstream quote request: host selection, session
//! attachment, and the retry / backoff / failover decisions taken on each
//! response.
//!
//! # Decision Table
//!
//! | Outcome              | Decision                                                  |
//! |----------------------|-----------------------------------------------------------|
//! | transport / timeout  | retry same host, then next host                           |
//! | 404                  | `Ok(None)`, never retried                                 |
//! | 401 / 403            | forced session refresh and retry, up to the auth bound    |
//! | 429                  | sleep `base * n` and retry same host, up to the bound     |
//! | 5xx                  | next host if any, else the 429 policy                     |
//! | other 4xx            | `ClientRejected`                                          |
//! | 200                  | decode; no record is `Ok(None)`, bad record is malformed  |
//!
//! Every counter lives on the stack of one `fetch_quote` call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::COOKIE;

use super::payload::decode_quote;
use super::session::{Session, SessionManager};
use crate::application::ports::{QuoteSource, UpstreamError};
use crate::domain::quote::{Quote, Symbol};
use crate::infrastructure::config::{RetrySettings, UpstreamSettings};
use crate::infrastructure::metrics::{self, AttemptOutcome};

/// How a response status steers the fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    Success,
    NotFound,
    AuthExpired,
    RateLimited,
    ServerError,
    ClientError,
}

/// Categorize an HTTP status for the fetch loop.
const fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        404 => StatusClass::NotFound,
        401 | 403 => StatusClass::AuthExpired,
        429 => StatusClass::RateLimited,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::ClientError,
    }
}

/// Per-call retry counters.
#[derive(Debug, Default)]
struct Attempts {
    host_index: usize,
    host_failures: u32,
    auth_failures: u32,
    backoff_retries: u32,
    force_refresh: bool,
}

/// Upstream quote source with session handling and host failover.
#[derive(Debug)]
pub struct YahooQuoteSource {
    client: Client,
    session: Arc<SessionManager>,
    hosts: Vec<String>,
    quote_path: String,
    timeout: Duration,
    retry: RetrySettings,
}

impl YahooQuoteSource {
    /// Create a new quote source.
    ///
    /// `client` should carry the per-call deadline from `upstream.timeout`.
    #[must_use]
    pub fn new(
        client: Client,
        session: Arc<SessionManager>,
        upstream: &UpstreamSettings,
        retry: RetrySettings,
    ) -> Self {
        Self {
            client,
            session,
            hosts: upstream.hosts.clone(),
            quote_path: upstream.quote_path.clone(),
            timeout: upstream.timeout,
            retry,
        }
    }

    async fn send(
        &self,
        host: &str,
        symbol: &Symbol,
        session: &Session,
    ) -> Result<(u16, Vec<u8>), reqwest::Error> {
        let url = format!("{host}{}", self.quote_path);
        let mut request = self.client.get(&url).query(&[
            ("symbols", symbol.as_str()),
            ("crumb", session.crumb().unwrap_or_default()),
        ]);
        if let Some(cookie) = session.cookie_header() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }

    /// Take one backoff step, or `None` once the bound is reached.
    fn next_backoff(&self, attempts: &mut Attempts) -> Option<Duration> {
        if attempts.backoff_retries >= self.retry.backoff_retry_limit {
            return None;
        }
        attempts.backoff_retries += 1;
        Some(
            self.retry
                .backoff_base
                .checked_mul(attempts.backoff_retries)
                .unwrap_or(Duration::MAX),
        )
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    #[allow(clippy::too_many_lines)]
    #[tracing::instrument(skip_all, fields(symbol = %symbol))]
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Option<Quote>, UpstreamError> {
        let mut attempts = Attempts::default();

        loop {
            let Some(host) = self.hosts.get(attempts.host_index) else {
                return Err(UpstreamError::Network(
                    "no upstream hosts configured".to_string(),
                ));
            };
            let session = self
                .session
                .get_session(attempts.force_refresh)
                .await
                .map_err(|e| UpstreamError::Session(e.to_string()))?;
            attempts.force_refresh = false;

            let (status, body) = match self.send(host, symbol, &session).await {
                Ok(response) => response,
                Err(e) => {
                    metrics::record_upstream_attempt(AttemptOutcome::Transport);
                    attempts.host_failures += 1;

                    // Unforced, so an expired session refreshes and a failed
                    // refresh falls back to the stale one.
                    if attempts.host_failures < self.retry.network_retry_limit {
                        tracing::warn!(
                            error = %e,
                            host = %host,
                            attempt = attempts.host_failures,
                            "Upstream transport error, retrying"
                        );
                        continue;
                    }
                    if attempts.host_index + 1 < self.hosts.len() {
                        tracing::warn!(error = %e, host = %host, "Upstream unreachable, failing over");
                        attempts.host_index += 1;
                        attempts.host_failures = 0;
                        continue;
                    }

                    tracing::error!(error = %e, "Upstream unreachable on every host");
                    return Err(if e.is_timeout() {
                        UpstreamError::Timeout(self.timeout)
                    } else {
                        UpstreamError::Network(e.to_string())
                    });
                }
            };

            match classify_status(status) {
                StatusClass::Success => {
                    metrics::record_upstream_attempt(AttemptOutcome::Success);
                    return decode_quote(&body, symbol).map_err(|e| {
                        tracing::warn!(error = %e, host = %host, "Malformed upstream payload");
                        UpstreamError::MalformedPayload(e.to_string())
                    });
                }
                StatusClass::NotFound => {
                    metrics::record_upstream_attempt(AttemptOutcome::NotFound);
                    tracing::debug!(host = %host, "Upstream has no such ticker");
                    return Ok(None);
                }
                StatusClass::AuthExpired => {
                    metrics::record_upstream_attempt(AttemptOutcome::AuthRejected);
                    attempts.auth_failures += 1;

                    if attempts.auth_failures < self.retry.auth_retry_limit {
                        tracing::warn!(
                            status,
                            attempt = attempts.auth_failures,
                            "Upstream rejected session, forcing refresh"
                        );
                        attempts.force_refresh = true;
                        continue;
                    }
                    return Err(UpstreamError::AuthRejected {
                        status,
                        attempts: attempts.auth_failures,
                    });
                }
                StatusClass::RateLimited => {
                    metrics::record_upstream_attempt(AttemptOutcome::RateLimited);
                    if let Some(delay) = self.next_backoff(&mut attempts) {
                        tracing::warn!(
                            delay_ms = delay.as_millis(),
                            attempt = attempts.backoff_retries,
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(UpstreamError::RateLimited {
                        retries: attempts.backoff_retries,
                    });
                }
                StatusClass::ServerError => {
                    metrics::record_upstream_attempt(AttemptOutcome::ServerError);
                    if attempts.host_index + 1 < self.hosts.len() {
                        tracing::warn!(status, host = %host, "Upstream server error, failing over");
                        attempts.host_index += 1;
                        attempts.host_failures = 0;
                        continue;
                    }
                    if let Some(delay) = self.next_backoff(&mut attempts) {
                        tracing::warn!(
                            status,
                            delay_ms = delay.as_millis(),
                            attempt = attempts.backoff_retries,
                            "Upstream server error on last host, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(UpstreamError::ServerError { status });
                }
                StatusClass::ClientError => {
                    metrics::record_upstream_attempt(AttemptOutcome::ClientError);
                    tracing::warn!(status, "Upstream rejected request");
                    return Err(UpstreamError::ClientRejected { status });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::FailureClass;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const QUOTE_PATH: &str = "/v7/finance/quote";

    #[test_case(200, StatusClass::Success ; "ok")]
    #[test_case(204, StatusClass::Success ; "no content")]
    #[test_case(404, StatusClass::NotFound ; "not found")]
    #[test_case(401, StatusClass::AuthExpired ; "unauthorized")]
    #[test_case(403, StatusClass::AuthExpired ; "forbidden")]
    #[test_case(429, StatusClass::RateLimited ; "too many requests")]
    #[test_case(500, StatusClass::ServerError ; "internal error")]
    #[test_case(503, StatusClass::ServerError ; "unavailable")]
    #[test_case(400, StatusClass::ClientError ; "bad request")]
    #[test_case(422, StatusClass::ClientError ; "unprocessable")]
    fn status_classes(status: u16, expected: StatusClass) {
        assert_eq!(classify_status(status), expected);
    }

    fn retry() -> RetrySettings {
        RetrySettings {
            backoff_base: Duration::from_millis(1),
            ..RetrySettings::default()
        }
    }

    fn source(server: &MockServer, hosts: &[&str], retry: RetrySettings) -> YahooQuoteSource {
        source_with_session_ttl(server, hosts, retry, UpstreamSettings::default().session_ttl)
    }

    fn source_with_session_ttl(
        server: &MockServer,
        hosts: &[&str],
        retry: RetrySettings,
        session_ttl: Duration,
    ) -> YahooQuoteSource {
        let upstream = UpstreamSettings {
            hosts: hosts
                .iter()
                .map(|h| format!("{}{h}", server.uri()))
                .collect(),
            cookie_url: format!("{}/cookie", server.uri()),
            crumb_url: format!("{}/crumb", server.uri()),
            timeout: Duration::from_millis(300),
            session_ttl,
            ..UpstreamSettings::default()
        };
        let client = Client::builder().timeout(upstream.timeout).build().unwrap();
        let session = Arc::new(SessionManager::new(client.clone(), &upstream));
        YahooQuoteSource::new(client, session, &upstream, retry)
    }

    async fn mount_session(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/cookie"))
            .respond_with(ResponseTemplate::new(404).append_header("set-cookie", "A1=abc; Path=/"))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/crumb"))
            .respond_with(ResponseTemplate::new(200).set_body_string("crumb-1"))
            .mount(server)
            .await;
    }

    fn quote_body(symbol: &str, price: f64) -> serde_json::Value {
        json!({
            "quoteResponse": {
                "result": [{
                    "symbol": symbol,
                    "regularMarketPrice": price,
                    "trailingPE": 25.0,
                    "forwardPE": 20.0
                }],
                "error": null
            }
        })
    }

    async fn count(server: &MockServer, request_path: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }

    fn aapl() -> Symbol {
        Symbol::parse("aapl").unwrap()
    }

    #[tokio::test]
    async fn success_sends_session_and_normalizes() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .and(query_param("symbols", "AAPL"))
            .and(query_param("crumb", "crumb-1"))
            .and(header("cookie", "A1=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .expect(1)
            .mount(&server)
            .await;

        let quote = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(quote, Quote::new("AAPL", 150.0, Some(25.0), Some(20.0)));
    }

    #[tokio::test]
    async fn missing_crumb_sends_empty_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cookie"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/crumb"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .and(query_param("crumb", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .expect(1)
            .mount(&server)
            .await;

        let quote = source(&server, &[""], retry()).fetch_quote(&aapl()).await;
        assert!(quote.unwrap().is_some());
    }

    #[tokio::test]
    async fn not_found_never_retries_even_with_untried_hosts() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/h1{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/h2{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 1.0)))
            .expect(0)
            .mount(&server)
            .await;

        let result = source(&server, &["/h1", "/h2"], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn auth_rejection_forces_exactly_one_refresh() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .mount(&server)
            .await;

        let quote = source(&server, &[""], retry()).fetch_quote(&aapl()).await;

        assert!(quote.unwrap().is_some());
        assert_eq!(count(&server, QUOTE_PATH).await, 2);
        // Initial session plus one forced refresh.
        assert_eq!(count(&server, "/cookie").await, 2);
    }

    #[tokio::test]
    async fn persistent_auth_rejection_is_client_class() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UpstreamError::AuthRejected {
                status: 403,
                attempts: 2
            }
        ));
        assert_eq!(err.class(), FailureClass::ClientRejected);
        assert_eq!(count(&server, QUOTE_PATH).await, 2);
    }

    #[tokio::test]
    async fn server_error_fails_over_to_next_host() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/h1{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/h2{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .expect(1)
            .mount(&server)
            .await;

        let quote = source(&server, &["/h1", "/h2"], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap();
        assert!(quote.is_some());
    }

    #[tokio::test]
    async fn server_error_on_last_host_backs_off_then_fails() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::ServerError { status: 500 }));
        assert_eq!(err.class(), FailureClass::UpstreamUnavailable);
        assert_eq!(count(&server, QUOTE_PATH).await, 4);
    }

    #[tokio::test]
    async fn rate_limit_recovers_after_backoff() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .mount(&server)
            .await;

        let quote = source(&server, &[""], retry()).fetch_quote(&aapl()).await;

        assert!(quote.unwrap().is_some());
        assert_eq!(count(&server, QUOTE_PATH).await, 3);
        // Backoff does not touch the session.
        assert_eq!(count(&server, "/cookie").await, 1);
    }

    #[tokio::test]
    async fn persistent_rate_limit_gives_up_after_bound() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::RateLimited { retries: 3 }));
        assert_eq!(count(&server, QUOTE_PATH).await, 4);
    }

    #[tokio::test]
    async fn backoff_delay_grows_linearly() {
        let server = MockServer::start().await;
        let source = source(
            &server,
            &[""],
            RetrySettings {
                backoff_base: Duration::from_millis(100),
                ..RetrySettings::default()
            },
        );
        let mut attempts = Attempts::default();

        assert_eq!(source.next_backoff(&mut attempts), Some(Duration::from_millis(100)));
        assert_eq!(source.next_backoff(&mut attempts), Some(Duration::from_millis(200)));
        assert_eq!(source.next_backoff(&mut attempts), Some(Duration::from_millis(300)));
        assert_eq!(source.next_backoff(&mut attempts), None);
    }

    #[tokio::test]
    async fn backoff_delay_saturates_on_overflow() {
        let server = MockServer::start().await;
        let source = source(
            &server,
            &[""],
            RetrySettings {
                backoff_base: Duration::MAX,
                ..RetrySettings::default()
            },
        );
        let mut attempts = Attempts::default();

        assert_eq!(source.next_backoff(&mut attempts), Some(Duration::MAX));
        assert_eq!(source.next_backoff(&mut attempts), Some(Duration::MAX));
    }

    #[tokio::test]
    async fn other_client_error_is_not_retried() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::ClientRejected { status: 400 }));
    }

    #[tokio::test]
    async fn non_json_success_is_malformed() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Will be right back</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn record_without_price_is_malformed() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "quoteResponse": {"result": [{"symbol": "AAPL", "regularMarketPrice": "n/a"}]}
            })))
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"quoteResponse": {"result": [], "error": null}})),
            )
            .mount(&server)
            .await;

        let result = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn transport_failure_retries_then_fails_over() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/h1{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/h2{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .mount(&server)
            .await;

        let quote = source(&server, &["/h1", "/h2"], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap();

        assert!(quote.is_some());
        assert_eq!(count(&server, &format!("/h1{QUOTE_PATH}")).await, 2);
        // The live session is reused across transport retries.
        assert_eq!(count(&server, "/cookie").await, 1);
    }

    #[tokio::test]
    async fn timeout_on_every_host_is_reported() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = source(&server, &[""], retry())
            .fetch_quote(&aapl())
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Timeout(d) if d == Duration::from_millis(300)));
        assert_eq!(err.class(), FailureClass::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn failing_session_refresh_does_not_block_failover() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cookie"))
            .respond_with(ResponseTemplate::new(200).append_header("set-cookie", "A1=abc; Path=/"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cookie"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/crumb"))
            .respond_with(ResponseTemplate::new(200).set_body_string("crumb-1"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/h1{QUOTE_PATH}")))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/h2{QUOTE_PATH}")))
            .and(header("cookie", "A1=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("AAPL", 150.0)))
            .mount(&server)
            .await;

        // Every later refresh times out, so each attempt runs on the stale session.
        let quote = source_with_session_ttl(&server, &["/h1", "/h2"], retry(), Duration::ZERO)
            .fetch_quote(&aapl())
            .await
            .unwrap();

        assert_eq!(quote.map(|q| q.price), Some(150.0));
        assert_eq!(count(&server, &format!("/h1{QUOTE_PATH}")).await, 2);
        assert_eq!(count(&server, &format!("/h2{QUOTE_PATH}")).await, 1);
        assert!(count(&server, "/cookie").await >= 2);
    }
}
