//! Upstream Session Manager
//!
//! Acquires and renews the (cookie header, crumb) pair the quote endpoint
//! requires.
//!
//! # State
//!
//! ```text
//! Empty ──refresh ok──► Valid ──expires / forced──► Refreshing ──ok──► Valid
//!                                                        │
//!                                                        └─fail─► stale Valid (unforced only)
//! ```
//!
//! The slot holds an `Arc<Session>` that is replaced wholesale on every
//! refresh. Concurrent refreshes may race; the last completion wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::Client;
use reqwest::header::{COOKIE, SET_COOKIE};

use crate::infrastructure::config::UpstreamSettings;
use crate::infrastructure::metrics::{self, RefreshResult};

/// Upstream credentials for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cookie_header: Option<String>,
    crumb: Option<String>,
    expires_at: Instant,
}

impl Session {
    /// Create a session expiring at `expires_at`.
    #[must_use]
    pub const fn new(
        cookie_header: Option<String>,
        crumb: Option<String>,
        expires_at: Instant,
    ) -> Self {
        Self {
            cookie_header,
            crumb,
            expires_at,
        }
    }

    /// `Cookie` header value, if the landing endpoint set any cookies.
    #[must_use]
    pub fn cookie_header(&self) -> Option<&str> {
        self.cookie_header.as_deref()
    }

    /// Crumb token, if the crumb endpoint returned one.
    #[must_use]
    pub fn crumb(&self) -> Option<&str> {
        self.crumb.as_deref()
    }

    /// Whether the session is still within its lifetime at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Session bootstrap failure.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The cookie landing endpoint could not be reached.
    #[error("cookie endpoint request failed: {0}")]
    CookieRequest(#[source] reqwest::Error),

    /// The crumb endpoint could not be reached or its body could not be read.
    #[error("crumb endpoint request failed: {0}")]
    CrumbRequest(#[source] reqwest::Error),
}

/// Owner of the single shared session slot.
#[derive(Debug)]
pub struct SessionManager {
    client: Client,
    cookie_url: String,
    crumb_url: String,
    ttl: Duration,
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionManager {
    /// Create a manager with an empty slot.
    #[must_use]
    pub fn new(client: Client, settings: &UpstreamSettings) -> Self {
        Self {
            client,
            cookie_url: settings.cookie_url.clone(),
            crumb_url: settings.crumb_url.clone(),
            ttl: settings.session_ttl,
            current: RwLock::new(None),
        }
    }

    /// Get a usable session, refreshing when forced, empty or expired.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the refresh fails and either the call was
    /// forced or no previous session exists.
    pub async fn get_session(&self, force_refresh: bool) -> Result<Arc<Session>, SessionError> {
        let previous = self.current.read().clone();

        if !force_refresh
            && let Some(session) = previous.as_ref()
            && session.is_valid_at(Instant::now())
        {
            return Ok(Arc::clone(session));
        }

        match self.refresh().await {
            Ok(session) => {
                let session = Arc::new(session);
                *self.current.write() = Some(Arc::clone(&session));
                metrics::record_session_refresh(RefreshResult::Refreshed);
                tracing::debug!(
                    forced = force_refresh,
                    has_cookie = session.cookie_header.is_some(),
                    has_crumb = session.crumb.is_some(),
                    "Upstream session refreshed"
                );
                Ok(session)
            }
            Err(e) => match previous {
                Some(stale) if !force_refresh => {
                    metrics::record_session_refresh(RefreshResult::Stale);
                    tracing::warn!(error = %e, "Session refresh failed, reusing stale session");
                    Ok(stale)
                }
                _ => {
                    metrics::record_session_refresh(RefreshResult::Failed);
                    tracing::error!(error = %e, forced = force_refresh, "Session refresh failed");
                    Err(e)
                }
            },
        }
    }

    async fn refresh(&self) -> Result<Session, SessionError> {
        // The landing page answers with any status; only its cookies matter.
        let landing = self
            .client
            .get(&self.cookie_url)
            .send()
            .await
            .map_err(SessionError::CookieRequest)?;
        let cookie_header = collect_cookies(landing.headers().get_all(SET_COOKIE).iter());

        let mut request = self.client.get(&self.crumb_url);
        if let Some(cookie) = &cookie_header {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await.map_err(SessionError::CrumbRequest)?;

        let crumb = if response.status().is_success() {
            let body = response.text().await.map_err(SessionError::CrumbRequest)?;
            Some(body.trim().to_string()).filter(|crumb| !crumb.is_empty())
        } else {
            tracing::warn!(
                status = response.status().as_u16(),
                "Crumb endpoint returned non-success, continuing without crumb"
            );
            None
        };

        Ok(Session::new(cookie_header, crumb, Instant::now() + self.ttl))
    }
}

/// Fold `Set-Cookie` values into one `Cookie` header of `name=value` pairs.
fn collect_cookies<'a, I>(values: I) -> Option<String>
where
    I: Iterator<Item = &'a reqwest::header::HeaderValue>,
{
    let pairs: Vec<&str> = values
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('=') && !pair.starts_with('='))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
