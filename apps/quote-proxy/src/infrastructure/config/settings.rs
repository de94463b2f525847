//! Proxy Configuration Settings
//!
//! Configuration types for the quote proxy, loaded from environment variables.
//! Unparseable numeric values fall back to their defaults.

use std::time::Duration;

use url::Url;

/// Desktop browser user agent; the upstream rejects obvious library agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3001 }
    }
}

/// Upstream endpoints and session policy.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Candidate quote hosts, tried in order.
    pub hosts: Vec<String>,
    /// Quote endpoint path appended to each host.
    pub quote_path: String,
    /// Landing endpoint that issues session cookies.
    pub cookie_url: String,
    /// Endpoint returning the crumb for the current cookies.
    pub crumb_url: String,
    /// User agent sent on every upstream call.
    pub user_agent: String,
    /// Deadline for a single upstream call.
    pub timeout: Duration,
    /// Lifetime of a refreshed session.
    pub session_ttl: Duration,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            hosts: vec![
                "https://query1.finance.yahoo.com".to_string(),
                "https://query2.finance.yahoo.com".to_string(),
            ],
            quote_path: "/v7/finance/quote".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Maximum number of entries per cache.
    pub capacity: usize,
    /// Uniform entry lifetime.
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// Retry bounds for the fetch loop.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    /// Transport failures allowed per host before failing over.
    pub network_retry_limit: u32,
    /// 401/403 responses allowed before giving up.
    pub auth_retry_limit: u32,
    /// Backoff retries allowed for 429 (and 5xx once hosts are exhausted).
    pub backoff_retry_limit: u32,
    /// Backoff unit; retry `n` sleeps `backoff_base * n`.
    pub backoff_base: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            network_retry_limit: 2,
            auth_retry_limit: 2,
            backoff_retry_limit: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Complete proxy configuration.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Upstream endpoints and session policy.
    pub upstream: UpstreamSettings,
    /// Response cache settings.
    pub cache: CacheSettings,
    /// Fetch retry bounds.
    pub retry: RetrySettings,
}

impl ProxyConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream host list is empty or a URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream host list is empty or a URL is invalid.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(lookup);
        let defaults = Self::default();

        let server = ServerSettings {
            port: env.u16("QUOTE_PROXY_PORT", defaults.server.port),
        };

        let hosts = match env.string("QUOTE_PROXY_UPSTREAM_HOSTS") {
            Some(raw) => parse_host_list(&raw)?,
            None => defaults.upstream.hosts,
        };

        let upstream = UpstreamSettings {
            hosts,
            quote_path: env
                .string("QUOTE_PROXY_QUOTE_PATH")
                .unwrap_or(defaults.upstream.quote_path),
            cookie_url: validate_url(
                "QUOTE_PROXY_COOKIE_URL",
                env.string("QUOTE_PROXY_COOKIE_URL")
                    .unwrap_or(defaults.upstream.cookie_url),
            )?,
            crumb_url: validate_url(
                "QUOTE_PROXY_CRUMB_URL",
                env.string("QUOTE_PROXY_CRUMB_URL")
                    .unwrap_or(defaults.upstream.crumb_url),
            )?,
            user_agent: env
                .string("QUOTE_PROXY_USER_AGENT")
                .unwrap_or(defaults.upstream.user_agent),
            timeout: env.duration_secs(
                "QUOTE_PROXY_UPSTREAM_TIMEOUT_SECS",
                defaults.upstream.timeout,
            ),
            session_ttl: env.duration_secs(
                "QUOTE_PROXY_SESSION_TTL_SECS",
                defaults.upstream.session_ttl,
            ),
        };

        let cache = CacheSettings {
            capacity: env.usize("QUOTE_PROXY_CACHE_CAPACITY", defaults.cache.capacity),
            ttl: env.duration_secs("QUOTE_PROXY_CACHE_TTL_SECS", defaults.cache.ttl),
        };

        let retry = RetrySettings {
            network_retry_limit: env.u32(
                "QUOTE_PROXY_NETWORK_RETRY_LIMIT",
                defaults.retry.network_retry_limit,
            ),
            auth_retry_limit: env.u32(
                "QUOTE_PROXY_AUTH_RETRY_LIMIT",
                defaults.retry.auth_retry_limit,
            ),
            backoff_retry_limit: env.u32(
                "QUOTE_PROXY_BACKOFF_RETRY_LIMIT",
                defaults.retry.backoff_retry_limit,
            ),
            backoff_base: env.duration_millis(
                "QUOTE_PROXY_BACKOFF_BASE_MS",
                defaults.retry.backoff_base,
            ),
        };

        Ok(Self {
            server,
            upstream,
            cache,
            retry,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),

    /// A configured URL does not parse or is not http(s).
    #[error("environment variable {key} has invalid URL {value:?}")]
    InvalidUrl {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },

    /// The shared upstream HTTP client could not be built.
    #[error("failed to build upstream HTTP client: {0}")]
    HttpClient(String),
}

fn parse_host_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let hosts = raw
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(|host| {
            validate_url("QUOTE_PROXY_UPSTREAM_HOSTS", host.to_string())
                .map(|host| host.trim_end_matches('/').to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;

    if hosts.is_empty() {
        return Err(ConfigError::EmptyValue(
            "QUOTE_PROXY_UPSTREAM_HOSTS".to_string(),
        ));
    }
    Ok(hosts)
}

fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidUrl {
            key: key.to_string(),
            value,
        }),
    }
}

struct EnvSource<F>(F);

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.string(key).and_then(|v| v.trim().parse().ok())
    }

    fn u16(&self, key: &str, default: u16) -> u16 {
        self.parse(key).unwrap_or(default)
    }

    fn u32(&self, key: &str, default: u32) -> u32 {
        self.parse(key).unwrap_or(default)
    }

    fn usize(&self, key: &str, default: usize) -> usize {
        self.parse(key).unwrap_or(default)
    }

    fn duration_secs(&self, key: &str, default: Duration) -> Duration {
        self.parse::<u64>(key).map_or(default, Duration::from_secs)
    }

    fn duration_millis(&self, key: &str, default: Duration) -> Duration {
        self.parse::<u64>(key).map_or(default, Duration::from_millis)
    }
}
