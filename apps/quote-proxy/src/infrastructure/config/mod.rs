//! Configuration Module
//!
//! Configuration loading and dependency injection for the quote proxy.

mod settings;
mod wiring;

pub use settings::{
    CacheSettings, ConfigError, ProxyConfig, RetrySettings, ServerSettings, UpstreamSettings,
};
pub use wiring::build_state;
