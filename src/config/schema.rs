//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Response cache configuration.
    pub cache: CacheConfig,

    /// Origin connection configuration.
    pub origin: OriginConfig,

    /// Hostnames the proxy is allowed to contact.
    pub allowlist: AllowlistConfig,

    /// Stdin operator console.
    pub console: ConsoleConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Size of the single read covering a client's request line and headers.
    /// Requests larger than this are truncated.
    pub request_buffer_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
            request_buffer_bytes: 20_480,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached responses.
    pub capacity: usize,

    /// Largest response, in bytes, eligible for caching. Bigger responses
    /// are still relayed to the client in full.
    pub max_response_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            max_response_bytes: 20_480,
        }
    }
}

/// Origin connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Port every origin connection uses. Request urls never override it.
    pub port: u16,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self { port: 80 }
    }
}

/// Allowed target hostnames.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Exact hostnames; no wildcards, no case folding.
    pub hosts: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            hosts: vec![
                "httpbin.org".to_string(),
                "example.com".to_string(),
                "httpforever.com".to_string(),
                "httpstatus.io".to_string(),
                "hookbin.com".to_string(),
            ],
        }
    }
}

/// Stdin operator console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Whether the `cache` command loop runs on stdin.
    pub enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
