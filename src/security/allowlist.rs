//! Target hostname allowlist.
//!
//! # Design Decisions
//! - Exact string equality only; no case folding, trailing-dot stripping, or
//!   punycode normalization
//! - No wildcard or subdomain matching
//! - An authority carrying a port (`host:8080`) is compared verbatim, so it
//!   never matches a bare hostname entry

use std::collections::HashSet;

/// Immutable set of hostnames the proxy is willing to contact, fixed at
/// process start.
#[derive(Debug, Clone)]
pub struct Allowlist {
    hosts: HashSet<String>,
}

impl Allowlist {
    /// Build an allowlist from configured hostnames.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `hostname` is exactly one of the configured entries.
    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.contains(hostname)
    }

    /// Number of configured hostnames.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// True if no hostnames are configured (every request will be refused).
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
