//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (non-zero capacities and buffers)
//! - Check the bind address parses and allowlist entries are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The bind address is not a parseable socket address.
    InvalidBindAddress(String),
    /// The cache must hold at least one entry.
    CacheCapacityZero,
    /// Buffers must be large enough to hold a request line.
    RequestBufferTooSmall(usize),
    /// The cacheable-response limit cannot be zero.
    MaxResponseBytesZero,
    /// An allowlist entry is empty or contains whitespace.
    InvalidAllowlistHost(String),
    /// max_connections of zero would never accept anything.
    MaxConnectionsZero,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "bind address {:?} is not a valid socket address", addr)
            }
            ValidationError::CacheCapacityZero => write!(f, "cache capacity must be at least 1"),
            ValidationError::RequestBufferTooSmall(size) => {
                write!(f, "request buffer of {} bytes is too small", size)
            }
            ValidationError::MaxResponseBytesZero => {
                write!(f, "max cacheable response size must be non-zero")
            }
            ValidationError::InvalidAllowlistHost(host) => {
                write!(f, "allowlist entry {:?} is not a valid hostname", host)
            }
            ValidationError::MaxConnectionsZero => {
                write!(f, "max_connections must be at least 1")
            }
        }
    }
}

/// Smallest request buffer that can hold a usable request line.
const MIN_REQUEST_BUFFER: usize = 64;

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::MaxConnectionsZero);
    }
    if config.listener.request_buffer_bytes < MIN_REQUEST_BUFFER {
        errors.push(ValidationError::RequestBufferTooSmall(
            config.listener.request_buffer_bytes,
        ));
    }
    if config.cache.capacity == 0 {
        errors.push(ValidationError::CacheCapacityZero);
    }
    if config.cache.max_response_bytes == 0 {
        errors.push(ValidationError::MaxResponseBytesZero);
    }
    for host in &config.allowlist.hosts {
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            errors.push(ValidationError::InvalidAllowlistHost(host.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
