//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so the proxy runs with no config file at all;
//!   the defaults mirror the service's historical constants (port 8080,
//!   20480-byte buffers, cache capacity 5)
//! - Validation separates syntactic (serde) from semantic checks and reports
//!   every problem, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{AllowlistConfig, CacheConfig, ConsoleConfig, ListenerConfig, OriginConfig, ProxyConfig};
