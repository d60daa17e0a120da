//! Caching forward HTTP proxy.
//!
//! Accepts client connections, validates that the request is a GET for an
//! allowlisted hostname, forwards it to the origin server on port 80, relays
//! the response back to the client, and memoizes complete responses in a
//! bounded LRU cache keyed by request url.
//!
//! ```text
//! Client ──▶ net (listener) ──▶ proxy (handler state machine)
//!                                   │
//!                 ┌─────────────────┼──────────────────┐
//!                 ▼                 ▼                  ▼
//!           security            cache              proxy::origin
//!          (allowlist)     (shared LRU store)    (fetch + relay)
//! ```
//!
//! The cache is the only state shared between connection handlers; everything
//! else is owned by a single task.

// Core subsystems
pub mod cache;
pub mod config;
pub mod net;
pub mod proxy;
pub mod security;

// Operator and process surfaces
pub mod console;
pub mod lifecycle;

pub use cache::ResponseCache;
pub use config::ProxyConfig;
pub use lifecycle::Shutdown;
pub use proxy::ProxyServer;
pub use security::Allowlist;
