//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection
//!     → server.rs (accept loop, one task per connection)
//!     → handler.rs (state machine)
//!         → request.rs (request line + absolute-uri parsing)
//!         → security::Allowlist (403 on unknown hostname)
//!         → cache::ResponseCache (hit: replay cached bytes)
//!         → origin.rs (miss: fetch + relay + accumulate)
//! ```
//!
//! # Design Decisions
//! - The proxy synthesizes its own origin request; client headers are read
//!   but never forwarded
//! - Responses stream to the client chunk by chunk while a bounded
//!   accumulator decides cacheability; overflow abandons caching, never the
//!   relay
//! - Failures stay local to their connection; nothing is retried

pub mod handler;
pub mod origin;
pub mod request;
pub mod server;

pub use origin::{OriginError, OriginFetcher};
pub use request::{ParseError, ParsedRequest, ParsedTarget};
pub use server::ProxyServer;
