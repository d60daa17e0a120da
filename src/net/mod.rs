//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, optional connection bound)
//!     → connection.rs (id assignment, active-count tracking)
//!     → hand off to the proxy handler
//! ```
//!
//! # Design Decisions
//! - A semaphore bounds concurrent connections; the default is high enough
//!   to approximate unbounded task-per-connection behavior
//! - Connection ids come from an atomic counter, uniqueness is all we need
//! - No TLS: the proxy speaks plain HTTP on both sides

pub mod connection;
pub mod listener;
