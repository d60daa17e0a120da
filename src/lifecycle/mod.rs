//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGINT / SIGTERM
//!     → signals.rs (translate OS signal to a shutdown trigger)
//!     → shutdown.rs (broadcast to the accept loop and the console)
//!     → listener closes, in-flight handlers are abandoned, process exits
//! ```
//!
//! # Design Decisions
//! - Shutdown is abrupt by design: stop accepting and exit, no drain

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
