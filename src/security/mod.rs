//! Access control subsystem.
//!
//! A request reaches the origin only if its method is GET and its target
//! hostname is on the configured allowlist; the allowlist check runs before
//! any cache or network activity for the target.

pub mod allowlist;

pub use allowlist::Allowlist;
