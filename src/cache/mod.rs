//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (cache miss path):
//!     origin response fully received → insert(url, bytes)
//!         → duplicate url removed → entry pushed most-recently-used
//!         → least-recently-used entry evicted if over capacity
//!
//! Handler (lookup path):
//!     lookup(url) → scan under lock → hit: promote + return copy
//! ```
//!
//! # Design Decisions
//! - One mutex over the whole ordered structure; lookup's recency promotion
//!   is a write, so even hits need exclusive access
//! - The lock is held only for in-memory list manipulation, never across I/O
//! - Capacity is small by default, so an O(n) membership scan is fine

pub mod lru;

pub use lru::ResponseCache;
