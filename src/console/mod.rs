//! Stdin operator console.
//!
//! # Responsibilities
//! - Read line-oriented commands from the process's standard input
//! - `cache` dumps all cached urls (never bodies) to standard output
//!
//! # Design Decisions
//! - Runs on its own task; it never serializes with connection handling
//!   beyond the brief cache-snapshot lock
//! - Printing happens after the snapshot, so no I/O occurs under the lock
//! - Stdin EOF ends the loop quietly (the proxy may run detached)

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::cache::ResponseCache;

/// Run the command loop until stdin closes or shutdown fires.
pub async fn run(cache: Arc<ResponseCache>, mut shutdown: broadcast::Receiver<()>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("operator console ready; enter 'cache' to list cached urls");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) if line.trim() == "cache" => print_cache(&cache),
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(_)) => println!("unknown command; available: cache"),
                    Ok(None) => {
                        tracing::debug!("stdin closed, console stopping");
                        return;
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to read from stdin, console stopping");
                        return;
                    }
                }
            }
            _ = shutdown.recv() => return,
        }
    }
}

fn print_cache(cache: &ResponseCache) {
    // Snapshot first; the cache lock is released before any printing.
    let urls = cache.urls();
    println!("cache contents ({} of {} entries):", urls.len(), cache.capacity());
    for url in urls {
        println!("  {}", url);
    }
}
