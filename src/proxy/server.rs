//! Proxy server accept loop.
//!
//! # Responsibilities
//! - Own the shared state handed to every connection handler
//! - Spawn one task per accepted connection, never blocking on handlers
//! - Stop accepting the moment shutdown is signalled

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::cache::ResponseCache;
use crate::config::ProxyConfig;
use crate::net::connection::ConnectionTracker;
use crate::net::listener::Listener;
use crate::proxy::handler::handle_connection;
use crate::proxy::origin::OriginFetcher;
use crate::security::Allowlist;

/// State shared with every connection handler.
///
/// The cache is the only mutable member; everything else is read-only after
/// startup.
pub struct ProxyContext {
    pub cache: Arc<ResponseCache>,
    pub allowlist: Allowlist,
    pub fetcher: OriginFetcher,
    /// Size of the single client-request read and of the origin relay chunks.
    pub request_buffer_bytes: usize,
    /// Largest response the accumulator will hold for cache insertion.
    pub max_cacheable_bytes: usize,
}

/// The forward proxy: accept loop plus shared handler state.
pub struct ProxyServer {
    context: Arc<ProxyContext>,
}

impl ProxyServer {
    /// Assemble the shared state from a validated configuration.
    pub fn new(config: &ProxyConfig) -> Self {
        let context = ProxyContext {
            cache: Arc::new(ResponseCache::new(config.cache.capacity)),
            allowlist: Allowlist::new(config.allowlist.hosts.iter().cloned()),
            fetcher: OriginFetcher::new(config.origin.port),
            request_buffer_bytes: config.listener.request_buffer_bytes,
            max_cacheable_bytes: config.cache.max_response_bytes,
        };
        Self {
            context: Arc::new(context),
        }
    }

    /// Handle to the shared cache, for the operator console.
    pub fn cache(&self) -> Arc<ResponseCache> {
        Arc::clone(&self.context.cache)
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// In-flight handlers are abandoned on shutdown rather than drained; the
    /// process exits right after this returns.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let tracker = ConnectionTracker::new();

        tracing::info!(
            address = %addr,
            allowlisted_hosts = self.context.allowlist.len(),
            cache_capacity = self.context.cache.capacity(),
            "proxy accepting connections"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(error) => {
                            tracing::warn!(%error, "accept failed");
                            continue;
                        }
                    };
                    let guard = tracker.track();
                    let ctx = Arc::clone(&self.context);
                    tokio::spawn(async move {
                        // The permit rides along so the connection slot frees
                        // only when the handler finishes.
                        let _permit = permit;
                        handle_connection(ctx, stream, peer, guard).await;
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!(
                        abandoned = tracker.active_count(),
                        "shutdown signalled, listener closing"
                    );
                    return Ok(());
                }
            }
        }
    }
}
