//! Per-connection forwarding state machine.
//!
//! # Responsibilities
//! - Read and parse the client's request
//! - Enforce the GET-only and allowlist policies before any origin contact
//! - Serve cache hits verbatim
//! - On a miss, relay the origin response chunk by chunk while accumulating
//!   it for the cache
//!
//! # Design Decisions
//! - One bounded read covers the request line plus headers; larger requests
//!   are truncated (accepted limitation, not an error)
//! - A response that outgrows the accumulator keeps streaming to the client
//!   and is simply never cached
//! - Origin resolve/connect failures answer 502 instead of the bare close
//!   the original implementation produced; mid-stream read errors still end
//!   with a plain close since a status line may already have been relayed

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::net::connection::{ConnectionGuard, ConnectionId};
use crate::proxy::origin::OriginStream;
use crate::proxy::request::{ParsedRequest, ParsedTarget};
use crate::proxy::server::ProxyContext;

const STATUS_BAD_REQUEST: &[u8] = b"HTTP/1.1 400 Bad Request\r\n\r\n";
const STATUS_FORBIDDEN: &[u8] = b"HTTP/1.1 403 Forbidden\r\n\r\n";
const STATUS_METHOD_NOT_ALLOWED: &[u8] = b"HTTP/1.1 405 Method Not Allowed\r\n\r\n";
const STATUS_BAD_GATEWAY: &[u8] = b"HTTP/1.1 502 Bad Gateway\r\n\r\n";

/// Drive one client connection to completion.
///
/// Every outcome ends here: both sockets close when this returns, and no
/// failure propagates beyond the owning task.
pub async fn handle_connection(
    ctx: Arc<ProxyContext>,
    mut client: TcpStream,
    peer: SocketAddr,
    conn: ConnectionGuard,
) {
    let conn_id = conn.id();

    let mut request_buf = vec![0u8; ctx.request_buffer_bytes];
    let received = match client.read(&mut request_buf).await {
        Ok(0) => return,
        Ok(n) => n,
        Err(error) => {
            tracing::debug!(connection_id = %conn_id, peer = %peer, %error, "failed to read request");
            return;
        }
    };

    let request = match ParsedRequest::from_bytes(&request_buf[..received]) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!(connection_id = %conn_id, peer = %peer, %error, "malformed request line");
            respond(&mut client, STATUS_BAD_REQUEST).await;
            return;
        }
    };

    if request.method != "GET" {
        tracing::debug!(connection_id = %conn_id, method = %request.method, "rejecting non-GET method");
        respond(&mut client, STATUS_METHOD_NOT_ALLOWED).await;
        return;
    }

    let target = match ParsedTarget::from_request_uri(&request.request_uri) {
        Ok(target) => target,
        Err(error) => {
            tracing::warn!(connection_id = %conn_id, uri = %request.request_uri, %error, "malformed request target");
            respond(&mut client, STATUS_BAD_REQUEST).await;
            return;
        }
    };

    if !ctx.allowlist.contains(&target.hostname) {
        tracing::warn!(connection_id = %conn_id, hostname = %target.hostname, "hostname not allowlisted");
        respond(&mut client, STATUS_FORBIDDEN).await;
        return;
    }

    if let Some(response) = ctx.cache.lookup(&request.request_uri) {
        tracing::info!(connection_id = %conn_id, url = %request.request_uri, bytes = response.len(), "cache hit");
        respond(&mut client, &response).await;
        return;
    }
    tracing::info!(connection_id = %conn_id, url = %request.request_uri, "cache miss");

    let mut origin = match ctx.fetcher.fetch(&target.hostname, &target.path).await {
        Ok(stream) => stream,
        Err(error) => {
            tracing::warn!(connection_id = %conn_id, hostname = %target.hostname, %error, "origin unreachable");
            respond(&mut client, STATUS_BAD_GATEWAY).await;
            return;
        }
    };

    relay_and_cache(&ctx, &mut client, &mut origin, &request.request_uri, conn_id).await;
}

/// Stream the origin response to the client while accumulating it, then
/// insert it into the cache if it arrived complete and within bounds.
async fn relay_and_cache(
    ctx: &ProxyContext,
    client: &mut TcpStream,
    origin: &mut OriginStream,
    url: &str,
    conn_id: ConnectionId,
) {
    let mut chunk = vec![0u8; ctx.request_buffer_bytes];
    let mut accumulated: Vec<u8> = Vec::new();
    let mut cacheable = true;
    let mut client_writable = true;
    let mut relayed = 0usize;

    loop {
        match origin.next_chunk(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                // The relay continues even if caching was abandoned or the
                // client stopped reading; the origin stream is drained either
                // way so the loop terminates at EOF.
                if client_writable {
                    if let Err(error) = client.write_all(&chunk[..n]).await {
                        tracing::debug!(connection_id = %conn_id, %error, "client went away mid-relay");
                        client_writable = false;
                    } else {
                        relayed += n;
                    }
                }
                if cacheable {
                    if accumulated.len() + n <= ctx.max_cacheable_bytes {
                        accumulated.extend_from_slice(&chunk[..n]);
                    } else {
                        tracing::warn!(
                            connection_id = %conn_id,
                            url = %url,
                            limit = ctx.max_cacheable_bytes,
                            "response exceeds cache limit, relaying without caching"
                        );
                        cacheable = false;
                        accumulated.clear();
                    }
                }
            }
            Err(error) => {
                tracing::warn!(connection_id = %conn_id, url = %url, %error, "error reading origin response");
                return;
            }
        }
    }

    tracing::debug!(connection_id = %conn_id, url = %url, bytes = relayed, "relay complete");

    // Insert before closing the client so a back-to-back re-request from the
    // same client cannot race past the cache.
    if cacheable && !accumulated.is_empty() {
        tracing::info!(connection_id = %conn_id, url = %url, bytes = accumulated.len(), "caching response");
        ctx.cache.insert(url.to_string(), accumulated);
    }
    let _ = client.shutdown().await;
}

/// Best-effort write of proxy-generated bytes; the connection closes right
/// after, so a failed write is only worth a trace.
async fn respond(client: &mut TcpStream, bytes: &[u8]) {
    if let Err(error) = client.write_all(bytes).await {
        tracing::trace!(%error, "failed to write response to client");
    }
    let _ = client.shutdown().await;
}
