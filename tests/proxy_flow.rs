//! End-to-end tests for the forward proxy against a local mock origin.

use std::sync::atomic::Ordering;

mod common;

#[tokio::test]
async fn miss_then_hit_serves_identical_bytes_without_new_connection() {
    let (origin, connections) = common::start_origin(b"hello from origin".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    let first = common::get(proxy, "http://127.0.0.1/index.html").await;
    assert!(first.starts_with(b"HTTP/1.1 200 OK"));
    assert!(first.ends_with(b"hello from origin"));
    assert_eq!(connections.load(Ordering::SeqCst), 1);

    let second = common::get(proxy, "http://127.0.0.1/index.html").await;
    assert_eq!(second, first, "cache hit must replay the exact bytes");
    assert_eq!(
        connections.load(Ordering::SeqCst),
        1,
        "a cache hit must not contact the origin"
    );
}

#[tokio::test]
async fn forbidden_hostname_gets_403_and_no_origin_contact() {
    let (origin, connections) = common::start_origin(b"unreachable".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    let response = common::get(proxy, "http://evil.test/").await;
    assert_eq!(response, b"HTTP/1.1 403 Forbidden\r\n\r\n");
    assert_eq!(connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authority_with_port_fails_the_allowlist() {
    let (origin, connections) = common::start_origin(b"unreachable".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    // Ports are not parsed out of the authority, so the exact-match
    // allowlist refuses the request.
    let response = common::get(proxy, "http://127.0.0.1:9999/").await;
    assert_eq!(response, b"HTTP/1.1 403 Forbidden\r\n\r\n");
    assert_eq!(connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_get_method_gets_405_and_no_origin_contact() {
    let (origin, connections) = common::start_origin(b"unreachable".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    let response = common::send_raw(
        proxy,
        "POST http://127.0.0.1/submit HTTP/1.1\r\nHost: proxy\r\nContent-Length: 0\r\n\r\n",
    )
    .await;
    assert_eq!(response, b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
    assert_eq!(connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_requests_get_400() {
    let (origin, connections) = common::start_origin(b"unreachable".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    // Fewer than three tokens on the request line.
    let response = common::send_raw(proxy, "GET\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");

    // Absolute form is required and only http:// is understood.
    let response = common::get(proxy, "https://127.0.0.1/secure").await;
    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");

    let response = common::send_raw(proxy, "GET /relative HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");

    assert_eq!(connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_origin_gets_502() {
    let (origin, _connections) = common::start_origin(b"gone".to_vec()).await;
    let mut config = common::proxy_config(origin);
    // Point the proxy at a port nothing listens on.
    config.origin.port = 1;
    let (proxy, _shutdown) = common::start_proxy(config).await;

    let response = common::get(proxy, "http://127.0.0.1/").await;
    assert_eq!(response, b"HTTP/1.1 502 Bad Gateway\r\n\r\n");
}

#[tokio::test]
async fn sixth_url_evicts_the_first_inserted() {
    let (origin, connections) = common::start_origin(b"page".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    // Default capacity is 5; fill it and push one more.
    for i in 1..=6 {
        common::get(proxy, &format!("http://127.0.0.1/u{}", i)).await;
    }
    assert_eq!(connections.load(Ordering::SeqCst), 6);

    // u2..u6 survive as hits.
    for i in 2..=6 {
        common::get(proxy, &format!("http://127.0.0.1/u{}", i)).await;
    }
    assert_eq!(connections.load(Ordering::SeqCst), 6);

    // u1 was the least recently used and is gone.
    common::get(proxy, "http://127.0.0.1/u1").await;
    assert_eq!(connections.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn lookup_promotes_an_entry_out_of_eviction_order() {
    let (origin, connections) = common::start_origin(b"page".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    for i in 1..=4 {
        common::get(proxy, &format!("http://127.0.0.1/u{}", i)).await;
    }
    // Touch u1, then insert two more to force one eviction.
    common::get(proxy, "http://127.0.0.1/u1").await;
    common::get(proxy, "http://127.0.0.1/u5").await;
    common::get(proxy, "http://127.0.0.1/u6").await;
    assert_eq!(connections.load(Ordering::SeqCst), 6);

    // u1 was promoted and survives; u2 took the eviction instead.
    common::get(proxy, "http://127.0.0.1/u1").await;
    assert_eq!(connections.load(Ordering::SeqCst), 6);

    common::get(proxy, "http://127.0.0.1/u2").await;
    assert_eq!(connections.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn oversized_response_is_relayed_in_full_but_never_cached() {
    let body = vec![b'x'; 4096];
    let (origin, connections) = common::start_origin(body.clone()).await;
    let mut config = common::proxy_config(origin);
    config.cache.max_response_bytes = 256;
    let (proxy, _shutdown) = common::start_proxy(config).await;

    let first = common::get(proxy, "http://127.0.0.1/big").await;
    assert!(first.ends_with(&body), "client must receive the full body");
    assert_eq!(connections.load(Ordering::SeqCst), 1);

    // Uncached, so the second request reaches the origin again.
    let second = common::get(proxy, "http://127.0.0.1/big").await;
    assert_eq!(second, first);
    assert_eq!(connections.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_clients_are_served_and_cache_stays_bounded() {
    let (origin, _connections) = common::start_origin(b"shared".to_vec()).await;
    let (proxy, _shutdown) = common::start_proxy(common::proxy_config(origin)).await;

    let mut tasks = Vec::new();
    for i in 0..32 {
        tasks.push(tokio::spawn(async move {
            common::get(proxy, &format!("http://127.0.0.1/p{}", i % 8)).await
        }));
    }
    for task in tasks {
        let response = task.await.unwrap();
        assert!(response.starts_with(b"HTTP/1.1 200 OK"));
        assert!(response.ends_with(b"shared"));
    }
}
