// src/utils/net.rs

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the client IP for rate limiting.
///
/// Honors the first address in `X-Forwarded-For` when the app sits behind a
/// reverse proxy, otherwise falls back to the socket peer address.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    peer.ip().to_string()
}
