use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};

/// Caller address, stored in request extensions for logging.
#[derive(Clone, Copy, Debug)]
pub struct ClientIp(pub IpAddr);

/// Record the client address, preferring proxy headers.
pub async fn extract_client_ip(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers(), addr.ip());
    request.extensions_mut().insert(ClientIp(ip));
    next.run(request).await
}

/// First parseable address from `X-Forwarded-For`, then `X-Real-IP`, then
/// the socket peer.
fn client_ip(headers: &HeaderMap, peer: IpAddr) -> IpAddr {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };
    forwarded.or_else(real_ip).unwrap_or(peer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::net::Ipv4Addr;

    const PEER: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.2"));
        assert_eq!(client_ip(&headers, PEER), "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_garbage_forwarded_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_ip(&headers, PEER), "198.51.100.4".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_peer_when_no_headers() {
        assert_eq!(client_ip(&HeaderMap::new(), PEER), PEER);
    }
}
