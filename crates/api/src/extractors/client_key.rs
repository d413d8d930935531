//! Client key extractor.
//!
//! Identifies an anonymous caller for rate limiting. Only the hash of the
//! key is ever stored.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use shared::crypto::sha256_hex;
use std::convert::Infallible;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const REAL_IP_HEADER: &str = "x-real-ip";
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First `X-Forwarded-For` entry, then `X-Real-IP`, then `"unknown"`.
pub fn client_key_from_headers(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header(FORWARDED_FOR_HEADER)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header(REAL_IP_HEADER))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// The caller's client key and its SHA-256.
#[derive(Debug, Clone)]
pub struct ClientKey {
    pub original: String,
    pub hash: String,
}

impl ClientKey {
    pub fn new(original: String) -> Self {
        let hash = sha256_hex(&original);
        Self { original, hash }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientKey::new(client_key_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_first_forwarded_entry_wins() {
        let map = headers(&[
            ("x-forwarded-for", "198.51.100.4, 10.0.0.1"),
            ("x-real-ip", "10.0.0.9"),
        ]);
        assert_eq!(client_key_from_headers(&map), "198.51.100.4");
    }

    #[test]
    fn test_real_ip_fallback() {
        let map = headers(&[("x-real-ip", "192.0.2.10")]);
        assert_eq!(client_key_from_headers(&map), "192.0.2.10");
    }

    #[test]
    fn test_blank_forwarded_falls_through() {
        let map = headers(&[("x-forwarded-for", " , 10.0.0.1"), ("x-real-ip", "192.0.2.10")]);
        assert_eq!(client_key_from_headers(&map), "192.0.2.10");
    }

    #[test]
    fn test_unknown_when_no_headers() {
        assert_eq!(client_key_from_headers(&HeaderMap::new()), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let key = ClientKey::new("192.0.2.10".to_string());
        assert_eq!(key.hash.len(), 64);
        assert_ne!(key.hash, key.original);
        assert_eq!(key.hash, ClientKey::new("192.0.2.10".to_string()).hash);
    }
}
