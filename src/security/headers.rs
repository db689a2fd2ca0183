//! Security headers added to every API response

use warp::filters::reply::WithHeaders;
use warp::http::header::{HeaderMap, HeaderName, HeaderValue};

/// Strict Content Security Policy for a JSON API
const STRICT_CSP: &str = "default-src 'none'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str =
    "geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()";

/// Headers applied to every reply, including rejections
pub fn api_security_header_map() -> HeaderMap {
    let pairs: [(&'static str, &'static str); 7] = [
        ("x-frame-options", "DENY"),
        ("x-content-type-options", "nosniff"),
        ("x-xss-protection", "1; mode=block"),
        ("referrer-policy", "no-referrer"),
        ("content-security-policy", STRICT_CSP),
        ("cache-control", "no-cache, no-store, must-revalidate"),
        ("permissions-policy", PERMISSIONS_POLICY),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Warp wrapper adding the API security headers
pub fn api_security_headers() -> WithHeaders {
    warp::reply::with::headers(api_security_header_map())
}
