//! Security headers middleware
//!
//! Adds the usual hardening headers to every response. No
//! Content-Security-Policy is sent: the service only returns JSON and plain
//! text, and hosting platforms probe `/` and `/health` directly.
//!
//! Headers configured:
//! - X-Content-Type-Options: nosniff
//! - X-Frame-Options: SAMEORIGIN
//! - X-XSS-Protection: 0 (legacy auditors disabled)
//! - Strict-Transport-Security: one year including subdomains
//! - Referrer-Policy: no-referrer
//! - Cross-Origin-Opener-Policy / Cross-Origin-Resource-Policy
//! - X-DNS-Prefetch-Control, X-Download-Options, X-Permitted-Cross-Domain-Policies

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    );
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::X_DNS_PREFETCH_CONTROL,
        HeaderValue::from_static("off"),
    );
    headers.insert(
        "cross-origin-opener-policy",
        HeaderValue::from_static("same-origin"),
    );
    // Cross-origin API clients must be able to read responses.
    headers.insert(
        "cross-origin-resource-policy",
        HeaderValue::from_static("cross-origin"),
    );
    headers.insert("x-download-options", HeaderValue::from_static("noopen"));
    headers.insert(
        "x-permitted-cross-domain-policies",
        HeaderValue::from_static("none"),
    );

    response
}
