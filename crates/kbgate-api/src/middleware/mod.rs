//! HTTP middleware

pub mod cors;
pub mod security_headers;

pub use cors::cors_layer;
pub use security_headers::security_headers_middleware;
