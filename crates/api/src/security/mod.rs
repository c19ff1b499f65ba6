//! HTTP-level hardening applied to every response

mod headers;

pub use headers::security_headers_middleware;
