//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and checks `HttpResponse` values without
//! ever touching the network; the host executes the actual round-trip with
//! whatever client it already uses. Every call to the listing service is a
//! `GET` with query parameters, so no method or body is modelled.

/// An HTTP `GET` request described as plain data.
///
/// Built by `ServiceClient::build_request`. The host executes it and returns
/// the corresponding `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including the encoded query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
