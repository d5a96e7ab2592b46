//! The transport seam between the façade and the network.
//!
//! # Design
//! The façade only needs `perform(endpoint, params) -> body`. `HostTransport`
//! implements that on top of `ServiceClient` plus a host-supplied executor
//! closure, so the core still never opens a socket itself.

use crate::client::ServiceClient;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::parser::Params;

/// Sends translated parameters to one endpoint and returns the raw body.
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// `AuthenticationFailed` when the service rejects the credentials,
    /// `RetrievalFailed` for any other failure.
    fn perform(&self, endpoint: &str, params: &Params) -> Result<String, TransportError>;
}

/// `Transport` backed by a host-executed HTTP round-trip.
///
/// `execute` receives the built request and returns the response, or an
/// error message if no response could be obtained at all.
pub struct HostTransport<E> {
    client: ServiceClient,
    execute: E,
}

impl<E> HostTransport<E>
where
    E: Fn(HttpRequest) -> Result<HttpResponse, String> + Send + Sync,
{
    pub fn new(client: ServiceClient, execute: E) -> Self {
        Self { client, execute }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }
}

impl<E> Transport for HostTransport<E>
where
    E: Fn(HttpRequest) -> Result<HttpResponse, String> + Send + Sync,
{
    fn perform(&self, endpoint: &str, params: &Params) -> Result<String, TransportError> {
        let request = self.client.build_request(endpoint, params);
        let response = (self.execute)(request).map_err(TransportError::RetrievalFailed)?;
        self.client.parse_response(response)
    }
}
