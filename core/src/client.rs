//! Stateless request builder and response checker for the listing service.
//!
//! # Design
//! `ServiceClient` holds only the validated `Config` and carries no mutable
//! state between calls. `build_request` turns an endpoint and translated
//! `Params` into an `HttpRequest`; `parse_response` turns the host's
//! `HttpResponse` into the raw body or a `TransportError`. The host executes
//! the round-trip in between, keeping the core deterministic and free of I/O.

use crate::config::Config;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::parser::Params;

/// Synchronous, stateless client for the listing service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    config: Config,
}

impl ServiceClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Authenticated `GET` for `endpoint` (e.g. `objekt/list`).
    pub fn build_request(&self, endpoint: &str, params: &Params) -> HttpRequest {
        let mut url = format!("{}/{}", self.config.url(), endpoint.trim_start_matches('/'));
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query());
        }
        HttpRequest {
            url,
            headers: vec![(
                "authorization".to_string(),
                format!("Basic {}", self.config.credentials()),
            )],
        }
    }

    /// Return the body of a successful response.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` for 401/403, `RetrievalFailed` for any other
    /// non-2xx status.
    pub fn parse_response(&self, response: HttpResponse) -> Result<String, TransportError> {
        match response.status {
            200..=299 => Ok(response.body),
            401 | 403 => Err(TransportError::AuthenticationFailed),
            status => Err(TransportError::RetrievalFailed(format!(
                "HTTP {status}: {}",
                response.body
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    fn client() -> ServiceClient {
        ServiceClient::new(
            Config::new("user", "pass")
                .unwrap()
                .with_base_url("http://localhost:3000/rest"),
        )
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_request_without_params() {
        let req = client().build_request("objekt/list", &Params::new());
        assert_eq!(req.url, "http://localhost:3000/rest/v1/objekt/list");
        assert_eq!(
            req.headers,
            vec![("authorization".to_string(), "Basic dXNlcjpwYXNz".to_string())]
        );
    }

    #[test]
    fn build_request_appends_query() {
        let mut params = Params::new();
        params.insert("preis_von", Scalar::Int(100000));
        params.insert("culture", Scalar::from("de"));
        let req = client().build_request("/objekt/list", &params);
        assert_eq!(
            req.url,
            "http://localhost:3000/rest/v1/objekt/list?preis_von=100000&culture=de"
        );
    }

    #[test]
    fn parse_response_success() {
        assert_eq!(client().parse_response(response(200, "<xml/>")).unwrap(), "<xml/>");
    }

    #[test]
    fn parse_response_auth_failure() {
        for status in [401, 403] {
            let err = client().parse_response(response(status, "")).unwrap_err();
            assert_eq!(err, TransportError::AuthenticationFailed);
        }
    }

    #[test]
    fn parse_response_other_failure() {
        let err = client().parse_response(response(500, "internal error")).unwrap_err();
        assert_eq!(err, TransportError::RetrievalFailed("HTTP 500: internal error".to_string()));
    }
}
