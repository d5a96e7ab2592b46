//! Reference data read by the filter resolvers.
//!
//! # Design
//! Resolvers only see the `ReferenceData` trait. `CachedReferenceData` is the
//! stock implementation: it fetches the basic-data endpoints through a
//! `Transport`, keeps the raw body in an injected `Cache`, and decodes it on
//! every read so the cache stays a plain string store.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::{Cache, NullCache};
use crate::error::TransportError;
use crate::parser::Params;
use crate::realty::endpoint;
use crate::transport::Transport;
use crate::types::{RealtyType, ZipCodeCity};
use crate::value::Scalar;

/// Read-only collections consulted while parsing.
pub trait ReferenceData: Send + Sync {
    /// # Errors
    ///
    /// Transport failures, or `Decode` for a malformed body.
    fn list_types(&self) -> Result<Vec<RealtyType>, TransportError>;

    /// # Errors
    ///
    /// Transport failures, or `Decode` for a malformed body.
    fn list_zip_codes_and_cities(&self) -> Result<Vec<ZipCodeCity>, TransportError>;
}

const TYPES_KEY: &str = "reference/types";
const ZIP_CODES_KEY: &str = "reference/zip_codes_and_cities";

/// `ReferenceData` fetched from the service and kept in a cache.
pub struct CachedReferenceData {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn Cache>,
    ttl: Option<Duration>,
}

impl CachedReferenceData {
    /// Provider without caching.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_cache(transport, Arc::new(NullCache))
    }

    pub fn with_cache(transport: Arc<dyn Transport>, cache: Arc<dyn Cache>) -> Self {
        Self {
            transport,
            cache,
            ttl: None,
        }
    }

    /// Expire cached bodies after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        key: &str,
        endpoint: &str,
    ) -> Result<Vec<T>, TransportError> {
        if let Some(body) = self.cache.read(key) {
            debug!(key, "reference data served from cache");
            return decode(&body);
        }
        debug!(key, endpoint, "fetching reference data");
        let mut params = Params::new();
        params.insert("alle", Scalar::Int(0));
        let body = self.transport.perform(endpoint, &params)?;
        let decoded = decode(&body)?;
        self.cache.write(key, body, self.ttl);
        Ok(decoded)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))
}

impl ReferenceData for CachedReferenceData {
    fn list_types(&self) -> Result<Vec<RealtyType>, TransportError> {
        self.fetch(TYPES_KEY, endpoint::TYPES)
    }

    fn list_zip_codes_and_cities(&self) -> Result<Vec<ZipCodeCity>, TransportError> {
        self.fetch(ZIP_CODES_KEY, endpoint::ZIP_CODES_AND_CITIES)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::cache::MemoryCache;

    /// Serves canned bodies and records every call.
    #[derive(Default)]
    struct FakeTransport {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Transport for FakeTransport {
        fn perform(&self, path: &str, params: &Params) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(format!("{path}?{}", params.to_query()));
            if self.fail {
                return Err(TransportError::AuthenticationFailed);
            }
            Ok(match path {
                endpoint::TYPES => {
                    r#"[{"id":1,"name":"Wohnung"},{"id":2,"name":"Haus"}]"#.to_string()
                }
                endpoint::ZIP_CODES_AND_CITIES => {
                    r#"[{"zip_code":1010,"location":"Wien"}]"#.to_string()
                }
                _ => "not json".to_string(),
            })
        }
    }

    #[test]
    fn decodes_types() {
        let provider = CachedReferenceData::new(Arc::new(FakeTransport::default()));
        let types = provider.list_types().unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[1], RealtyType { id: 2, name: "Haus".to_string() });
    }

    #[test]
    fn requests_basic_data_without_all_flag() {
        let transport = Arc::new(FakeTransport::default());
        let provider = CachedReferenceData::new(transport.clone());
        provider.list_zip_codes_and_cities().unwrap();
        assert_eq!(*transport.calls.lock().unwrap(), vec!["objekt/plzsUndOrte?alle=0".to_string()]);
    }

    #[test]
    fn memory_cache_saves_second_fetch() {
        let transport = Arc::new(FakeTransport::default());
        let provider =
            CachedReferenceData::with_cache(transport.clone(), Arc::new(MemoryCache::new()));
        provider.list_types().unwrap();
        provider.list_types().unwrap();
        assert_eq!(transport.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn ttl_is_passed_to_the_cache() {
        let transport = Arc::new(FakeTransport::default());
        let cache = Arc::new(MemoryCache::new());
        let provider = CachedReferenceData::with_cache(transport.clone(), cache.clone())
            .with_ttl(Duration::ZERO);
        provider.list_types().unwrap();
        assert_eq!(cache.read(TYPES_KEY), None);
        provider.list_types().unwrap();
        assert_eq!(transport.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn null_cache_fetches_every_time() {
        let transport = Arc::new(FakeTransport::default());
        let provider = CachedReferenceData::new(transport.clone());
        provider.list_types().unwrap();
        provider.list_types().unwrap();
        assert_eq!(transport.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn transport_error_is_passed_on() {
        let transport = Arc::new(FakeTransport {
            fail: true,
            ..FakeTransport::default()
        });
        let provider = CachedReferenceData::new(transport);
        assert_eq!(provider.list_types().unwrap_err(), TransportError::AuthenticationFailed);
    }

    #[test]
    fn malformed_body_is_not_cached() {
        let transport = Arc::new(FakeTransport::default());
        let cache = Arc::new(MemoryCache::new());
        let provider = CachedReferenceData::with_cache(transport, cache.clone());
        assert!(matches!(
            provider.fetch::<RealtyType>("other", "objekt/laender"),
            Err(TransportError::Decode(_))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_cached_body_is_a_decode_error() {
        let cache = Arc::new(MemoryCache::new());
        cache.write(TYPES_KEY, "{".to_string(), None);
        let provider = CachedReferenceData::with_cache(Arc::new(FakeTransport::default()), cache);
        assert!(matches!(provider.list_types(), Err(TransportError::Decode(_))));
    }
}
