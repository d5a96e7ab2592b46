//! Synchronous client core for the justimmo realty service.
//!
//! # Overview
//! Callers describe a query in an English, typed vocabulary (`price_min`,
//! `ordertype = "asc"`, `filter.location = "Wien"`). The core validates that
//! request against a per-operation `Schema` and translates it through a
//! bidirectional `MappingTable` into the flat, German-keyed parameter set the
//! service expects (`preis_von`, `ordertype=ASC`, `plz=1010`). The network
//! round-trip stays with the host (host-does-IO pattern): `ServiceClient`
//! builds `HttpRequest` values and checks `HttpResponse` values, and
//! `HostTransport` wires both around a host-supplied executor.
//!
//! # Design
//! - `MappingTable`, `Schema` and `RealtyRequest` are built once, validated,
//!   and read-only afterwards; they are safe to share between threads.
//! - `OptionParser` is a pure function of table, schema and request except
//!   for `Resolver`s, which may read reference data through a `Cache`.
//! - Unknown options and values outside an enumeration are rejected before
//!   any request is built; there is no partial result.
//! - Collaborator failures go through an explicit per-operation
//!   `FailurePolicy` instead of being swallowed unconditionally.
//! - The core only emits `tracing` events and never installs a subscriber.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapping;
pub mod parser;
pub mod realty;
pub mod reference;
pub mod schema;
pub mod transport;
pub mod types;
pub mod value;

pub use cache::{Cache, MemoryCache, NullCache};
pub use client::ServiceClient;
pub use config::Config;
pub use error::{ClientError, ConfigError, MappingError, ParseError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use mapping::{Direction, MappingEntry, MappingGroup, MappingTable};
pub use parser::{OptionParser, Params};
pub use realty::{FailurePolicy, Operation, RealtyRequest};
pub use reference::{CachedReferenceData, ReferenceData};
pub use schema::{OptionKind, OptionSpec, Resolver, Schema, ValueType};
pub use transport::{HostTransport, Transport};
pub use types::{RealtyType, ZipCodeCity};
pub use value::{OptionValue, ParseRequest, Scalar};
