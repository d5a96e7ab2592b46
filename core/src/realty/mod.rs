//! Request façade for the realty (`objekt/*`) endpoints.
//!
//! # Design
//! `RealtyRequest` owns the mapping table and one schema per operation, all
//! built and validated once in `new`. Every operation parses its input,
//! hands the flat parameters to the `Transport`, and returns the raw body.
//! Collaborator failures are handled by a per-operation `FailurePolicy`;
//! rejected input and schema defects always reach the caller.

mod mapping;
mod resolvers;
mod schemas;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, warn};

use crate::cache::Cache;
use crate::error::{ClientError, ConfigError, ParseError};
use crate::mapping::MappingTable;
use crate::parser::{OptionParser, Params};
use crate::reference::{CachedReferenceData, ReferenceData};
use crate::schema::Schema;
use crate::transport::Transport;
use crate::value::{OptionValue, ParseRequest, Scalar};

pub use mapping::mapping_table;
pub use resolvers::{LocationResolver, TypeResolver};
pub use schemas::{ORDER_BY, ORDER_TYPE, PICTURE_SIZES};

/// Endpoint paths relative to the versioned API root.
pub mod endpoint {
    pub const LIST: &str = "objekt/list";
    pub const IDS: &str = "objekt/ids";
    pub const DETAIL: &str = "objekt/detail";
    pub const INQUIRY: &str = "objekt/anfrage";
    pub const CATEGORIES: &str = "objekt/kategorien";
    pub const TYPES: &str = "objekt/objektarten";
    pub const COUNTRIES: &str = "objekt/laender";
    pub const FEDERAL_STATES: &str = "objekt/bundeslaender";
    pub const REGIONS: &str = "objekt/regionen";
    pub const ZIP_CODES_AND_CITIES: &str = "objekt/plzsUndOrte";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Ids,
    Detail,
    Inquiry,
    Categories,
    Types,
    Countries,
    FederalStates,
    Regions,
    ZipCodesAndCities,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::List,
        Operation::Ids,
        Operation::Detail,
        Operation::Inquiry,
        Operation::Categories,
        Operation::Types,
        Operation::Countries,
        Operation::FederalStates,
        Operation::Regions,
        Operation::ZipCodesAndCities,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::List => endpoint::LIST,
            Operation::Ids => endpoint::IDS,
            Operation::Detail => endpoint::DETAIL,
            Operation::Inquiry => endpoint::INQUIRY,
            Operation::Categories => endpoint::CATEGORIES,
            Operation::Types => endpoint::TYPES,
            Operation::Countries => endpoint::COUNTRIES,
            Operation::FederalStates => endpoint::FEDERAL_STATES,
            Operation::Regions => endpoint::REGIONS,
            Operation::ZipCodesAndCities => endpoint::ZIP_CODES_AND_CITIES,
        }
    }

    /// Operations with side effects on the service. Their failures are never
    /// swallowed.
    pub fn is_write(self) -> bool {
        matches!(self, Operation::Inquiry)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Ids => "ids",
            Operation::Detail => "detail",
            Operation::Inquiry => "inquiry",
            Operation::Categories => "categories",
            Operation::Types => "types",
            Operation::Countries => "countries",
            Operation::FederalStates => "federal_states",
            Operation::Regions => "regions",
            Operation::ZipCodesAndCities => "zip_codes_and_cities",
        };
        f.write_str(name)
    }
}

/// What an operation returns when a collaborator fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and return an empty body (or an empty id list).
    #[default]
    EmptyResult,
    /// Return the error to the caller.
    Propagate,
}

/// Façade over the realty endpoints.
pub struct RealtyRequest {
    transport: Arc<dyn Transport>,
    table: MappingTable,
    list: Schema,
    detail: Schema,
    inquiry: Schema,
    basic_data: Schema,
    policies: HashMap<Operation, FailurePolicy>,
}

impl RealtyRequest {
    /// # Errors
    ///
    /// `ConfigError` if the built-in mapping table or a schema is malformed.
    pub fn new(
        transport: Arc<dyn Transport>,
        reference: Arc<dyn ReferenceData>,
    ) -> Result<Self, ConfigError> {
        let table = mapping_table()?;
        Ok(Self {
            list: schemas::list(&table, &reference)?,
            detail: schemas::detail()?,
            inquiry: schemas::inquiry()?,
            basic_data: schemas::basic_data()?,
            transport,
            table,
            policies: HashMap::new(),
        })
    }

    /// Reference data is read through the same transport and kept in `cache`.
    ///
    /// # Errors
    ///
    /// Same as `new`.
    pub fn with_cache(
        transport: Arc<dyn Transport>,
        cache: Arc<dyn Cache>,
    ) -> Result<Self, ConfigError> {
        let reference = Arc::new(CachedReferenceData::with_cache(transport.clone(), cache));
        Self::new(transport, reference)
    }

    /// Write operations always propagate; asking otherwise is ignored.
    pub fn with_failure_policy(mut self, operation: Operation, policy: FailurePolicy) -> Self {
        if operation.is_write() && policy == FailurePolicy::EmptyResult {
            warn!(%operation, "write operations always propagate failures");
            return self;
        }
        self.policies.insert(operation, policy);
        self
    }

    pub fn failure_policy(&self, operation: Operation) -> FailurePolicy {
        if operation.is_write() {
            return FailurePolicy::Propagate;
        }
        self.policies.get(&operation).copied().unwrap_or_default()
    }

    pub fn mapping(&self) -> &MappingTable {
        &self.table
    }

    pub fn schema(&self, operation: Operation) -> &Schema {
        match operation {
            Operation::List | Operation::Ids => &self.list,
            Operation::Detail => &self.detail,
            Operation::Inquiry => &self.inquiry,
            Operation::Categories
            | Operation::Types
            | Operation::Countries
            | Operation::FederalStates
            | Operation::Regions
            | Operation::ZipCodesAndCities => &self.basic_data,
        }
    }

    /// Translate `request` for `operation` without sending it.
    ///
    /// # Errors
    ///
    /// See `OptionParser::parse`.
    pub fn parse(
        &self,
        operation: Operation,
        request: &ParseRequest,
    ) -> Result<Params, ParseError> {
        OptionParser::new(&self.table).parse(self.schema(operation), request)
    }

    /// Search listings. `request` holds paging, ordering and a `filter` group.
    ///
    /// # Errors
    ///
    /// Rejected options always; collaborator failures only under
    /// `FailurePolicy::Propagate`.
    pub fn list(&self, request: &ParseRequest) -> Result<String, ClientError> {
        self.run(Operation::List, || self.get(Operation::List, request))
    }

    /// Ids of the listings matching `request`.
    ///
    /// # Errors
    ///
    /// As `list`, plus `Decode` when the body is not a JSON array of ids.
    /// Ids may be numbers or numeric strings.
    pub fn ids(&self, request: &ParseRequest) -> Result<Vec<u64>, ClientError> {
        self.run(Operation::Ids, || {
            let body = self.get(Operation::Ids, request)?;
            decode_ids(&body)
        })
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn detail(&self, id: u64, lang: Option<&str>) -> Result<String, ClientError> {
        self.run(Operation::Detail, || {
            let request = ParseRequest::new().set("id", id_value(id)?).set_opt("lang", lang);
            self.get(Operation::Detail, &request)
        })
    }

    /// Submit a contact request for listing `id`. Failures always propagate.
    ///
    /// # Errors
    ///
    /// Rejected options and every collaborator failure.
    pub fn inquiry(&self, id: u64, request: &ParseRequest) -> Result<String, ClientError> {
        self.run(Operation::Inquiry, || {
            let mut request = request.clone();
            request.insert("id", OptionValue::Scalar(id_value(id)?));
            self.get(Operation::Inquiry, &request)
        })
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn categories(&self, all: bool) -> Result<String, ClientError> {
        self.basic(Operation::Categories, ParseRequest::new().set("all", all))
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn types(&self, all: bool) -> Result<String, ClientError> {
        self.basic(Operation::Types, ParseRequest::new().set("all", all))
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn countries(&self, all: bool) -> Result<String, ClientError> {
        self.basic(Operation::Countries, ParseRequest::new().set("all", all))
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn federal_states(&self, country: &str, all: bool) -> Result<String, ClientError> {
        let request = ParseRequest::new().set("country", country).set("all", all);
        self.basic(Operation::FederalStates, request)
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn regions(
        &self,
        country: Option<&str>,
        federal_state: Option<i64>,
        all: bool,
    ) -> Result<String, ClientError> {
        self.basic(Operation::Regions, area_request(country, federal_state, all))
    }

    /// # Errors
    ///
    /// As `list`.
    pub fn zip_codes_and_cities(
        &self,
        country: Option<&str>,
        federal_state: Option<i64>,
        all: bool,
    ) -> Result<String, ClientError> {
        self.basic(Operation::ZipCodesAndCities, area_request(country, federal_state, all))
    }

    fn basic(&self, operation: Operation, request: ParseRequest) -> Result<String, ClientError> {
        self.run(operation, || self.get(operation, &request))
    }

    fn get(&self, operation: Operation, request: &ParseRequest) -> Result<String, ClientError> {
        let params = self.parse(operation, request)?;
        Ok(self.transport.perform(operation.endpoint(), &params)?)
    }

    fn run<T: Default>(
        &self,
        operation: Operation,
        call: impl FnOnce() -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        match call() {
            Err(err)
                if err.is_collaborator_failure()
                    && self.failure_policy(operation) == FailurePolicy::EmptyResult =>
            {
                error!(%operation, error = %err, "request failed, returning empty result");
                Ok(T::default())
            }
            result => result,
        }
    }
}

fn id_value(id: u64) -> Result<Scalar, ParseError> {
    i64::try_from(id).map(Scalar::Int).map_err(|_| ParseError::InvalidValue {
        key: "id".to_string(),
        value: id.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn decode_ids(body: &str) -> Result<Vec<u64>, ClientError> {
    let raw: Vec<RawId> =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    raw.into_iter()
        .map(|id| match id {
            RawId::Number(id) => Ok(id),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ClientError::Decode(format!("invalid id '{text}'"))),
        })
        .collect()
}

fn area_request(country: Option<&str>, federal_state: Option<i64>, all: bool) -> ParseRequest {
    ParseRequest::new()
        .set_opt("country", country)
        .set_opt("federal_state", federal_state)
        .set("all", all)
}
