//! Filter options that need a reference-data lookup.

use std::sync::Arc;

use tracing::debug;

use crate::error::{ConfigError, TransportError};
use crate::mapping::{MappingGroup, MappingTable};
use crate::reference::ReferenceData;
use crate::schema::{Resolved, Resolver};
use crate::value::Scalar;

fn external_name(table: &MappingTable, key: &str) -> Result<String, ConfigError> {
    table
        .translate(MappingGroup::Filter, key)
        .map(str::to_string)
        .map_err(|_| ConfigError::MissingMapping {
            group: MappingGroup::Filter,
            key: key.to_string(),
        })
}

fn text_of(value: &Scalar) -> String {
    value.as_text().map_or_else(|| value.to_wire(), str::to_string)
}

/// Realty type names (`"Wohnung"`, `["Haus", "Büro"]`) to a list of type ids.
pub struct TypeResolver {
    reference: Arc<dyn ReferenceData>,
    external_key: String,
}

impl TypeResolver {
    /// # Errors
    ///
    /// `MissingMapping` when the table has no filter entry for `type_id`.
    pub fn new(
        reference: Arc<dyn ReferenceData>,
        table: &MappingTable,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            reference,
            external_key: external_name(table, "type_id")?,
        })
    }
}

impl Resolver for TypeResolver {
    fn resolve(&self, key: &str, value: &Scalar) -> Result<Resolved, TransportError> {
        let names: Vec<String> = value.elements().into_iter().map(text_of).collect();
        let ids: Vec<Scalar> = self
            .reference
            .list_types()?
            .into_iter()
            .filter(|t| names.contains(&t.name))
            .map(|t| Scalar::Int(t.id))
            .collect();
        if ids.is_empty() {
            debug!(key, ?names, "no realty type matches");
            return Ok(Vec::new());
        }
        Ok(vec![(self.external_key.clone(), Scalar::List(ids))])
    }
}

/// Place name to the postal code of its first exact match.
pub struct LocationResolver {
    reference: Arc<dyn ReferenceData>,
    external_key: String,
}

impl LocationResolver {
    /// # Errors
    ///
    /// `MissingMapping` when the table has no filter entry for `zip_code`.
    pub fn new(
        reference: Arc<dyn ReferenceData>,
        table: &MappingTable,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            reference,
            external_key: external_name(table, "zip_code")?,
        })
    }
}

impl Resolver for LocationResolver {
    fn resolve(&self, _key: &str, value: &Scalar) -> Result<Resolved, TransportError> {
        let location = text_of(value);
        let found = self
            .reference
            .list_zip_codes_and_cities()?
            .into_iter()
            .find(|city| city.location == location);
        Ok(found
            .map(|city| vec![(self.external_key.clone(), Scalar::Int(i64::from(city.zip_code)))])
            .unwrap_or_default())
    }
}
