//! Option schemas of the realty operations.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::mapping::{MappingGroup, MappingTable};
use crate::reference::ReferenceData;
use crate::schema::Schema;

use super::resolvers::{LocationResolver, TypeResolver};

pub const ORDER_BY: [&str; 6] = [
    "price",
    "zip_code",
    "number",
    "created_at",
    "updated_at",
    "published_at",
];
pub const ORDER_TYPE: [&str; 2] = ["asc", "desc"];
pub const PICTURE_SIZES: [&str; 9] = [
    "small_unbranded",
    "small2_unbranded",
    "small3_unbranded",
    "medium_unbranded",
    "big_unbranded",
    "big2_unbranded",
    "medium",
    "big",
    "big2",
];

/// `list` and `ids`: paging, ordering and the `filter` group.
pub(super) fn list(
    table: &MappingTable,
    reference: &Arc<dyn ReferenceData>,
) -> Result<Schema, ConfigError> {
    let types = TypeResolver::new(reference.clone(), table)?;
    let locations = LocationResolver::new(reference.clone(), table)?;

    Schema::builder(MappingGroup::Params)
        .range_suffixes("_von", "_bis")
        .option("limit", |o| o.integer().require_mapping())
        .option("offset", |o| o.integer().require_mapping())
        .option("lang", |o| o.text().require_mapping())
        .option("orderby", |o| o.one_of(ORDER_BY))
        .option("ordertype", |o| o.one_of(ORDER_TYPE))
        .option("picturesize", |o| o.one_of(PICTURE_SIZES))
        .option("with_projects", |o| o.boolean().require_mapping())
        .group("filter", MappingGroup::Filter, |f| {
            f.option("price", |o| o.number().range())
                .option("price_per_sqm", |o| o.number().range())
                .option("type_id", |o| o.integer())
                .option("type", |o| o.text().resolver(types))
                .option("sub_type_id", |o| o.integer())
                .option("tag", |o| o.text())
                .option("zip_code", |o| o.integer().range().with_exact())
                .option("rooms", |o| o.number().range())
                .option("number", |o| o.range().with_exact())
                .option("area", |o| o.number().range())
                .option("living_area", |o| o.number().range())
                .option("floor_area", |o| o.number().range())
                .option("surface_area", |o| o.number().range())
                .option("keyword", |o| o.text())
                .option("country_id", |o| o.integer())
                .option("federal_state_id", |o| o.integer())
                .option("status_id", |o| o.integer())
                .option("project_id", |o| o.integer())
                .option("system_type", |o| o.text())
                .option("parent_id", |o| o.integer())
                .option("rent", |o| o.boolean())
                .option("purcase", |o| o.boolean())
                .option("updated_at", |o| o.date().range())
                .option("location", |o| o.text().resolver(locations))
        })
        .build()
}

pub(super) fn detail() -> Result<Schema, ConfigError> {
    Schema::builder(MappingGroup::Params)
        .option("id", |o| o.integer().require_mapping())
        .option("lang", |o| o.text().require_mapping())
        .option("all", |o| o.boolean())
        .build()
}

pub(super) fn inquiry() -> Result<Schema, ConfigError> {
    Schema::builder(MappingGroup::Params)
        .option("id", |o| o.integer().require_mapping())
        .option("salutation_id", |o| o.integer())
        .option("title", |o| o.text())
        .option("first_name", |o| o.text())
        .option("last_name", |o| o.text())
        .option("email", |o| o.text())
        .option("phone", |o| o.text())
        .option("message", |o| o.text())
        .option("street", |o| o.text())
        .add("zip_code")
        .option("location", |o| o.text())
        .add("country")
        .build()
}

/// Shared by the basic-data endpoints (categories, types, countries, ...).
pub(super) fn basic_data() -> Result<Schema, ConfigError> {
    Schema::builder(MappingGroup::Params)
        .option("all", |o| o.boolean().require_mapping())
        .add("country")
        .add("federal_state")
        .build()
}
