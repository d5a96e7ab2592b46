//! Declarative description of the options one operation accepts.
//!
//! # Design
//! A `Schema` is built once with `SchemaBuilder`, validated, and then only
//! read. Each `OptionSpec` says how one internal key is checked and renamed:
//! its value kind, an optional external name override, whether it is a range
//! (`<key>_min` / `<key>_max`), and an optional `Resolver` that replaces the
//! default translation entirely. Nested groups (the list `filter`) are child
//! schemas with their own mapping group.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, TransportError};
use crate::mapping::MappingGroup;
use crate::value::Scalar;

/// Caller-side range suffixes, index 0 and 1 of `RangeSuffixes`.
pub const RANGE_INPUT_SUFFIXES: [&str; 2] = ["_min", "_max"];

/// Pairs produced by a resolver, already in external vocabulary.
pub type Resolved = Vec<(String, Scalar)>;

/// Replaces the default name/value translation of one option.
///
/// May return zero pairs (the term is dropped), one, or several. Errors are
/// reference-data failures and abort the parse.
pub trait Resolver: Send + Sync {
    fn resolve(&self, key: &str, value: &Scalar) -> Result<Resolved, TransportError>;
}

impl<F> Resolver for F
where
    F: Fn(&str, &Scalar) -> Result<Resolved, TransportError> + Send + Sync,
{
    fn resolve(&self, key: &str, value: &Scalar) -> Result<Resolved, TransportError> {
        self(key, value)
    }
}

/// Expected shape of a plain option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Any,
    Integer,
    Number,
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Plain(ValueType),
    /// Truthy/falsy input, sent as `1` / `0`.
    Boolean,
    /// Only the listed values (compared in wire form) are accepted.
    Enumerated(Vec<String>),
}

/// External suffixes for the lower and upper bound of a range option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSuffixes {
    min: String,
    max: String,
}

impl RangeSuffixes {
    pub fn new(min: &str, max: &str) -> Self {
        Self {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Suffix for bound `index` (0 = lower, 1 = upper).
    pub fn get(&self, index: usize) -> &str {
        if index == 0 {
            &self.min
        } else {
            &self.max
        }
    }
}

impl Default for RangeSuffixes {
    fn default() -> Self {
        Self::new(RANGE_INPUT_SUFFIXES[0], RANGE_INPUT_SUFFIXES[1])
    }
}

/// One recognized option.
#[derive(Clone)]
pub struct OptionSpec {
    key: String,
    external_key: Option<String>,
    kind: OptionKind,
    range: Option<RangeSuffixes>,
    exact: bool,
    require_mapping: bool,
    resolver: Option<Arc<dyn Resolver>>,
}

impl OptionSpec {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Explicit external name, overriding the mapping table.
    pub fn external_key(&self) -> Option<&str> {
        self.external_key.as_deref()
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn is_range(&self) -> bool {
        self.range.is_some()
    }

    pub fn range_suffixes(&self) -> Option<&RangeSuffixes> {
        self.range.as_ref()
    }

    /// Whether the bare key is accepted. Always true for non-range options.
    pub fn accepts_exact(&self) -> bool {
        self.range.is_none() || self.exact
    }

    pub fn requires_mapping(&self) -> bool {
        self.require_mapping
    }

    pub fn resolver(&self) -> Option<&dyn Resolver> {
        self.resolver.as_deref()
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("key", &self.key)
            .field("external_key", &self.external_key)
            .field("kind", &self.kind)
            .field("range", &self.range)
            .field("exact", &self.exact)
            .field("require_mapping", &self.require_mapping)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Configures a single `OptionSpec`; handed to `SchemaBuilder::option`.
pub struct OptionBuilder {
    spec: OptionSpec,
    default_suffixes: RangeSuffixes,
}

impl OptionBuilder {
    fn new(key: &str, default_suffixes: RangeSuffixes) -> Self {
        Self {
            spec: OptionSpec {
                key: key.to_string(),
                external_key: None,
                kind: OptionKind::Plain(ValueType::Any),
                range: None,
                exact: false,
                require_mapping: false,
                resolver: None,
            },
            default_suffixes,
        }
    }

    /// Send the option under `name` instead of its mapped name.
    pub fn external(mut self, name: &str) -> Self {
        self.spec.external_key = Some(name.to_string());
        self
    }

    pub fn integer(self) -> Self {
        self.kind(OptionKind::Plain(ValueType::Integer))
    }

    pub fn number(self) -> Self {
        self.kind(OptionKind::Plain(ValueType::Number))
    }

    pub fn text(self) -> Self {
        self.kind(OptionKind::Plain(ValueType::Text))
    }

    pub fn date(self) -> Self {
        self.kind(OptionKind::Plain(ValueType::Date))
    }

    pub fn boolean(self) -> Self {
        self.kind(OptionKind::Boolean)
    }

    pub fn one_of<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind(OptionKind::Enumerated(values.into_iter().map(Into::into).collect()))
    }

    pub fn kind(mut self, kind: OptionKind) -> Self {
        self.spec.kind = kind;
        self
    }

    /// Accept `<key>_min` / `<key>_max` using the schema's suffixes.
    pub fn range(mut self) -> Self {
        self.spec.range = Some(self.default_suffixes.clone());
        self
    }

    pub fn range_with(mut self, min: &str, max: &str) -> Self {
        self.spec.range = Some(RangeSuffixes::new(min, max));
        self
    }

    /// For range options: also accept the bare key as an exact value.
    pub fn with_exact(mut self) -> Self {
        self.spec.exact = true;
        self
    }

    /// Fail the parse instead of sending the key untranslated when the
    /// mapping table has no entry for it.
    pub fn require_mapping(mut self) -> Self {
        self.spec.require_mapping = true;
        self
    }

    pub fn resolver(self, resolver: impl Resolver + 'static) -> Self {
        self.shared_resolver(Arc::new(resolver))
    }

    pub fn shared_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.spec.resolver = Some(resolver);
        self
    }
}

/// Options of one operation plus nested option groups.
#[derive(Debug, Clone)]
pub struct Schema {
    group: MappingGroup,
    options: Vec<OptionSpec>,
    groups: Vec<(String, Schema)>,
}

impl Schema {
    pub fn builder(group: MappingGroup) -> SchemaBuilder {
        SchemaBuilder::new(group, RangeSuffixes::default())
    }

    /// Mapping group used to translate this schema's keys.
    pub fn group(&self) -> MappingGroup {
        self.group
    }

    pub fn option(&self, key: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter()
    }

    pub fn nested(&self, name: &str) -> Option<&Schema> {
        self.groups.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn nested_groups(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.groups.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Find the spec for a caller key, detecting `_min` / `_max` range input.
    /// Returns the spec and, for range input, the bound index.
    pub fn lookup(&self, key: &str) -> Option<(&OptionSpec, Option<usize>)> {
        for (index, suffix) in RANGE_INPUT_SUFFIXES.iter().enumerate() {
            if let Some(base) = key.strip_suffix(suffix) {
                if let Some(spec) = self.option(base).filter(|s| s.is_range()) {
                    return Some((spec, Some(index)));
                }
            }
        }
        self.option(key)
            .filter(|s| s.accepts_exact())
            .map(|spec| (spec, None))
    }
}

/// Registers options and groups, then validates them into a `Schema`.
pub struct SchemaBuilder {
    group: MappingGroup,
    range_suffixes: RangeSuffixes,
    options: Vec<OptionSpec>,
    groups: Vec<(String, SchemaBuilder)>,
}

impl SchemaBuilder {
    fn new(group: MappingGroup, range_suffixes: RangeSuffixes) -> Self {
        Self {
            group,
            range_suffixes,
            options: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// External suffixes used by later `range()` options in this schema and
    /// groups opened after this call.
    pub fn range_suffixes(mut self, min: &str, max: &str) -> Self {
        self.range_suffixes = RangeSuffixes::new(min, max);
        self
    }

    /// Register a plain option accepting any value.
    pub fn add(self, key: &str) -> Self {
        self.option(key, |o| o)
    }

    pub fn option(
        mut self,
        key: &str,
        configure: impl FnOnce(OptionBuilder) -> OptionBuilder,
    ) -> Self {
        let builder = configure(OptionBuilder::new(key, self.range_suffixes.clone()));
        self.options.push(builder.spec);
        self
    }

    /// Open a nested group `name` whose keys translate through `group`.
    pub fn group(
        mut self,
        name: &str,
        group: MappingGroup,
        configure: impl FnOnce(SchemaBuilder) -> SchemaBuilder,
    ) -> Self {
        let nested = configure(SchemaBuilder::new(group, self.range_suffixes.clone()));
        self.groups.push((name.to_string(), nested));
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError` for duplicate or ambiguous keys, enumerations
    /// without values, and empty range suffixes.
    pub fn build(self) -> Result<Schema, ConfigError> {
        let mut seen: Vec<&str> = Vec::new();
        let names = self
            .options
            .iter()
            .map(|o| o.key.as_str())
            .chain(self.groups.iter().map(|(n, _)| n.as_str()));
        for name in names {
            if seen.contains(&name) {
                return Err(ConfigError::DuplicateOption(name.to_string()));
            }
            seen.push(name);
        }

        for spec in &self.options {
            if matches!(&spec.kind, OptionKind::Enumerated(values) if values.is_empty()) {
                return Err(ConfigError::EmptyEnumeration(spec.key.clone()));
            }
            if let Some(range) = &spec.range {
                if range.min.is_empty() || range.max.is_empty() || range.min == range.max {
                    return Err(ConfigError::InvalidRangeSuffix(spec.key.clone()));
                }
                for suffix in RANGE_INPUT_SUFFIXES {
                    let shadowed = format!("{}{suffix}", spec.key);
                    if seen.contains(&shadowed.as_str()) {
                        return Err(ConfigError::DuplicateOption(shadowed));
                    }
                }
            }
        }

        let groups = self
            .groups
            .into_iter()
            .map(|(name, builder)| builder.build().map(|schema| (name, schema)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Schema {
            group: self.group,
            options: self.options,
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_schema() -> Schema {
        Schema::builder(MappingGroup::Params)
            .range_suffixes("_von", "_bis")
            .option("limit", |o| o.integer())
            .option("ordertype", |o| o.one_of(["asc", "desc"]))
            .group("filter", MappingGroup::Filter, |f| {
                f.option("price", |o| o.range())
                    .option("zip_code", |o| o.range().with_exact())
                    .option("rent", |o| o.boolean())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn nested_group_inherits_suffixes() {
        let schema = list_schema();
        let filter = schema.nested("filter").unwrap();
        assert_eq!(filter.group(), MappingGroup::Filter);
        let price = filter.option("price").unwrap();
        assert_eq!(price.range_suffixes(), Some(&RangeSuffixes::new("_von", "_bis")));
    }

    #[test]
    fn lookup_detects_range_input() {
        let schema = list_schema();
        let filter = schema.nested("filter").unwrap();
        let (spec, bound) = filter.lookup("price_max").unwrap();
        assert_eq!(spec.key(), "price");
        assert_eq!(bound, Some(1));
    }

    #[test]
    fn range_only_option_rejects_bare_key() {
        let schema = list_schema();
        let filter = schema.nested("filter").unwrap();
        assert!(filter.lookup("price").is_none());
        assert_eq!(filter.lookup("zip_code").map(|(s, b)| (s.key(), b)), Some(("zip_code", None)));
    }

    #[test]
    fn suffix_on_non_range_option_is_unknown() {
        let schema = list_schema();
        assert!(schema.lookup("limit_min").is_none());
    }

    #[test]
    fn order_of_registration_is_kept() {
        let schema = list_schema();
        let keys: Vec<&str> = schema.options().map(OptionSpec::key).collect();
        assert_eq!(keys, vec!["limit", "ordertype"]);
    }

    #[test]
    fn duplicate_option_is_rejected() {
        let result = Schema::builder(MappingGroup::Params).add("limit").add("limit").build();
        assert!(matches!(result, Err(ConfigError::DuplicateOption(k)) if k == "limit"));
    }

    #[test]
    fn group_name_clashing_with_option_is_rejected() {
        let result = Schema::builder(MappingGroup::Params)
            .add("filter")
            .group("filter", MappingGroup::Filter, |f| f)
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateOption(_))));
    }

    #[test]
    fn empty_enumeration_is_rejected() {
        let result = Schema::builder(MappingGroup::Params)
            .option("ordertype", |o| o.one_of(Vec::<String>::new()))
            .build();
        assert!(matches!(result, Err(ConfigError::EmptyEnumeration(_))));
    }

    #[test]
    fn shadowing_range_bound_is_rejected() {
        let result = Schema::builder(MappingGroup::Filter)
            .option("price", |o| o.range())
            .add("price_min")
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateOption(k)) if k == "price_min"));
    }

    #[test]
    fn empty_range_suffix_is_rejected() {
        let result = Schema::builder(MappingGroup::Filter)
            .option("price", |o| o.range_with("", "_bis"))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidRangeSuffix(_))));
    }

    #[test]
    fn closures_are_resolvers() {
        let schema = Schema::builder(MappingGroup::Filter)
            .option("location", |o| {
                o.resolver(|_: &str, _: &Scalar| -> Result<Resolved, TransportError> {
                    Ok(Vec::new())
                })
            })
            .build()
            .unwrap();
        let spec = schema.option("location").unwrap();
        assert!(spec.resolver().is_some());
        assert!(format!("{spec:?}").contains("resolver: true"));
    }
}
