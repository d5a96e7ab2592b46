//! Validates a `ParseRequest` against a `Schema` and translates it into the
//! flat external parameter set the service expects.
//!
//! # Design
//! The parser is a pure function of `(table, schema, request)` except for
//! resolvers, which may read reference data. Every key must match an option
//! of the active schema, so an unknown key aborts the whole parse rather than
//! leaking through. Nested groups are flattened into the same namespace; only
//! one level of nesting exists on the caller side and none on the wire.
//! Produced keys are tracked by their source key so two inputs that land on
//! the same wire key never overwrite each other. The same option given twice
//! under different spellings is rejected as an invalid option; distinct
//! options or resolvers meeting on one wire key are reported as a defect.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::ParseError;
use crate::mapping::{Direction, MappingGroup, MappingTable};
use crate::schema::{OptionKind, OptionSpec, Schema, ValueType};
use crate::value::{OptionValue, ParseRequest, Scalar, DATE_FORMAT, DATE_TIME_FORMAT};

/// Translated parameters, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pairs: Vec<(String, Scalar)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: &str, value: Scalar) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL query string. Lists become repeated `key[]=value` pairs.
    pub fn to_query(&self) -> String {
        let mut parts = Vec::with_capacity(self.pairs.len());
        for (key, value) in &self.pairs {
            let key = urlencoding::encode(key);
            match value {
                Scalar::List(items) => {
                    for item in items {
                        parts.push(format!("{key}[]={}", urlencoding::encode(&item.to_wire())));
                    }
                }
                other => parts.push(format!("{key}={}", urlencoding::encode(&other.to_wire()))),
            }
        }
        parts.join("&")
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.pairs
                .iter()
                .map(|(k, v)| {
                    let value = serde_json::to_value(v).unwrap_or(serde_json::Value::Null);
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The option a produced key came from: schema group, option key and range
/// bound. Resolver output carries no origin.
type Origin = (MappingGroup, String, Option<usize>);

#[derive(Default)]
struct Output {
    params: Params,
    sources: HashMap<String, (String, Option<Origin>)>,
}

impl Output {
    fn insert(
        &mut self,
        key: String,
        value: Scalar,
        source: &str,
        origin: Option<Origin>,
    ) -> Result<(), ParseError> {
        if let Some((first, first_origin)) = self.sources.get(&key) {
            if first != source {
                // One option spelled two ways is a caller mistake.
                if origin.is_some() && *first_origin == origin {
                    return Err(ParseError::InvalidOption(source.to_string()));
                }
                return Err(ParseError::KeyCollision {
                    first: first.clone(),
                    second: source.to_string(),
                    key,
                });
            }
        }
        self.params.insert(&key, value);
        self.sources.insert(key, (source.to_string(), origin));
        Ok(())
    }
}

/// Runs schemas against the mapping table.
#[derive(Debug, Clone, Copy)]
pub struct OptionParser<'a> {
    table: &'a MappingTable,
}

impl<'a> OptionParser<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self { table }
    }

    /// Validate and translate `request` against `schema`.
    ///
    /// # Errors
    ///
    /// `InvalidOption` for keys the schema does not know or options given
    /// under two spellings, `InvalidValue` for
    /// values outside an option's type or enumeration, `KeyCollision` /
    /// `MissingMapping` for schema defects, and `Reference` when a resolver's
    /// reference data cannot be read. No partial result is returned.
    pub fn parse(&self, schema: &Schema, request: &ParseRequest) -> Result<Params, ParseError> {
        let mut out = Output::default();
        self.parse_into(schema, request, true, &mut out)?;
        Ok(out.params)
    }

    fn parse_into(
        &self,
        schema: &Schema,
        request: &ParseRequest,
        allow_groups: bool,
        out: &mut Output,
    ) -> Result<(), ParseError> {
        for (key, value) in request.iter() {
            match value {
                OptionValue::Group(nested) => {
                    let child = schema
                        .nested(key)
                        .filter(|_| allow_groups)
                        .ok_or_else(|| ParseError::InvalidOption(key.to_string()))?;
                    self.parse_into(child, nested, false, out)?;
                }
                OptionValue::Scalar(value) => self.parse_option(schema, key, value, out)?,
            }
        }
        Ok(())
    }

    fn parse_option(
        &self,
        schema: &Schema,
        key: &str,
        value: &Scalar,
        out: &mut Output,
    ) -> Result<(), ParseError> {
        let (spec, bound) = self
            .find_spec(schema, key)
            .ok_or_else(|| ParseError::InvalidOption(key.to_string()))?;
        let value = coerce(spec, key, value)?;

        if let Some(resolver) = spec.resolver() {
            let pairs = resolver.resolve(key, &value)?;
            if pairs.is_empty() {
                debug!(key, value = %value, "resolver found no match, dropping term");
            }
            for (name, resolved) in pairs {
                out.insert(name, resolved, key, None)?;
            }
            return Ok(());
        }

        let group = schema.group();
        let mut name = self.external_base(group, spec)?;
        if let (Some(index), Some(suffixes)) = (bound, spec.range_suffixes()) {
            name.push_str(suffixes.get(index));
        }
        let value = self.translate_value(group, spec.key(), value);
        let origin = (group, spec.key().to_string(), bound);
        out.insert(name, value, key, Some(origin))
    }

    fn find_spec<'s>(
        &self,
        schema: &'s Schema,
        key: &str,
    ) -> Option<(&'s OptionSpec, Option<usize>)> {
        schema.lookup(key).or_else(|| self.find_by_external(schema, key))
    }

    /// Accept keys the caller already wrote in the service's vocabulary.
    fn find_by_external<'s>(
        &self,
        schema: &'s Schema,
        key: &str,
    ) -> Option<(&'s OptionSpec, Option<usize>)> {
        if let Ok(internal) = self.table.reverse(schema.group(), key) {
            if let Some(spec) = schema.option(internal).filter(|s| s.accepts_exact()) {
                return Some((spec, None));
            }
        }
        schema.options().find_map(|spec| {
            let base = spec
                .external_key()
                .or_else(|| self.table.translate(schema.group(), spec.key()).ok())?;
            if base == key && spec.accepts_exact() {
                return Some((spec, None));
            }
            let suffixes = spec.range_suffixes()?;
            (0..2)
                .find(|&i| key.strip_suffix(suffixes.get(i)) == Some(base))
                .map(|i| (spec, Some(i)))
        })
    }

    fn external_base(&self, group: MappingGroup, spec: &OptionSpec) -> Result<String, ParseError> {
        if let Some(name) = spec.external_key() {
            return Ok(name.to_string());
        }
        match self.table.translate(group, spec.key()) {
            Ok(name) => Ok(name.to_string()),
            Err(_) if spec.requires_mapping() => Err(ParseError::MissingMapping {
                group,
                key: spec.key().to_string(),
            }),
            Err(_) => {
                debug!(key = spec.key(), %group, "no mapping entry, sending key unchanged");
                Ok(spec.key().to_string())
            }
        }
    }

    fn translate_value(&self, group: MappingGroup, key: &str, value: Scalar) -> Scalar {
        if !self.table.has_value_map(group, key) {
            return value;
        }
        match value {
            Scalar::Text(text) => {
                match self.table.translate_value(group, key, &text, Direction::ToExternal) {
                    Ok(external) => Scalar::Text(external.to_string()),
                    Err(_) => {
                        debug!(key, value = %text, "no value mapping, sending value unchanged");
                        Scalar::Text(text)
                    }
                }
            }
            Scalar::List(items) => Scalar::List(
                items
                    .into_iter()
                    .map(|item| self.translate_value(group, key, item))
                    .collect(),
            ),
            other => other,
        }
    }
}

fn invalid(key: &str, value: &Scalar) -> ParseError {
    ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_wire(),
    }
}

/// Check `value` against the option's kind and normalize it.
fn coerce(spec: &OptionSpec, key: &str, value: &Scalar) -> Result<Scalar, ParseError> {
    match spec.kind() {
        OptionKind::Plain(ValueType::Any) => Ok(value.clone()),
        OptionKind::Plain(ty) => match value {
            Scalar::List(items) => items
                .iter()
                .map(|item| coerce_plain(*ty, key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Scalar::List),
            single => coerce_plain(*ty, key, single),
        },
        OptionKind::Boolean => coerce_bool(key, value),
        OptionKind::Enumerated(allowed) => {
            for item in value.elements() {
                let wire = item.to_wire();
                if !allowed.iter().any(|a| *a == wire) {
                    return Err(invalid(key, item));
                }
            }
            Ok(value.clone())
        }
    }
}

fn coerce_plain(ty: ValueType, key: &str, value: &Scalar) -> Result<Scalar, ParseError> {
    let coerced = match (ty, value) {
        (ValueType::Any, v) => Some(v.clone()),
        (ValueType::Integer, Scalar::Int(_)) => Some(value.clone()),
        (ValueType::Integer, Scalar::Text(s)) => s.trim().parse().ok().map(Scalar::Int),
        (ValueType::Number, Scalar::Int(_) | Scalar::Float(_)) => Some(value.clone()),
        (ValueType::Number, Scalar::Text(s)) => s.trim().parse().ok().map(Scalar::Float),
        (ValueType::Text, Scalar::Text(_)) => Some(value.clone()),
        (ValueType::Text, Scalar::Int(_) | Scalar::Float(_)) => Some(Scalar::Text(value.to_wire())),
        (ValueType::Date, Scalar::Date(_) | Scalar::DateTime(_)) => Some(value.clone()),
        (ValueType::Date, Scalar::Text(s)) => parse_date(s.trim()),
        _ => None,
    };
    coerced.ok_or_else(|| invalid(key, value))
}

fn parse_date(s: &str) -> Option<Scalar> {
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(Scalar::Date(date));
    }
    [DATE_TIME_FORMAT, "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(Scalar::DateTime)
}

fn coerce_bool(key: &str, value: &Scalar) -> Result<Scalar, ParseError> {
    let flag = match value {
        Scalar::Bool(b) => Some(*b),
        Scalar::Int(0) => Some(false),
        Scalar::Int(1) => Some(true),
        Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.map(|b| Scalar::Int(i64::from(b))).ok_or_else(|| invalid(key, value))
}
