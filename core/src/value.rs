//! Option values supplied by callers.
//!
//! # Design
//! Callers hand the parser a `ParseRequest`: an ordered list of internal keys
//! with either a `Scalar` or a nested group (only `filter` is used today).
//! Values are typed up front so the parser validates one small tagged type
//! instead of guessing at strings, dates and booleans per call site.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::ParseError;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Multi-value input, e.g. several type ids.
    List(Vec<Scalar>),
}

impl Scalar {
    /// The value as the service expects it on the wire. Lists are joined with
    /// commas; `Params::to_query` expands them into repeated keys instead.
    pub fn to_wire(&self) -> String {
        match self {
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Bool(true) => "1".to_string(),
            Scalar::Bool(false) => "0".to_string(),
            Scalar::Text(v) => v.clone(),
            Scalar::Date(v) => v.format(DATE_FORMAT).to_string(),
            Scalar::DateTime(v) => v.format(DATE_TIME_FORMAT).to_string(),
            Scalar::List(items) => items
                .iter()
                .map(Scalar::to_wire)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The individual values: the list items, or the scalar itself.
    pub fn elements(&self) -> Vec<&Scalar> {
        match self {
            Scalar::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Scalar::List(_))
    }

    fn from_json(key: &str, value: &serde_json::Value) -> Result<Self, ParseError> {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Scalar::Float(f))
                } else {
                    Err(invalid_json(key, value))
                }
            }
            Value::String(s) => Ok(Scalar::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| Scalar::from_json(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Scalar::List),
            Value::Null | Value::Object(_) => Err(invalid_json(key, value)),
        }
    }
}

fn invalid_json(key: &str, value: &serde_json::Value) -> ParseError {
    ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Int(v) => serializer.serialize_i64(*v),
            Scalar::Float(v) => serializer.serialize_f64(*v),
            Scalar::Bool(v) => serializer.serialize_bool(*v),
            Scalar::List(items) => items.serialize(serializer),
            other => serializer.serialize_str(&other.to_wire()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(v: NaiveDate) -> Self {
        Scalar::Date(v)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(v: NaiveDateTime) -> Self {
        Scalar::DateTime(v)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Scalar {
    fn from(v: Vec<T>) -> Self {
        Scalar::List(v.into_iter().map(Into::into).collect())
    }
}

/// A request entry: a plain value or a nested option group.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Scalar(Scalar),
    Group(ParseRequest),
}

/// Caller-supplied options keyed by internal name, in caller order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseRequest {
    entries: Vec<(String, OptionValue)>,
}

impl ParseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an earlier value for the same key.
    pub fn set(mut self, key: &str, value: impl Into<Scalar>) -> Self {
        self.insert(key, OptionValue::Scalar(value.into()));
        self
    }

    /// Like `set`, but leaves the request untouched for `None`.
    pub fn set_opt<V: Into<Scalar>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Attach a nested option group, e.g. `filter`.
    pub fn group(mut self, name: &str, options: ParseRequest) -> Self {
        self.insert(name, OptionValue::Group(options));
        self
    }

    pub fn insert(&mut self, key: &str, value: OptionValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a request from a JSON object. Nested objects become groups and
    /// `null` entries are skipped.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ParseError> {
        let object = value.as_object().ok_or_else(|| invalid_json("", value))?;
        let mut request = ParseRequest::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Object(_) => {
                    request.insert(key, OptionValue::Group(ParseRequest::from_json(value)?));
                }
                other => request.insert(key, OptionValue::Scalar(Scalar::from_json(key, other)?)),
            }
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_forms() {
        assert_eq!(Scalar::Int(250000).to_wire(), "250000");
        assert_eq!(Scalar::Float(2.5).to_wire(), "2.5");
        assert_eq!(Scalar::Float(100.0).to_wire(), "100");
        assert_eq!(Scalar::Bool(true).to_wire(), "1");
        assert_eq!(Scalar::Bool(false).to_wire(), "0");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Scalar::Date(date).to_wire(), "2024-03-09");
        let dt = date.and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(Scalar::DateTime(dt).to_wire(), "2024-03-09 08:05:00");
        assert_eq!(Scalar::from(vec![1, 2, 3]).to_wire(), "1,2,3");
    }

    #[test]
    fn elements_of_scalar_and_list() {
        assert_eq!(Scalar::from("a").elements().len(), 1);
        assert_eq!(Scalar::from(vec!["a", "b"]).elements().len(), 2);
    }

    #[test]
    fn set_replaces_in_place() {
        let req = ParseRequest::new().set("limit", 5).set("offset", 0).set("limit", 10);
        let keys: Vec<&str> = req.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["limit", "offset"]);
        assert_eq!(req.get("limit"), Some(&OptionValue::Scalar(Scalar::Int(10))));
    }

    #[test]
    fn set_opt_skips_none() {
        let req = ParseRequest::new().set_opt::<&str>("lang", None).set_opt("id", Some(7));
        assert_eq!(req.len(), 1);
        assert!(req.get("lang").is_none());
    }

    #[test]
    fn from_json_builds_groups_and_lists() {
        let req = ParseRequest::from_json(&json!({
            "limit": 10,
            "lang": null,
            "filter": { "rooms_min": 2, "type": ["Haus", "Wohnung"], "price_max": 2.5e5 }
        }))
        .unwrap();

        assert_eq!(req.len(), 2);
        let Some(OptionValue::Group(filter)) = req.get("filter") else {
            panic!("filter should be a group");
        };
        assert_eq!(filter.get("rooms_min"), Some(&OptionValue::Scalar(Scalar::Int(2))));
        assert_eq!(
            filter.get("type"),
            Some(&OptionValue::Scalar(Scalar::from(vec!["Haus", "Wohnung"])))
        );
        assert_eq!(filter.get("price_max"), Some(&OptionValue::Scalar(Scalar::Float(250000.0))));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(ParseRequest::from_json(&json!([1, 2])).is_err());
        assert!(ParseRequest::from_json(&json!({"a": [{"b": 1}]})).is_err());
    }

    #[test]
    fn serializes_to_plain_json() {
        let value =
            serde_json::to_value(Scalar::from(vec![Scalar::Int(1), Scalar::from("x")])).unwrap();
        assert_eq!(value, json!([1, "x"]));
    }
}
