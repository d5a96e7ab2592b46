//! Bidirectional name and value dictionary between the client vocabulary and
//! the service's field names.
//!
//! # Design
//! Entries are partitioned into `MappingGroup`s because the same internal name
//! can map differently depending on context (a response field versus a list
//! filter). Within a group internal names, external names and aliases are all
//! unique, checked once in `MappingTableBuilder::build`, so every lookup is
//! unambiguous in both directions. Lookups never fall back on their own; the
//! caller decides whether a miss means identity or a defect.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{ConfigError, MappingError};

/// Namespace of a mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingGroup {
    /// Response fields.
    General,
    /// Top-level request parameters.
    Params,
    /// List filter fields.
    Filter,
}

impl fmt::Display for MappingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MappingGroup::General => "general",
            MappingGroup::Params => "params",
            MappingGroup::Filter => "filter",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToExternal,
    ToInternal,
}

/// One internal ↔ external name pair with optional aliases and value map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    internal: String,
    external: String,
    aliases: Vec<String>,
    values: Vec<(String, String)>,
}

impl MappingEntry {
    pub fn new(internal: &str, external: &str) -> Self {
        Self {
            internal: internal.to_string(),
            external: external.to_string(),
            aliases: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Another external spelling that reverse-maps to this entry.
    pub fn alias(mut self, external: &str) -> Self {
        self.aliases.push(external.to_string());
        self
    }

    /// Translate the internal value `internal` to `external` on the wire.
    pub fn value(mut self, internal: &str, external: &str) -> Self {
        self.values.push((internal.to_string(), external.to_string()));
        self
    }

    pub fn internal(&self) -> &str {
        &self.internal
    }

    pub fn external(&self) -> &str {
        &self.external
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn has_value_map(&self) -> bool {
        !self.values.is_empty()
    }
}

#[derive(Debug, Default)]
struct GroupTable {
    entries: Vec<MappingEntry>,
    by_internal: HashMap<String, usize>,
    by_external: HashMap<String, usize>,
}

impl GroupTable {
    fn push(&mut self, group: MappingGroup, entry: MappingEntry) -> Result<(), ConfigError> {
        let index = self.entries.len();
        if self.by_internal.insert(entry.internal.clone(), index).is_some() {
            return Err(ConfigError::DuplicateInternalName {
                group,
                name: entry.internal,
            });
        }
        for external in std::iter::once(&entry.external).chain(&entry.aliases) {
            if self.by_external.insert(external.clone(), index).is_some() {
                return Err(ConfigError::DuplicateExternalName {
                    group,
                    name: external.clone(),
                });
            }
        }
        check_value_map(group, &entry)?;
        self.entries.push(entry);
        Ok(())
    }
}

/// Value maps must be invertible too.
fn check_value_map(group: MappingGroup, entry: &MappingEntry) -> Result<(), ConfigError> {
    for (i, (internal, external)) in entry.values.iter().enumerate() {
        for (other_internal, other_external) in &entry.values[i + 1..] {
            if internal == other_internal {
                return Err(ConfigError::DuplicateInternalName {
                    group,
                    name: format!("{}={internal}", entry.internal),
                });
            }
            if external == other_external {
                return Err(ConfigError::DuplicateExternalName {
                    group,
                    name: format!("{}={external}", entry.external),
                });
            }
        }
    }
    Ok(())
}

/// Accumulates entries and validates them into a `MappingTable`.
#[derive(Debug, Default)]
pub struct MappingTableBuilder {
    entries: Vec<(MappingGroup, MappingEntry)>,
}

impl MappingTableBuilder {
    pub fn entry(mut self, group: MappingGroup, entry: MappingEntry) -> Self {
        self.entries.push((group, entry));
        self
    }

    /// Register plain `(internal, external)` pairs.
    pub fn pairs(mut self, group: MappingGroup, pairs: &[(&str, &str)]) -> Self {
        self.entries.extend(
            pairs
                .iter()
                .map(|(internal, external)| (group, MappingEntry::new(internal, external))),
        );
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when a group contains duplicate internal or
    /// external names, or a value map is not invertible.
    pub fn build(self) -> Result<MappingTable, ConfigError> {
        let mut groups: HashMap<MappingGroup, GroupTable> = HashMap::new();
        for (group, entry) in self.entries {
            groups.entry(group).or_default().push(group, entry)?;
        }
        Ok(MappingTable { groups })
    }
}

/// Immutable, validated mapping table. Safe to share between threads.
#[derive(Debug, Default)]
pub struct MappingTable {
    groups: HashMap<MappingGroup, GroupTable>,
}

impl MappingTable {
    pub fn builder() -> MappingTableBuilder {
        MappingTableBuilder::default()
    }

    fn lookup(
        &self,
        group: MappingGroup,
        key: &str,
        direction: Direction,
    ) -> Result<&MappingEntry, MappingError> {
        let table = self.groups.get(&group);
        let index = table.and_then(|t| match direction {
            Direction::ToExternal => t.by_internal.get(key),
            Direction::ToInternal => t.by_external.get(key),
        });
        match (table, index) {
            (Some(t), Some(&i)) => Ok(&t.entries[i]),
            _ => Err(MappingError::UnknownMappingKey {
                group,
                key: key.to_string(),
            }),
        }
    }

    /// Internal name → external name.
    ///
    /// # Errors
    ///
    /// `UnknownMappingKey` when `group` has no entry for `key`.
    pub fn translate(&self, group: MappingGroup, key: &str) -> Result<&str, MappingError> {
        self.lookup(group, key, Direction::ToExternal).map(MappingEntry::external)
    }

    /// External name (or alias) → internal name.
    ///
    /// # Errors
    ///
    /// `UnknownMappingKey` when no entry in `group` uses `external`.
    pub fn reverse(&self, group: MappingGroup, external: &str) -> Result<&str, MappingError> {
        self.lookup(group, external, Direction::ToInternal).map(MappingEntry::internal)
    }

    /// Translate a value of the field `key` (always named by its internal
    /// name) in the given direction.
    ///
    /// # Errors
    ///
    /// `UnknownMappingKey` when the field is unknown or its value map has no
    /// entry for `value`.
    pub fn translate_value(
        &self,
        group: MappingGroup,
        key: &str,
        value: &str,
        direction: Direction,
    ) -> Result<&str, MappingError> {
        let entry = self.lookup(group, key, Direction::ToExternal)?;
        entry
            .values
            .iter()
            .find_map(|(internal, external)| match direction {
                Direction::ToExternal if internal == value => Some(external.as_str()),
                Direction::ToInternal if external == value => Some(internal.as_str()),
                _ => None,
            })
            .ok_or_else(|| MappingError::UnknownMappingKey {
                group,
                key: format!("{key}={value}"),
            })
    }

    pub fn has_value_map(&self, group: MappingGroup, key: &str) -> bool {
        self.lookup(group, key, Direction::ToExternal)
            .is_ok_and(MappingEntry::has_value_map)
    }

    pub fn entries(&self, group: MappingGroup) -> impl Iterator<Item = &MappingEntry> {
        self.groups.get(&group).into_iter().flat_map(|t| t.entries.iter())
    }

    /// Rename the object keys of a decoded response from external to internal
    /// names, recursively. Unknown keys are kept as they are.
    pub fn internalize(&self, group: MappingGroup, value: &serde_json::Value) -> serde_json::Value {
        use serde_json::Value;

        match value {
            Value::Object(object) => Value::Object(
                object
                    .iter()
                    .map(|(key, v)| {
                        let name = self.reverse(group, key).unwrap_or(key);
                        (name.to_string(), self.internalize(group, v))
                    })
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.internalize(group, v)).collect())
            }
            other => other.clone(),
        }
    }
}
