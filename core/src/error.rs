//! Error types for the listing-service client core.
//!
//! # Design
//! Errors are split by who has to act on them. `ConfigError` is raised while
//! building the mapping table, schemas or client configuration and is fatal at
//! startup. `ParseError` separates rejected requests (`InvalidOption`,
//! `InvalidValue`) from programming defects (`KeyCollision`,
//! `MissingMapping`) and from reference-data failures surfaced by resolvers.
//! `TransportError` mirrors the two failure modes of the service itself:
//! rejected credentials and everything else.

use thiserror::Error;

use crate::mapping::MappingGroup;

/// Malformed configuration, mapping table or schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required configuration value is absent or empty.
    #[error("required configuration missing: {0}")]
    MissingConfiguration(&'static str),

    #[error("API version {0} not supported")]
    UnsupportedApiVersion(u32),

    /// Two entries in one mapping group share an internal name.
    #[error("duplicate internal name '{name}' in mapping group {group}")]
    DuplicateInternalName { group: MappingGroup, name: String },

    /// Two entries in one mapping group share an external name or alias.
    #[error("duplicate external name '{name}' in mapping group {group}")]
    DuplicateExternalName { group: MappingGroup, name: String },

    /// An option key (or group name) is registered twice in one schema.
    #[error("option '{0}' registered twice")]
    DuplicateOption(String),

    /// An enumerated option was declared without allowed values.
    #[error("enumerated option '{0}' has no allowed values")]
    EmptyEnumeration(String),

    #[error("range option '{0}' has an empty suffix")]
    InvalidRangeSuffix(String),

    /// A component needs an external name the mapping table does not define.
    #[error("mapping group {group} has no entry for '{key}'")]
    MissingMapping { group: MappingGroup, key: String },
}

/// Lookup failure in the mapping table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("no mapping for '{key}' in group {group}")]
    UnknownMappingKey { group: MappingGroup, key: String },
}

/// Failure while translating a caller request into service parameters.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The key matches no option of the active schema.
    #[error("Option '{0}' not supported")]
    InvalidOption(String),

    /// The value is outside the option's enumeration or type.
    #[error("'{value}' is not in the list of accepted values")]
    InvalidValue { key: String, value: String },

    /// Two different inputs produced the same external key.
    #[error("external key '{key}' produced by both '{first}' and '{second}'")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// An option that must be renamed has no mapping entry.
    #[error("option '{key}' requires a mapping in group {group}")]
    MissingMapping { group: MappingGroup, key: String },

    /// A resolver could not read its reference data.
    #[error("reference data unavailable: {0}")]
    Reference(#[from] TransportError),
}

impl ParseError {
    /// True for errors caused by the caller's input.
    pub fn is_rejected_request(&self) -> bool {
        matches!(self, Self::InvalidOption(_) | Self::InvalidValue { .. })
    }

    /// True for errors that point at a schema or resolver bug.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::KeyCollision { .. } | Self::MissingMapping { .. })
    }
}

/// Failures reported by the transport collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Authentication failed.")]
    AuthenticationFailed,

    /// Any other failure to obtain a response body.
    #[error("Failed to get data from the API: {0}")]
    RetrievalFailed(String),

    /// The body was retrieved but could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Errors returned by `RealtyRequest` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not have the expected shape.
    #[error("deserialization failed: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when the failure came from a collaborator rather than the caller
    /// or a defect. These are the errors a failure policy may swallow.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Decode(_) | Self::Parse(ParseError::Reference(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_option_message_names_the_key() {
        let err = ParseError::InvalidOption("foo".to_string());
        assert_eq!(err.to_string(), "Option 'foo' not supported");
        assert!(err.is_rejected_request());
        assert!(!err.is_defect());
    }

    #[test]
    fn invalid_value_message_names_the_value() {
        let err = ParseError::InvalidValue {
            key: "ordertype".to_string(),
            value: "sideways".to_string(),
        };
        assert_eq!(err.to_string(), "'sideways' is not in the list of accepted values");
    }

    #[test]
    fn collision_is_a_defect() {
        let err = ParseError::KeyCollision {
            key: "plz".to_string(),
            first: "zip_code".to_string(),
            second: "location".to_string(),
        };
        assert!(err.is_defect());
        assert!(!err.is_rejected_request());
    }

    #[test]
    fn reference_failures_count_as_collaborator_errors() {
        let err = ClientError::from(ParseError::from(TransportError::AuthenticationFailed));
        assert!(err.is_collaborator_failure());

        let err = ClientError::from(ParseError::InvalidOption("x".to_string()));
        assert!(!err.is_collaborator_failure());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::DuplicateExternalName {
            group: MappingGroup::Filter,
            name: "plz".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate external name 'plz' in mapping group filter");
    }
}
