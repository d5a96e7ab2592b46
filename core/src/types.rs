//! Reference-data records read by resolvers.
//!
//! # Design
//! Only the two collections the filter resolvers need are typed here. Listing
//! bodies stay raw strings; decoding them into domain objects belongs to the
//! host.

use serde::{Deserialize, Serialize};

/// A realty type such as "Haus" or "Wohnung".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtyType {
    pub id: i64,
    pub name: String,
}

/// One postal code with its place name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZipCodeCity {
    pub zip_code: u32,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_code_city_from_json() {
        let cities: Vec<ZipCodeCity> =
            serde_json::from_str(r#"[{"zip_code":1010,"location":"Wien"}]"#).unwrap();
        assert_eq!(cities[0].zip_code, 1010);
        assert_eq!(cities[0].location, "Wien");
    }

    #[test]
    fn realty_type_rejects_missing_name() {
        let result: Result<RealtyType, _> = serde_json::from_str(r#"{"id":3}"#);
        assert!(result.is_err());
    }
}
