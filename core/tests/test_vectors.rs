//! Verify parsing and request/response handling against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file describes caller inputs, the expected service parameters
//! or error, and simulated responses. Parameters are compared as parsed JSON
//! and queries as unordered pair sets, which avoids false negatives from
//! ordering differences.

use std::sync::Arc;

use immo_core::{
    Config, HttpResponse, Operation, ParseError, ParseRequest, Params, RealtyRequest, RealtyType,
    ReferenceData, Scalar, ServiceClient, Transport, TransportError, ZipCodeCity,
};

/// Reference data the resolver vectors are written against.
struct Fixtures;

impl ReferenceData for Fixtures {
    fn list_types(&self) -> Result<Vec<RealtyType>, TransportError> {
        Ok(vec![
            RealtyType { id: 1, name: "Wohnung".to_string() },
            RealtyType { id: 2, name: "Haus".to_string() },
        ])
    }

    fn list_zip_codes_and_cities(&self) -> Result<Vec<ZipCodeCity>, TransportError> {
        Ok(vec![ZipCodeCity { zip_code: 1010, location: "Vienna".to_string() }])
    }
}

/// Parsing never reaches the transport.
struct Unused;

impl Transport for Unused {
    fn perform(&self, endpoint: &str, _params: &Params) -> Result<String, TransportError> {
        panic!("unexpected request to {endpoint}");
    }
}

fn parse_operation(s: &str) -> Operation {
    Operation::ALL
        .into_iter()
        .find(|op| op.to_string() == s)
        .unwrap_or_else(|| panic!("unknown operation: {s}"))
}

fn error_kind(err: &ParseError) -> &'static str {
    match err {
        ParseError::InvalidOption(_) => "InvalidOption",
        ParseError::InvalidValue { .. } => "InvalidValue",
        ParseError::KeyCollision { .. } => "KeyCollision",
        ParseError::MissingMapping { .. } => "MissingMapping",
        ParseError::Reference(_) => "Reference",
    }
}

fn sorted_pairs(query: &str) -> Vec<&str> {
    let mut pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    pairs.sort_unstable();
    pairs
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[test]
fn parse_test_vectors() {
    let raw = include_str!("../../test-vectors/parse.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let realty = RealtyRequest::new(Arc::new(Unused), Arc::new(Fixtures)).unwrap();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = parse_operation(case["operation"].as_str().unwrap());
        let input = ParseRequest::from_json(&case["input"]).unwrap();

        let result = realty.parse(operation, &input);
        if let Some(expected) = case["expected_error"].as_str() {
            let err = result.expect_err(name);
            assert_eq!(error_kind(&err), expected, "{name}: {err}");
            continue;
        }

        let params = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(params.to_json(), case["expected_params"], "{name}: params");
        assert_eq!(
            sorted_pairs(&params.to_query()),
            sorted_pairs(case["expected_query"].as_str().unwrap()),
            "{name}: query"
        );
    }
}

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

fn client(base_url: &str) -> ServiceClient {
    ServiceClient::new(Config::new("user", "pass").unwrap().with_base_url(base_url))
}

fn scalar(value: &serde_json::Value) -> Scalar {
    match value {
        serde_json::Value::Number(n) => Scalar::Int(n.as_i64().unwrap()),
        serde_json::Value::String(s) => Scalar::from(s.as_str()),
        other => panic!("unsupported vector value: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client(vectors["base_url"].as_str().unwrap());
    for case in vectors["requests"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut params = Params::new();
        for pair in case["params"].as_array().unwrap() {
            params.insert(pair[0].as_str().unwrap(), scalar(&pair[1]));
        }

        let req = c.build_request(case["endpoint"].as_str().unwrap(), &params);
        assert_eq!(req.url, case["expected_url"].as_str().unwrap(), "{name}: url");

        let expected_headers: Vec<(String, String)> = case["expected_headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client(vectors["base_url"].as_str().unwrap());
    for case in vectors["responses"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];

        match c.parse_response(response) {
            Ok(body) => assert_eq!(Some(body.as_str()), expected["ok"].as_str(), "{name}"),
            Err(err) => {
                let kind = match err {
                    TransportError::AuthenticationFailed => "AuthenticationFailed",
                    TransportError::RetrievalFailed(_) => "RetrievalFailed",
                    TransportError::Decode(_) => "Decode",
                };
                assert_eq!(Some(kind), expected["error"].as_str(), "{name}");
                if let Some(message) = expected["message"].as_str() {
                    assert_eq!(err.to_string(), message, "{name}: message");
                }
            }
        }
    }
}
