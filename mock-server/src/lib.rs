use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Basic-auth credentials the server accepts.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", self.username, self.password)))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RealtyType {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ZipCodeCity {
    pub zip_code: u32,
    pub location: String,
}

pub const IDS: [u64; 3] = [101, 102, 103];

pub fn realty_types() -> Vec<RealtyType> {
    [(1, "Wohnung"), (2, "Haus"), (3, "Büro")]
        .into_iter()
        .map(|(id, name)| RealtyType {
            id,
            name: name.to_string(),
        })
        .collect()
}

pub fn zip_codes_and_cities() -> Vec<ZipCodeCity> {
    [(1010, "Wien"), (1020, "Wien"), (8010, "Graz")]
        .into_iter()
        .map(|(zip_code, location)| ZipCodeCity {
            zip_code,
            location: location.to_string(),
        })
        .collect()
}

type Pairs = Query<Vec<(String, String)>>;

pub fn app(credentials: Credentials) -> Router {
    let credentials = Arc::new(credentials);
    let objekt = Router::new()
        .route("/list", get(echo_query))
        .route("/detail", get(echo_query))
        .route("/ids", get(list_ids))
        .route("/anfrage", get(inquiry))
        .route("/kategorien", get(echo_query))
        .route("/laender", get(echo_query))
        .route("/bundeslaender", get(echo_query))
        .route("/regionen", get(echo_query))
        .route("/objektarten", get(list_types))
        .route("/plzsUndOrte", get(list_zip_codes))
        .route_layer(middleware::from_fn_with_state(credentials, require_auth));
    Router::new().nest("/rest/v1/objekt", objekt)
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock server listening");
    axum::serve(listener, app(credentials)).await
}

async fn require_auth(
    State(credentials): State<Arc<Credentials>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == credentials.authorization());
    if !authorized {
        debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

/// Query pairs as a JSON object; `key[]` pairs are collected into arrays.
pub fn pairs_to_json(pairs: Vec<(String, String)>) -> Value {
    let mut object = Map::new();
    for (key, value) in pairs {
        match key.strip_suffix("[]") {
            Some(base) => {
                let entry = object
                    .entry(base.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = entry {
                    items.push(Value::String(value));
                }
            }
            None => {
                object.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(object)
}

async fn echo_query(Query(pairs): Pairs) -> Json<Value> {
    Json(pairs_to_json(pairs))
}

async fn list_ids() -> Json<Vec<u64>> {
    Json(IDS.to_vec())
}

async fn list_types() -> Json<Vec<RealtyType>> {
    Json(realty_types())
}

async fn list_zip_codes() -> Json<Vec<ZipCodeCity>> {
    Json(zip_codes_and_cities())
}

async fn inquiry(Query(pairs): Pairs) -> Response {
    if !pairs.iter().any(|(key, value)| key == "email" && !value.is_empty()) {
        return (StatusCode::UNPROCESSABLE_ENTITY, "email is required").into_response();
    }
    Json(serde_json::json!({ "status": "ok" })).into_response()
}
