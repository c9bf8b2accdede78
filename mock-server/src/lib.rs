use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// The only bearer token the server accepts.
pub const VALID_TOKEN: &str = "mock-token";

pub const SESSION_INVALID_CODE: i64 = 9001;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub item_name: String,
    pub unit_price: f64,
}

#[derive(Deserialize)]
pub struct NewItem {
    pub item_name: String,
    #[serde(default)]
    pub unit_price: f64,
}

pub type Db = Arc<RwLock<Vec<Item>>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/session", get(session))
        .route("/fail/{code}", get(fail))
        .route("/status/{status}", get(embedded_status))
        .route("/echo", any(echo))
        .route("/plain", get(plain))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorized(headers: &HeaderMap) -> bool {
    bearer(headers) == Some(VALID_TOKEN)
}

fn session_expired() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"code": SESSION_INVALID_CODE, "message": "session expired"})),
    )
}

async fn list_items(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
    RawQuery(raw): RawQuery,
) -> Json<Value> {
    let items = db.read().await;
    Json(json!({
        "code": 0,
        "items": &*items,
        "query": params,
        "raw_query": raw,
    }))
}

async fn create_item(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<NewItem>,
) -> Reply {
    if !authorized(&headers) {
        return session_expired();
    }
    let item = Item {
        id: Uuid::new_v4(),
        item_name: input.item_name,
        unit_price: input.unit_price,
    };
    tracing::debug!(id = %item.id, "item created");
    db.write().await.push(item.clone());
    (StatusCode::CREATED, Json(json!({"code": 0, "item": item})))
}

async fn session(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return session_expired();
    }
    (StatusCode::OK, Json(json!({"code": 0, "user_name": "mock-user"})))
}

async fn fail(Path(code): Path<i64>) -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"code": code, "message": format!("failed with code {code}")})),
    )
}

/// A non-zero code next to an embedded HTTP-style status.
async fn embedded_status(Path(status): Path<u16>) -> Json<Value> {
    Json(json!({
        "code": 1,
        "status_code": status,
        "message": format!("status {status}"),
    }))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    let mut echoed = Map::new();
    for (name, value) in headers.iter() {
        if let Ok(value) = value.to_str() {
            echoed.insert(name.as_str().to_string(), Value::from(value));
        }
    }
    Json(json!({
        "code": 0,
        "method": method.as_str(),
        "headers": echoed,
        "body": body,
    }))
}

async fn plain() -> &'static str {
    "this is not json"
}
