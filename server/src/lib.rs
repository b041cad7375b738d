//! In-memory development backend for a REST item collection.
//!
//! Items are kept in insertion order. Every write bumps a version counter
//! that doubles as the listing's `ETag`, so clients can revalidate their
//! copy with `If-None-Match`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct Store {
    items: Vec<Item>,
    version: u64,
}

impl Store {
    pub fn etag(&self) -> String {
        format!("\"v{}\"", self.version)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

pub type Db = Arc<RwLock<Store>>;

pub const DEFAULT_RESOURCE: &str = "items";

pub fn app() -> Router {
    app_with_resource(DEFAULT_RESOURCE)
}

/// Resolve the collection path from an optional setting such as the
/// `ITEMS_RESOURCE` variable. Blank values fall back to `items`.
pub fn resource_or_default(value: Option<String>) -> String {
    value
        .map(|v| v.trim().trim_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_RESOURCE.to_string())
}

/// Router serving the collection under `/{resource}`.
pub fn app_with_resource(resource: &str) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let collection = format!("/{}", resource.trim_matches('/'));
    let member = format!("{collection}/{{id}}");
    Router::new()
        .route(&collection, get(list_items).post(create_item))
        .route(&member, get(get_item).put(update_item).delete(delete_item))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_resource(listener, DEFAULT_RESOURCE).await
}

pub async fn run_with_resource(listener: TcpListener, resource: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_resource(resource)).await
}

/// The server assigns ids, so any client-supplied one is discarded.
fn strip_id(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.remove("id");
    fields
}

async fn list_items(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    let etag = store.etag();
    let fresh = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == etag);
    if fresh {
        tracing::debug!(%etag, "listing not modified");
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }
    ([(header::ETAG, etag)], Json(store.items.clone())).into_response()
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<Map<String, Value>>,
) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        fields: strip_id(input),
    };
    let mut store = db.write().await;
    store.items.push(item.clone());
    store.bump();
    tracing::info!(id = %item.id, "item created");
    (StatusCode::CREATED, Json(item))
}

async fn get_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Item>, StatusCode> {
    let store = db.read().await;
    store
        .position(id)
        .map(|index| Json(store.items[index].clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// PUT replaces every field of the item.
async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<Map<String, Value>>,
) -> Result<Json<Item>, StatusCode> {
    let mut store = db.write().await;
    let index = store.position(id).ok_or(StatusCode::NOT_FOUND)?;
    store.items[index].fields = strip_id(input);
    store.bump();
    tracing::info!(%id, "item updated");
    Ok(Json(store.items[index].clone()))
}

async fn delete_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let index = store.position(id).ok_or(StatusCode::NOT_FOUND)?;
    store.items.remove(index);
    store.bump();
    tracing::info!(%id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}
