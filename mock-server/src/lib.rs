//! In-memory REST resource used by the integration tests.
//!
//! Serves an item collection plus an `/echo` endpoint that reflects what a
//! client sent. Failures are answered with problem documents.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use restcall_core::{
    AllowListHeaderFilter, CustomHeaderFilter, Problem, RestError, ServiceMarker,
    ValidationExecutor, ValidatorExecutor,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;
use validator::Validate;

/// Custom headers reflected by `/echo`.
pub const ECHOED_HEADERS: [&str; 2] = ["X-Conversation-Id", "X-Tenant"];

/// Marker naming this resource in validation failures.
pub enum ItemService {}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Single-parameter wrapper served by `/items/{id}/envelope`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: usize,
    pub objects: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub size: Option<usize>,
}

/// What the server saw of an `/echo` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, Vec<String>>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub cookies: BTreeMap<String, String>,
    pub content_type: Option<String>,
    pub body: Option<serde_json::Value>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Item>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub header_filter: Arc<AllowListHeaderFilter>,
    pub validator: ValidatorExecutor,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            db: Db::default(),
            header_filter: Arc::new(AllowListHeaderFilter::from_names(ECHOED_HEADERS)),
            validator: ValidatorExecutor,
        }
    }
}

/// A problem document sent with its own status.
#[derive(Debug)]
pub struct ApiProblem(pub Problem);

impl ApiProblem {
    fn not_found(id: Uuid) -> Self {
        ApiProblem(Problem::new(404, "Not Found").with_detail(format!("no item with id {id}")))
    }
}

impl From<RestError> for ApiProblem {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Validation { errors, .. } => {
                ApiProblem(Problem::new(422, "Unprocessable Entity").with_detail(errors.to_string()))
            }
            other => ApiProblem(Problem::new(400, "Bad Request").with_detail(other.to_string())),
        }
    }
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let status = self
            .0
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self.0),
        )
            .into_response()
    }
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/page", get(page_items))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/items/{id}/envelope", get(get_enveloped_item))
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Decode a raw query string into multi-valued parameters, keeping value
/// order per name.
pub fn parse_query(raw: Option<&str>) -> BTreeMap<String, Vec<String>> {
    let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in raw.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        query.entry(decode(name)).or_default().push(decode(value));
    }
    query
}

/// Split `cookie` headers into name/value pairs, percent-decoding values.
pub fn parse_cookies(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .filter(|cookie| !cookie.is_empty())
        .map(|cookie| {
            let (name, value) = cookie.split_once('=').unwrap_or((cookie, ""));
            (name.to_string(), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn sorted(items: impl Iterator<Item = Item>) -> Vec<Item> {
    let mut items: Vec<Item> = items.collect();
    items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    items
}

async fn list_items(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Json<Vec<Item>> {
    let query = parse_query(raw.as_deref());
    let wanted = query.get("tag").cloned().unwrap_or_default();
    let items = state.db.read().await;
    Json(sorted(
        items
            .values()
            .filter(|item| wanted.iter().all(|tag| item.tags.contains(tag)))
            .cloned(),
    ))
}

async fn page_items(State(state): State<AppState>, Query(page): Query<PageQuery>) -> Json<Page<Item>> {
    let items = state.db.read().await;
    let all = sorted(items.values().cloned());
    let total = all.len();
    let objects = all.into_iter().take(page.size.unwrap_or(total)).collect();
    Json(Page { total, objects })
}

async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> Result<(StatusCode, Json<Item>), ApiProblem> {
    state
        .validator
        .validate_request(&ServiceMarker::of::<ItemService>(), &input)?;
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        tags: input.tags,
    };
    tracing::debug!(id = %item.id, name = %item.name, "item created");
    state.db.write().await.insert(item.id, item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Item>, ApiProblem> {
    let items = state.db.read().await;
    items.get(&id).cloned().map(Json).ok_or_else(|| ApiProblem::not_found(id))
}

async fn get_enveloped_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Item>>, ApiProblem> {
    let Json(data) = get_item(State(state), Path(id)).await?;
    Ok(Json(Envelope { data }))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, ApiProblem> {
    state
        .validator
        .validate_request(&ServiceMarker::of::<ItemService>(), &input)?;
    let mut items = state.db.write().await;
    let item = items.get_mut(&id).ok_or_else(|| ApiProblem::not_found(id))?;
    if let Some(name) = input.name {
        item.name = name;
    }
    if let Some(tags) = input.tags {
        item.tags = tags;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiProblem> {
    let mut items = state.db.write().await;
    items
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiProblem::not_found(id))
}

async fn echo(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Echo>, ApiProblem> {
    let body = if body.is_empty() {
        None
    } else {
        let value = serde_json::from_str(&body).map_err(|e| {
            ApiProblem(Problem::new(400, "Bad Request").with_detail(format!("body is not JSON: {e}")))
        })?;
        Some(value)
    };

    let mut echoed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        if state.header_filter.accepts(name.as_str()) {
            echoed
                .entry(name.as_str().to_string())
                .or_default()
                .push(value.to_str().unwrap_or_default().to_string());
        }
    }

    Ok(Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: parse_query(uri.query()),
        headers: echoed,
        cookies: parse_cookies(&headers),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    }))
}
