//! Generic collection endpoint handlers.
//!
//! Every collection behaves like a Zammad resource: paginated listing,
//! `/search`, and CRUD on `/<collection>/<id>`.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::{paginate, MockState, RecordedRequest};
use crate::ON_BEHALF_OF_HEADER;

type SharedState = Arc<RwLock<MockState>>;

/// Page size when the request does not name one.
const DEFAULT_PER_PAGE: usize = 100;

/// What a handler needs to know about the incoming request.
struct RequestInfo {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
}

impl RequestInfo {
    fn new(method: Method, path: String, raw_query: Option<String>, headers: HeaderMap) -> Self {
        let query = raw_query
            .map(|raw| {
                url::form_urlencoded::parse(raw.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            method,
            path,
            query,
            headers,
        }
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn page(&self) -> i64 {
        self.param("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
    }

    fn per_page(&self) -> usize {
        self.param("per_page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PER_PAGE)
    }
}

/// Log the request and enforce the required token, if any.
fn admit(state: &mut MockState, info: &RequestInfo) -> Result<(), Response> {
    state.requests.push(RecordedRequest {
        method: info.method.to_string(),
        path: info.path.clone(),
        query: info.query.clone(),
        on_behalf_of: info
            .headers
            .get(ON_BEHALF_OF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let Some(token) = state.required_token.as_deref() else {
        return Ok(());
    };
    let presented = info
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented == format!("Token token={token}") || presented == format!("Bearer {token}") {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "authentication failed"})),
        )
            .into_response())
    }
}

fn not_found(collection: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!("Couldn't find {collection} with 'id'={id}")
        })),
    )
        .into_response()
}

/// GET /{collection}
pub async fn list_records(
    State(state): State<SharedState>,
    Path(collection): Path<String>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let info = RequestInfo::new(Method::GET, format!("/{collection}"), raw_query, headers);
    let mut state = state.write().await;
    if let Err(rejection) = admit(&mut state, &info) {
        return rejection;
    }

    let page = paginate(state.records(&collection), info.page(), info.per_page());
    (StatusCode::OK, Json(page)).into_response()
}

/// GET /{collection}/{id}, including `/search` and `/users/me`
pub async fn show_record(
    State(state): State<SharedState>,
    Path((collection, id)): Path<(String, String)>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let info = RequestInfo::new(
        Method::GET,
        format!("/{collection}/{id}"),
        raw_query,
        headers,
    );
    let mut state = state.write().await;
    if let Err(rejection) = admit(&mut state, &info) {
        return rejection;
    }

    match id.as_str() {
        "search" => {
            let hits = state.search(&collection, info.param("query").unwrap_or_default());
            let page = paginate(&hits, info.page(), info.per_page());
            (StatusCode::OK, Json(page)).into_response()
        }
        "me" if collection == "users" => match &state.me {
            Some(me) => (StatusCode::OK, Json(me.clone())).into_response(),
            None => not_found(&collection, &id),
        },
        _ => match state.get(&collection, &id) {
            Some(record) => (StatusCode::OK, Json(record.clone())).into_response(),
            None => not_found(&collection, &id),
        },
    }
}

/// POST /{collection}
pub async fn create_record(
    State(state): State<SharedState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let info = RequestInfo::new(Method::POST, format!("/{collection}"), None, headers);
    let mut state = state.write().await;
    if let Err(rejection) = admit(&mut state, &info) {
        return rejection;
    }

    match body {
        Value::Object(attributes) => {
            let record = state.create(&collection, attributes);
            (StatusCode::CREATED, Json(record)).into_response()
        }
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "expected a JSON object"})),
        )
            .into_response(),
    }
}

/// PUT /{collection}/{id}
pub async fn update_record(
    State(state): State<SharedState>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let info = RequestInfo::new(Method::PUT, format!("/{collection}/{id}"), None, headers);
    let mut state = state.write().await;
    if let Err(rejection) = admit(&mut state, &info) {
        return rejection;
    }

    let Value::Object(changes) = body else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "expected a JSON object"})),
        )
            .into_response();
    };
    match state.update(&collection, &id, changes) {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => not_found(&collection, &id),
    }
}

/// DELETE /{collection}/{id}
///
/// Tickets answer with an empty body, everything else with `{}`.
pub async fn delete_record(
    State(state): State<SharedState>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let info = RequestInfo::new(Method::DELETE, format!("/{collection}/{id}"), None, headers);
    let mut state = state.write().await;
    if let Err(rejection) = admit(&mut state, &info) {
        return rejection;
    }

    match state.remove(&collection, &id) {
        Some(_) if collection == "tickets" => StatusCode::OK.into_response(),
        Some(_) => (StatusCode::OK, Json(json!({}))).into_response(),
        None => not_found(&collection, &id),
    }
}
