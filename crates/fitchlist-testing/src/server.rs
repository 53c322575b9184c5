//! In-process HTTP server speaking the platform's list protocol.
//!
//! Serves `GET /api/<path>` with `page`, `per_page`, `query`, `sort` and
//! flat filter parameters over an in-memory list, and `DELETE
//! /api/<path>/<id>`. Every request is recorded for later assertions.

use anyhow::Result;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

use crate::fixtures;

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

/// One request as the server saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Backend {
    resources: HashMap<String, Vec<Value>>,
    failures: HashMap<String, (StatusCode, String)>,
    garbled: HashSet<String>,
    requests: Vec<RecordedRequest>,
}

type SharedBackend = Arc<Mutex<Backend>>;

fn lock(backend: &SharedBackend) -> MutexGuard<'_, Backend> {
    backend
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Builder for a [`FixtureServer`].
#[derive(Default)]
pub struct FixtureServerBuilder {
    backend: Backend,
}

impl FixtureServerBuilder {
    /// Serve `items` at `/api/<path>` (e.g. `modules` or `modules/1/assignments`).
    pub fn resource(mut self, path: &str, items: Vec<Value>) -> Self {
        self.backend
            .resources
            .insert(path.trim_matches('/').to_string(), items);
        self
    }

    /// Answer `path` with a failure envelope and the given status.
    pub fn failing(mut self, path: &str, status: u16, message: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.backend
            .failures
            .insert(path.trim_matches('/').to_string(), (status, message.to_string()));
        self
    }

    /// Answer `path` with a 200 whose body is not JSON.
    pub fn garbled(mut self, path: &str) -> Self {
        self.backend
            .garbled
            .insert(path.trim_matches('/').to_string());
        self
    }

    pub async fn start(self) -> Result<FixtureServer> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let backend: SharedBackend = Arc::new(Mutex::new(self.backend));

        let app = Router::new()
            .route("/api/*path", get(list).delete(remove))
            .with_state(backend.clone());

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(FixtureServer {
            addr,
            backend,
            task,
        })
    }
}

/// Running fixture server. Shut down on drop.
pub struct FixtureServer {
    addr: SocketAddr,
    backend: SharedBackend,
    task: JoinHandle<()>,
}

impl FixtureServer {
    pub fn builder() -> FixtureServerBuilder {
        FixtureServerBuilder::default()
    }

    /// Base URL including the `/api` prefix.
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.backend).requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.backend).requests.last().cloned()
    }

    /// Current contents of a resource (reflects deletes).
    pub fn items(&self, path: &str) -> Vec<Value> {
        lock(&self.backend)
            .resources
            .get(path.trim_matches('/'))
            .cloned()
            .unwrap_or_default()
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn record(backend: &mut Backend, method: &str, path: &str, query: &str, headers: &HeaderMap) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    backend.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.to_string(),
        query: query.to_string(),
        authorization,
    });
}

async fn list(
    State(backend): State<SharedBackend>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let path = path.trim_matches('/').to_string();
    let query = query.unwrap_or_default();
    let mut backend = lock(&backend);
    record(&mut backend, "GET", &path, &query, &headers);

    if let Some((status, message)) = backend.failures.get(&path) {
        return (*status, Json(fixtures::failure(message))).into_response();
    }
    if backend.garbled.contains(&path) {
        return (StatusCode::OK, "<html>gateway timeout</html>").into_response();
    }
    let Some(items) = backend.resources.get(&path) else {
        return (StatusCode::NOT_FOUND, Json(fixtures::failure("Resource not found"))).into_response();
    };

    let params = ListParams::parse(&query);
    let (page, total) = params.apply(items);
    let items_key = path.rsplit('/').next().unwrap_or(path.as_str());
    Json(fixtures::envelope(
        items_key,
        &page,
        params.page,
        params.per_page,
        total,
    ))
    .into_response()
}

async fn remove(
    State(backend): State<SharedBackend>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = path.trim_matches('/').to_string();
    let mut backend = lock(&backend);
    record(&mut backend, "DELETE", &path, "", &headers);

    let Some((resource, id)) = path.rsplit_once('/') else {
        return (StatusCode::NOT_FOUND, Json(fixtures::failure("Resource not found"))).into_response();
    };
    let Some(items) = backend.resources.get_mut(resource) else {
        return (StatusCode::NOT_FOUND, Json(fixtures::failure("Resource not found"))).into_response();
    };

    let before = items.len();
    items.retain(|item| value_text(&item["id"]) != id);
    if items.len() == before {
        return (StatusCode::NOT_FOUND, Json(fixtures::failure("Item not found"))).into_response();
    }

    Json(json!({ "success": true, "data": null, "message": "Deleted successfully" })).into_response()
}

struct ListParams {
    page: u64,
    per_page: u64,
    query: Option<String>,
    sort: Vec<(String, bool)>,
    filters: Vec<(String, Vec<String>)>,
}

impl ListParams {
    fn parse(raw: &str) -> Self {
        let mut params = ListParams {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            query: None,
            sort: Vec::new(),
            filters: Vec::new(),
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "page" => params.page = value.parse().unwrap_or(1).max(1),
                "per_page" => {
                    params.per_page = value
                        .parse()
                        .unwrap_or(DEFAULT_PER_PAGE)
                        .clamp(1, MAX_PER_PAGE)
                }
                "query" => params.query = Some(value.to_lowercase()).filter(|q| !q.is_empty()),
                "sort" => {
                    params.sort = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| match s.strip_prefix('-') {
                            Some(field) => (field.to_string(), true),
                            None => (s.to_string(), false),
                        })
                        .collect()
                }
                other => {
                    let key = other.trim_end_matches("[]").to_string();
                    let values = value.split(',').map(String::from);
                    match params.filters.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, existing)) => existing.extend(values),
                        None => params.filters.push((key, values.collect())),
                    }
                }
            }
        }

        params
    }

    fn apply(&self, items: &[Value]) -> (Vec<Value>, u64) {
        let mut matched: Vec<&Value> = items
            .iter()
            .filter(|item| self.matches_query(item))
            .filter(|item| {
                self.filters
                    .iter()
                    .all(|(key, values)| values.contains(&value_text(&item[key.as_str()])))
            })
            .collect();

        matched.sort_by(|a, b| {
            self.sort
                .iter()
                .map(|(field, descending)| {
                    let ordering = compare(&a[field.as_str()], &b[field.as_str()]);
                    if *descending { ordering.reverse() } else { ordering }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let total = matched.len() as u64;
        let start = ((self.page - 1) * self.per_page) as usize;
        let page = matched
            .into_iter()
            .skip(start)
            .take(self.per_page as usize)
            .cloned()
            .collect();
        (page, total)
    }

    fn matches_query(&self, item: &Value) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        item.as_object().is_some_and(|fields| {
            fields
                .values()
                .filter_map(Value::as_str)
                .any(|text| text.to_lowercase().contains(query.as_str()))
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => value_text(a).cmp(&value_text(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_apply_filters_sort_and_paging() {
        let items = fixtures::modules(10);
        let params = ListParams::parse("page=2&per_page=2&year=2025&sort=-id");
        let (page, total) = params.apply(&items);

        assert_eq!(total, 5);
        let ids: Vec<i64> = page.iter().filter_map(|m| m["id"].as_i64()).collect();
        assert_eq!(ids, vec![6, 4]);
    }

    #[test]
    fn test_params_accept_all_filter_layouts() {
        let items = fixtures::users(4);
        for query in ["id=u1&id=u3", "id[]=u1&id[]=u3", "id=u1,u3"] {
            let (page, total) = ListParams::parse(query).apply(&items);
            assert_eq!(total, 2, "{}", query);
            assert_eq!(page[1]["id"], "u3");
        }
    }

    #[test]
    fn test_per_page_is_capped() {
        let params = ListParams::parse("per_page=500&page=0");
        assert_eq!(params.per_page, MAX_PER_PAGE);
        assert_eq!(params.page, 1);
    }
}
