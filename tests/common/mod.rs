//! In-process stand-in for the fragments service, bound to an ephemeral port.

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use fragments_client::{
    models::{fragment::Fragment, user::BearerUser},
    routes::endpoints::Endpoints,
    services::fragment_client::FragmentClient,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const TOKEN: &str = "test-id-token";
pub const OWNER: &str = "owner-hash";

/// Id whose metadata route answers 200 with a body that is not JSON.
pub const MALFORMED_ID: &str = "malformed";

/// Id whose content route answers 200 without a `Content-Type` header.
pub const UNTYPED_ID: &str = "untyped";
pub const UNTYPED_BODY: &str = "no type given";

#[derive(Clone)]
struct Stored {
    meta: Fragment,
    data: Bytes,
}

#[derive(Clone, Default)]
pub struct FakeService {
    fragments: Arc<Mutex<Vec<Stored>>>,
    stored_type: Arc<Mutex<Option<String>>>,
}

impl FakeService {
    pub fn len(&self) -> usize {
        self.fragments.lock().unwrap().len()
    }

    /// Record every later write under `content_type` instead of the requested type.
    pub fn store_as(&self, content_type: &str) {
        *self.stored_type.lock().unwrap() = Some(content_type.into());
    }

    fn stored_type(&self, requested: String) -> String {
        self.stored_type.lock().unwrap().clone().unwrap_or(requested)
    }

    pub fn data_of(&self, id: &str) -> Option<Bytes> {
        self.fragments
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.meta.id == id)
            .map(|f| f.data.clone())
    }
}

pub struct Harness {
    pub service: FakeService,
    pub client: FragmentClient,
    pub user: BearerUser,
}

/// Start the fake service and a client pointed at it.
pub async fn start() -> Harness {
    let service = FakeService::default();
    let app = Router::new()
        .route("/", get(health))
        .route("/v1/fragments", get(list).post(create))
        .route(
            "/v1/fragments/{id}",
            get(fetch).put(replace).delete(remove),
        )
        .route("/v1/fragments/{id}/info", get(info))
        .with_state(service.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let endpoints = Endpoints::new(&format!("http://{}", addr)).unwrap();
    Harness {
        service,
        client: FragmentClient::new(endpoints).unwrap(),
        user: BearerUser::new("jane", TOKEN),
    }
}

/// A base URL where nothing is listening.
pub async fn unreachable_endpoints() -> Endpoints {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Endpoints::new(&format!("http://{}", addr)).unwrap()
}

fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn content_type(headers: &HeaderMap) -> Result<String, StatusCode> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(StatusCode::UNSUPPORTED_MEDIA_TYPE)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "author": "Test Author",
        "githubUrl": "https://github.com/test/fragments",
        "version": "0.0.1",
        "hostname": "localhost"
    }))
}

#[derive(Deserialize)]
struct ListQuery {
    expand: Option<String>,
}

async fn list(
    State(service): State<FakeService>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&headers)?;
    let fragments = service.fragments.lock().unwrap();
    let body = if query.expand.as_deref() == Some("1") {
        let metas: Vec<&Fragment> = fragments.iter().map(|f| &f.meta).collect();
        json!({ "status": "ok", "fragments": metas })
    } else {
        let ids: Vec<&str> = fragments.iter().map(|f| f.meta.id.as_str()).collect();
        json!({ "status": "ok", "fragments": ids })
    };
    Ok(Json(body))
}

async fn create(
    State(service): State<FakeService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    let content_type = service.stored_type(content_type(&headers)?);
    let now = Utc::now();
    let meta = Fragment {
        id: Uuid::new_v4().to_string(),
        owner_id: OWNER.into(),
        content_type,
        size: body.len() as u64,
        created: now,
        updated: now,
    };
    service.fragments.lock().unwrap().push(Stored {
        meta: meta.clone(),
        data: body,
    });
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "ok", "fragment": meta })),
    )
        .into_response())
}

async fn fetch(
    State(service): State<FakeService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    if id == UNTYPED_ID {
        return Ok(Response::new(Body::from(UNTYPED_BODY)));
    }
    let fragments = service.fragments.lock().unwrap();
    let stored = fragments
        .iter()
        .find(|f| f.meta.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok((
        [(header::CONTENT_TYPE, stored.meta.content_type.clone())],
        stored.data.clone(),
    )
        .into_response())
}

async fn info(
    State(service): State<FakeService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    if id == MALFORMED_ID {
        return Ok("this is not json".into_response());
    }
    let fragments = service.fragments.lock().unwrap();
    let stored = fragments
        .iter()
        .find(|f| f.meta.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "status": "ok", "fragment": stored.meta })).into_response())
}

async fn replace(
    State(service): State<FakeService>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&headers)?;
    let content_type = service.stored_type(content_type(&headers)?);
    let mut fragments = service.fragments.lock().unwrap();
    let stored = fragments
        .iter_mut()
        .find(|f| f.meta.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    stored.meta.content_type = content_type;
    stored.meta.size = body.len() as u64;
    stored.meta.updated = Utc::now();
    stored.data = body;
    Ok(Json(json!({ "status": "ok", "fragment": stored.meta })))
}

async fn remove(
    State(service): State<FakeService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&headers)?;
    let mut fragments = service.fragments.lock().unwrap();
    let before = fragments.len();
    fragments.retain(|f| f.meta.id != id);
    if fragments.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "status": "ok" })))
}
