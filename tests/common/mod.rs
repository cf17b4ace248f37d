#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt;

use article_api::{
    api::{self, handlers::LoginResponse},
    app::AppState,
    cache::MemoryCache,
    services::TokenKeys,
    store::MemoryStore,
};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const USERNAME: &str = "john_doe";
pub const PASSWORD: &str = "StrongP@ssw0rd!";

pub fn token_keys() -> TokenKeys {
    TokenKeys::new(JWT_SECRET, Duration::from_secs(60 * 60))
}

pub fn state_with(store: Arc<MemoryStore>) -> AppState {
    AppState::new(
        store.clone(),
        store,
        Arc::new(MemoryCache::new()),
        token_keys(),
    )
}

pub fn router_with(store: Arc<MemoryStore>) -> Router {
    api::build_router(state_with(store))
}

pub fn router() -> Router {
    router_with(Arc::new(MemoryStore::new()))
}

// Deserialize a Response into T
pub async fn json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn register(router: &Router, username: &str, password: &str) -> Response {
    let body = json!({ "username": username, "password": password });
    send(router, json_request("POST", "/auth/register", &body, None)).await
}

/// Register the default account and return a bearer token for it
pub async fn login_token(router: &Router) -> String {
    let response = register(router, USERNAME, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "username": USERNAME, "password": PASSWORD });
    let response = send(router, json_request("POST", "/auth/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let LoginResponse { access_token, .. } = json(response).await;
    access_token
}
