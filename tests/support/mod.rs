#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use gymdesk::identity::NewUser;
use gymdesk::{AppState, ServerConfig, build_router};

pub fn test_config() -> ServerConfig {
    ServerConfig {
        bind_address: "127.0.0.1:0".parse().expect("addr"),
        default_balance: Decimal::from(1000),
        admin_username: None,
        admin_password: None,
        admin_token: None,
    }
}

/// In-process application plus direct handles to its state, so tests can
/// seed the store and directory without going through the HTTP surface.
pub struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(Arc::new(config)));
        let router = build_router(state.clone());
        Self { state, router }
    }

    fn create_user(&self, username: &str, password: &str, is_superuser: bool) -> Uuid {
        self.state
            .directory_mut()
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: password.to_string(),
                is_superuser,
                ..NewUser::default()
            })
            .expect("create user")
    }

    /// Seeds a regular user and returns an API token for them.
    pub fn user_token(&self, username: &str) -> String {
        let id = self.create_user(username, "sturdy-pass-1", false);
        self.state.directory_mut().issue_token(id).expect("token")
    }

    /// Seeds a superuser and returns an API token for them.
    pub fn superuser_token(&self, username: &str) -> String {
        let id = self.create_user(username, "sturdy-pass-1", true);
        self.state.directory_mut().issue_token(id).expect("token")
    }

    /// Seeds a superuser without a client row and returns a session cookie
    /// value.
    pub fn superuser_session(&self, username: &str) -> String {
        let id = self.create_user(username, "sturdy-pass-1", true);
        self.state.directory_mut().open_session(id).expect("session")
    }

    /// Seeds a user with a client row and returns a session cookie value.
    pub fn session_for(&self, username: &str, balance: i64) -> String {
        let id = self.create_user(username, "sturdy-pass-1", false);
        self.state
            .db_mut()
            .insert_client(gymdesk::domain::Client::new(id, Decimal::from(balance)));
        self.state.directory_mut().open_session(id).expect("session")
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("request")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.request(build(axum::http::Method::GET, path, token, None))
            .await
    }

    pub async fn post_json(&self, path: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.request(build(axum::http::Method::POST, path, token, Some(body)))
            .await
    }

    pub async fn put_json(&self, path: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.request(build(axum::http::Method::PUT, path, token, Some(body)))
            .await
    }

    pub async fn patch_json(&self, path: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.request(build(axum::http::Method::PATCH, path, token, Some(body)))
            .await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.request(build(axum::http::Method::DELETE, path, token, None))
            .await
    }

    /// GET with a page session cookie instead of a bearer token.
    pub async fn get_page(&self, path: &str, session: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(axum::http::Method::GET).uri(path);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("gymdesk_session={session}"));
        }
        self.request(builder.body(Body::empty()).expect("request"))
            .await
    }

    /// POSTs a urlencoded form, optionally with a page session cookie.
    pub async fn post_form(&self, path: &str, session: Option<&str>, form: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method(axum::http::Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("gymdesk_session={session}"));
        }
        self.request(builder.body(Body::from(form.to_string())).expect("request"))
            .await
    }
}

fn build(
    method: axum::http::Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
