use std::collections::HashMap;

use api_service::{create_application, AppState, Settings, TokenService};
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestAppBuilder {
    vars: HashMap<String, String>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        let vars = HashMap::from([
            ("SECRET_KEY".to_string(), TEST_SECRET.to_string()),
            ("BCRYPT_COST".to_string(), "4".to_string()),
        ]);
        Self { vars }
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn production(self) -> Self {
        self.with_var("ENVIRONMENT", "production")
            .with_var("DEBUG", "false")
    }

    pub fn with_allowed_hosts(self, hosts: &str) -> Self {
        self.with_var("ALLOWED_HOSTS", hosts)
    }

    pub fn settings(&self) -> Settings {
        Settings::from_lookup(|name| self.vars.get(name).cloned()).unwrap()
    }

    pub fn build(self) -> TestApp {
        let state = AppState::from_settings(self.settings()).unwrap();
        TestApp {
            router: create_application(state.clone()),
            state,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn token_service(&self) -> &TokenService {
        &self.state.token_service
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(RequestBuilder::get(uri).build()).await
    }
}

/// Small request builder so tests read as the HTTP exchange they perform
pub struct RequestBuilder {
    inner: axum::http::request::Builder,
}

impl RequestBuilder {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            inner: Request::builder().method(method).uri(uri),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.inner = self.inner.header(name, value);
        self
    }

    pub fn host(self, host: &str) -> Self {
        self.header(header::HOST.as_str(), host)
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), &format!("Bearer {}", token))
    }

    pub fn build(self) -> Request<Body> {
        self.inner.body(Body::empty()).unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
