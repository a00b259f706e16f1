use api_service::TokenData;
use axum::http::{header, Method, StatusCode};
use serde_json::json;

mod utils;

use utils::*;

#[tokio::test]
async fn test_root_and_health_endpoints() {
    let app = TestAppBuilder::new()
        .with_var("PROJECT_NAME", "Orders API")
        .build();

    let root = app.get("/").await;
    assert_eq!(root.status(), StatusCode::OK);
    let body = body_json(root).await;
    assert_eq!(body["message"], "Welcome to Orders API");
    assert_eq!(body["version"], "1.0.0");

    let health = app.get("/health").await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_json(health).await, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_every_response_reports_process_time() {
    let app = TestAppBuilder::new().build();

    for uri in ["/", "/health", "/api/v1/auth/me"] {
        let response = app.get(uri).await;
        let value = response
            .headers()
            .get("x-process-time")
            .unwrap_or_else(|| panic!("missing X-Process-Time on {uri}"));
        assert!(value.to_str().unwrap().parse::<f64>().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn test_authenticated_request_flow() {
    let app = TestAppBuilder::new().build();
    let token = app.token_service().issue_for_subject("user-17").unwrap();
    assert_eq!(token.token_type, "bearer");

    let response = app
        .send(
            RequestBuilder::get("/api/v1/auth/me")
                .bearer(&token.access_token)
                .build(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data: TokenData = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(data.sub, "user-17");
    assert!(data.exp > chrono::Utc::now());
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let app = TestAppBuilder::new().build();

    let missing = app.get("/api/v1/auth/me").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let garbage = app
        .send(
            RequestBuilder::get("/api/v1/auth/me")
                .bearer("not.a.token")
                .build(),
        )
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(garbage).await["error"],
        "Could not validate credentials"
    );
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let app = TestAppBuilder::new().build();
    let other = TestAppBuilder::new()
        .with_var("SECRET_KEY", "another-deployment")
        .build();
    let token = other.token_service().issue_for_subject("user-17").unwrap();

    let response = app
        .send(
            RequestBuilder::get("/api/v1/auth/me")
                .bearer(&token.access_token)
                .build(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_trusted_hosts() {
    let app = TestAppBuilder::new()
        .with_allowed_hosts("api.example.com,*.internal.example.com")
        .build();

    let trusted = app
        .send(RequestBuilder::get("/health").host("api.example.com").build())
        .await;
    assert_eq!(trusted.status(), StatusCode::OK);

    let subdomain = app
        .send(
            RequestBuilder::get("/health")
                .host("svc.internal.example.com:8000")
                .build(),
        )
        .await;
    assert_eq!(subdomain.status(), StatusCode::OK);

    let untrusted = app
        .send(RequestBuilder::get("/health").host("attacker.test").build())
        .await;
    assert_eq!(untrusted.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(untrusted).await["error"], "Invalid host header");
}

#[tokio::test]
async fn test_cors_preflight_with_default_hosts() {
    let app = TestAppBuilder::new().build();

    let response = app
        .send(
            RequestBuilder::new(Method::OPTIONS, "/api/v1/auth/me")
                .header("origin", "https://frontend.example.com")
                .header("access-control-request-method", "GET")
                .header("access-control-request-headers", "authorization")
                .build(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://frontend.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_metrics_exposed_in_production() {
    let app = TestAppBuilder::new().production().build();

    for _ in 0..3 {
        assert_eq!(app.get("/health").await.status(), StatusCode::OK);
    }

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let text = body_text(response).await;
    assert!(text.contains(
        r#"http_requests_total{handler="/health",method="GET",status="200"} 3"#
    ));
}

#[tokio::test]
async fn test_metrics_not_exposed_in_development() {
    let app = TestAppBuilder::new().build();

    assert!(app.state.metrics.is_none());
    assert_eq!(app.get("/metrics").await.status(), StatusCode::NOT_FOUND);
}
