//! End-to-end tests for the authentication filter mounted on the demo router.
//!
//! These tests verify that:
//! 1. Requests always reach the handler (the filter never rejects)
//! 2. `SecurityContext` reflects the backend's verdict
//! 3. Handlers needing a principal answer 401 / 403 themselves
//! 4. Concurrent requests never see each other's identity

use std::time::Duration;

use axum::{
    Extension, Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use jwt_gate::{
    app,
    config::{Config, ConfigError},
    middleware,
    security::{SecurityContext, TokenClaims},
    services::{AccountUser, audit::AUTH_STATUS_HEADER},
};
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "integration-signing-key";
const SERVICE: &str = "orders";

fn config_with(extra: &[(&str, &str)]) -> Config {
    let mut pairs = vec![("JWT_SERVICE_NAME", SERVICE), ("JWT_SIGNING_KEY", KEY)];
    pairs.extend_from_slice(extra);
    let pairs: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Config::from_lookup(move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("valid test configuration")
}

fn router_with(extra: &[(&str, &str)]) -> Router {
    let config = config_with(extra);
    app::build_router(app::build_state(&config).expect("state"))
}

fn token(sub: &str, exp_offset: i64, roles: &[&str]) -> String {
    let now = jsonwebtoken::get_current_timestamp() as i64;
    let claims = TokenClaims {
        sub: sub.to_string(),
        aud: SERVICE.into(),
        exp: (now + exp_offset) as u64,
        iss: None,
        iat: Some(now as u64),
        nbf: None,
        jti: None,
        roles: roles.iter().map(|r| r.to_string()).collect(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(KEY.as_bytes()),
    )
    .unwrap()
}

fn get_with_bearer(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = router_with(&[])
        .oneshot(get_with_bearer("/api/v1/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(AUTH_STATUS_HEADER).is_none());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn anonymous_me_is_refused_by_the_handler() {
    let response = router_with(&[])
        .oneshot(get_with_bearer("/api/v1/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    // no credential => no handler ran
    assert!(response.headers().get(AUTH_STATUS_HEADER).is_none());
}

#[tokio::test]
async fn valid_token_reaches_me() {
    let response = router_with(&[])
        .oneshot(get_with_bearer("/api/v1/me", Some(&token("42", 300, &[]))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[AUTH_STATUS_HEADER], "authenticated");
    let body = json(response).await;
    assert_eq!(body["id"], 42);
    assert_eq!(body["name"], "alice");
}

#[tokio::test]
async fn expired_token_continues_anonymously() {
    let response = router_with(&[])
        .oneshot(get_with_bearer(
            "/api/v1/session",
            Some(&token("42", -600, &[])),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[AUTH_STATUS_HEADER], "expired");
    let body = json(response).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["account_id"], Value::Null);
    assert_eq!(body["service"], SERVICE);
}

#[tokio::test]
async fn unknown_subject_is_rejected() {
    let response = router_with(&[])
        .oneshot(get_with_bearer("/api/v1/me", Some(&token("9999", 300, &[]))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[AUTH_STATUS_HEADER], "rejected");
}

#[tokio::test]
async fn admin_requires_role() {
    let router = router_with(&[]);

    let response = router
        .clone()
        .oneshot(get_with_bearer(
            "/api/v1/admin/ping",
            Some(&token("7", 300, &[])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(get_with_bearer(
            "/api/v1/admin/ping",
            Some(&token("7", 300, &["admin"])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cookie_source_is_honoured() {
    let router = router_with(&[("JWT_TOKEN_SOURCE", "cookie"), ("JWT_COOKIE_NAME", "sid")]);

    let request = Request::builder()
        .uri("/api/v1/me")
        .header(header::COOKIE, format!("theme=dark; sid={}", token("7", 300, &[])))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["name"], "bob");

    // header tokens are ignored when the cookie source is selected
    let response = router
        .oneshot(get_with_bearer("/api/v1/me", Some(&token("7", 300, &[]))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn query_source_via_any() {
    let router = router_with(&[("JWT_TOKEN_SOURCE", "any")]);

    let uri = format!("/api/v1/me?access_token={}", token("42", 300, &[]));
    let response = router.oneshot(get_with_bearer(&uri, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["id"], 42);
}

#[test]
fn startup_fails_without_signing_key() {
    let err = Config::from_lookup(|key| (key == "JWT_SERVICE_NAME").then(|| SERVICE.to_string()))
        .err()
        .unwrap();
    assert_eq!(err, ConfigError::Missing("JWT_SIGNING_KEY"));
}

async fn observe_twice(
    Extension(ctx): Extension<SecurityContext<AccountUser>>,
) -> Json<(Option<u64>, Option<u64>)> {
    let before = ctx.principal().map(|u| u.id);
    tokio::time::sleep(Duration::from_millis(5)).await;
    let after = ctx.principal().map(|u| u.id);
    Json((before, after))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_isolated() {
    let config = config_with(&[]);
    let state = app::build_state(&config).unwrap();
    let router: Router = middleware::auth::apply(
        Router::new().route("/observe", get(observe_twice)),
        state.auth.clone(),
    );

    let alice = token("42", 300, &[]);
    let bob = token("7", 300, &[]);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..64 {
        let (bearer, expected) = match i % 3 {
            0 => (Some(alice.clone()), Some(42)),
            1 => (Some(bob.clone()), Some(7)),
            _ => (None, None),
        };
        let router = router.clone();
        tasks.spawn(async move {
            let response = router
                .oneshot(get_with_bearer("/observe", bearer.as_deref()))
                .await
                .unwrap();
            let seen: (Option<u64>, Option<u64>) =
                serde_json::from_value(json(response).await).unwrap();
            (expected, seen)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (expected, (before, after)) = result.unwrap();
        assert_eq!(before, expected);
        assert_eq!(after, expected);
    }
}
