// tests/session_test.rs — Integration tests: session lifecycle against a mock backend

mod common;

use std::path::Path;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::json;

use proxydash::api::ApiClient;
use proxydash::infra::errors::ProxydashError;
use proxydash::session::store::SessionStore;
use proxydash::session::SessionManager;

fn manager_for(dir: &Path, origin: &str) -> SessionManager {
    let api = ApiClient::new(dir);
    api.set_base_url(origin).unwrap();
    SessionManager::new(api, SessionStore::new(dir))
}

/// Login route returning a token and a bare userInfo (no nickname).
fn login_route() -> Router {
    Router::new().route(
        "/api/claudeApi/login",
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["phone"], "13800138000");
            assert_eq!(body["code"], "123456");
            assert!(body["loginIp"].is_string());
            Json(json!({
                "code": 200,
                "data": {
                    "token": "tok-1",
                    "userInfo": {"id": 42, "phone": "13800138000", "nickname": null}
                }
            }))
        }),
    )
}

fn stats_ok_route() -> Router {
    Router::new().route(
        "/api/claudeApi/userStats/{id}",
        get(|| async {
            Json(json!({
                "code": 200,
                "data": {"requestCount": 7, "inputTokens": 100, "outputTokens": 50, "totalTokens": 150, "totalCost": 0.12}
            }))
        }),
    )
}

#[tokio::test]
async fn test_login_builds_and_persists_session() {
    let origin = common::serve(login_route().merge(stats_ok_route())).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    manager.login("13800138000", "123456").await.unwrap();

    let session = manager.session().expect("session after login");
    assert_eq!(session.id, "42");
    assert_eq!(session.phone, "13800138000");
    assert_eq!(session.display_name, "138****8000");
    assert_eq!(session.auth_token, "tok-1");
    assert_eq!(session.stats.as_ref().map(|s| s.request_count), Some(7));

    // Persisted: session record plus the raw token key
    assert!(dir.path().join("session.json").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("token")).unwrap(),
        "tok-1"
    );
}

#[tokio::test]
async fn test_login_survives_enrichment_failure() {
    // Stats endpoint is down; login must still succeed and persist
    let stats_down = Router::new().route(
        "/api/claudeApi/userStats/{id}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let origin = common::serve(login_route().merge(stats_down)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    manager.login("13800138000", "123456").await.unwrap();

    let session = manager.session().unwrap();
    assert!(session.stats.is_none());
    assert!(dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_login_failure_surfaces_backend_message() {
    let router = Router::new().route(
        "/api/claudeApi/login",
        post(|| async { Json(json!({"code": 401, "data": null, "message": "验证码错误"})) }),
    );
    let origin = common::serve(router).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    let err = manager
        .login("13800138000", "000000")
        .await
        .expect_err("login must fail");
    assert_eq!(err.to_string(), "验证码错误");

    assert!(!manager.is_authenticated());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_login_failure_without_message_gets_fallback() {
    let router = Router::new().route(
        "/api/claudeApi/login",
        post(|| async { Json(json!({"code": 500, "data": null, "message": ""})) }),
    );
    let origin = common::serve(router).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    let err = manager.login("13800138000", "123456").await.unwrap_err();
    assert_eq!(err.to_string(), "login failed");
}

#[tokio::test]
async fn test_refresh_without_session_is_a_precondition_error() {
    let origin = common::serve(Router::new()).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    for err in [
        manager.refresh_profile().await.unwrap_err(),
        manager.refresh_stats().await.unwrap_err(),
        manager.refresh_all().await.unwrap_err(),
    ] {
        assert!(matches!(err, ProxydashError::NotAuthenticated));
    }
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_failed_refresh_leaves_cached_session_untouched() {
    let profile_down = Router::new().route(
        "/api/claudeApi/userInfo/{id}",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let origin = common::serve(login_route().merge(stats_ok_route()).merge(profile_down)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    manager.login("13800138000", "123456").await.unwrap();
    let before_mem = format!("{:?}", manager.session().unwrap());
    let before_disk = std::fs::read(dir.path().join("session.json")).unwrap();

    manager
        .refresh_profile()
        .await
        .expect_err("refresh must fail");

    // Byte-for-byte: nothing moved in memory or on disk
    assert_eq!(format!("{:?}", manager.session().unwrap()), before_mem);
    assert_eq!(
        std::fs::read(dir.path().join("session.json")).unwrap(),
        before_disk
    );
}

#[tokio::test]
async fn test_refresh_all_applies_the_successful_half() {
    let profile_down = Router::new().route(
        "/api/claudeApi/userInfo/{id}",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let fresher_stats = Router::new().route(
        "/api/claudeApi/userStats/{id}",
        get(|| async {
            Json(json!({"code": 200, "data": {"requestCount": 99, "totalTokens": 5000}}))
        }),
    );
    let origin = common::serve(login_route().merge(profile_down).merge(fresher_stats)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    manager.login("13800138000", "123456").await.unwrap();

    // One half fails, the other must still land
    manager.refresh_all().await.unwrap();

    let session = manager.session().unwrap();
    assert_eq!(session.stats.as_ref().map(|s| s.request_count), Some(99));
    assert_eq!(session.display_name, "138****8000");
    assert_eq!(session.id, "42");
}

#[tokio::test]
async fn test_refresh_all_with_both_halves_down_is_an_error() {
    let all_down = Router::new()
        .route(
            "/api/claudeApi/userInfo/{id}",
            get(|| async { StatusCode::BAD_GATEWAY }),
        )
        .route(
            "/api/claudeApi/userStats/{id}",
            get(|| async { StatusCode::BAD_GATEWAY }),
        );
    let origin = common::serve(login_route().merge(all_down)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    // Enrichment failure during login is fine; the session still exists
    manager.login("13800138000", "123456").await.unwrap();
    manager
        .refresh_all()
        .await
        .expect_err("total refresh failure must surface");
}

#[tokio::test]
async fn test_refresh_profile_merges_nondestructively() {
    let richer_profile = Router::new().route(
        "/api/claudeApi/userInfo/{id}",
        get(|| async {
            Json(json!({
                "code": 200,
                "data": {"id": 42, "apiKey": "sk-relay-fresh", "subscriptionType": "pro"}
            }))
        }),
    );
    let origin = common::serve(login_route().merge(stats_ok_route()).merge(richer_profile)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    manager.login("13800138000", "123456").await.unwrap();
    manager.refresh_profile().await.unwrap();

    let session = manager.session().unwrap();
    // Identity and fallback display name survive a profile without nickname
    assert_eq!(session.id, "42");
    assert_eq!(session.phone, "13800138000");
    assert_eq!(session.display_name, "138****8000");
    assert_eq!(
        session
            .profile
            .as_ref()
            .and_then(|p| p.api_key.as_deref()),
        Some("sk-relay-fresh")
    );
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let origin = common::serve(login_route().merge(stats_ok_route())).await;
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_for(dir.path(), &origin);

    manager.login("13800138000", "123456").await.unwrap();

    manager.logout().unwrap();
    manager.logout().unwrap();

    assert!(!manager.is_authenticated());
    assert!(!dir.path().join("session.json").exists());
    assert!(!dir.path().join("token").exists());
}

#[tokio::test]
async fn test_bootstrap_rehydrates_persisted_session() {
    let origin = common::serve(login_route().merge(stats_ok_route())).await;
    let dir = tempfile::tempdir().unwrap();

    {
        let mut manager = manager_for(dir.path(), &origin);
        manager.login("13800138000", "123456").await.unwrap();
    }

    // Simulated process restart
    let mut reborn = manager_for(dir.path(), &origin);
    assert!(!reborn.is_authenticated());
    reborn.bootstrap();
    assert!(reborn.is_authenticated());
    assert_eq!(reborn.session().unwrap().auth_token, "tok-1");
}

#[tokio::test]
async fn test_bootstrap_discards_corrupt_session() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(dir.path().join("session.json"), "{definitely not json").unwrap();

    let origin = common::serve(Router::new()).await;
    let mut manager = manager_for(dir.path(), &origin);
    manager.bootstrap();

    assert!(!manager.is_authenticated());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_request_code_passes_backend_rejection_through() {
    let router = Router::new().route(
        "/api/claudeApi/sendCode",
        get(|| async { Json(json!({"code": 429, "data": null, "message": "发送过于频繁"})) }),
    );
    let origin = common::serve(router).await;
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_for(dir.path(), &origin);

    let err = manager.request_code("13800138000").await.unwrap_err();
    assert_eq!(err.to_string(), "发送过于频繁");
}
