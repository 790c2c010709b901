//! HTTP-level integration tests for the `/users` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth, signup_and_login,
    signup_body,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = false)]
async fn test_list_and_get_users(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (me, token) = signup_and_login(&app, "lister").await;
    post_json(app.clone(), "/api/v1/auth/signup", signup_body("other")).await;

    let response = get_auth(app.clone(), "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let uri = format!("/api/v1/users/{}", me["user_id"].as_str().unwrap());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "lister@example.com");
    assert_eq!(json["data"]["roles"], json!([]));
}

#[sqlx::test(migrations = false)]
async fn test_get_missing_user_is_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (_me, token) = signup_and_login(&app, "seeker").await;

    let response = get_auth(app, "/api/v1/users/does-not-exist", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = false)]
async fn test_create_user_via_api(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (_me, token) = signup_and_login(&app, "admin").await;

    let response = post_json_auth(app.clone(), "/api/v1/users", signup_body("created"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(app, "/api/v1/users", signup_body("created"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = false)]
async fn test_lookup_by_email(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (me, token) = signup_and_login(&app, "findme").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/users/lookup",
        json!({ "email": "findme@example.com" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["user_id"], me["user_id"]);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/users/lookup",
        json!({ "email": "nobody@example.com" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/v1/users/lookup",
        json!({ "email": "not-an-email" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = false)]
async fn test_update_profile_keeps_login_working(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (me, token) = signup_and_login(&app, "mover").await;
    let uri = format!("/api/v1/users/{}", me["user_id"].as_str().unwrap());

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({
            "username": "mover",
            "email": "moved@example.com",
            "fullname": "Mover Moved",
            "avatar": "https://img.example.com/m.png"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "moved@example.com");
    assert_eq!(json["data"]["phone_number"], serde_json::Value::Null);

    // The password hash survived the profile update.
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "moved@example.com", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = false)]
async fn test_change_password(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (me, token) = signup_and_login(&app, "rotator").await;
    let uri = format!("/api/v1/users/{}/password", me["user_id"].as_str().unwrap());

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "new_password": "short" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "new_password": "a-much-better-password" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let old = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "rotator@example.com", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "rotator@example.com", "password": "a-much-better-password" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[sqlx::test(migrations = false)]
async fn test_delete_user(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (_me, token) = signup_and_login(&app, "deleter").await;
    let response = post_json(app.clone(), "/api/v1/auth/signup", signup_body("doomed")).await;
    let doomed = body_json(response).await["data"]["user_id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/v1/users/{doomed}");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = false)]
async fn test_cannot_change_another_users_password(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let (victim, _) = signup_and_login(&app, "victim").await;
    let (_attacker, attacker_token) = signup_and_login(&app, "attacker").await;
    let uri = format!("/api/v1/users/{}/password", victim["user_id"].as_str().unwrap());

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "new_password": "attacker-chosen-password" }),
        &attacker_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let hijack = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "victim@example.com", "password": "attacker-chosen-password" }),
    )
    .await;
    assert_eq!(hijack.status(), StatusCode::UNAUTHORIZED);

    let original = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "victim@example.com", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(original.status(), StatusCode::OK);
}
