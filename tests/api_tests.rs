use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use agritrack::api::AppState;
use agritrack::config::Config;
use agritrack::entities::users::Role;

const PASSWORD: &str = "Testpass@123";

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A pooled in-memory sqlite would give every connection its own database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.server.secure_cookies = false;

    let state = agritrack::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    (agritrack::api::router(state.clone()), state)
}

async fn seed_admin(state: &AppState) {
    state
        .store()
        .create_user(
            "admin",
            "admin@example.com",
            PASSWORD,
            Role::Admin,
            &state.config().security,
        )
        .await
        .expect("Failed to seed admin");
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

async fn signup(app: &Router, username: &str, email: &str) -> serde_json::Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": email,
            "password": PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body
}

async fn login(app: &Router, email: &str) -> serde_json::Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({ "email": email, "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body
}

async fn access_token(app: &Router, email: &str) -> String {
    login(app, email).await["data"]["access"]
        .as_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_signup_success_forces_farmer_role() {
    let (app, _state) = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "username": "newuser",
            "email": "NewUser@Example.com",
            "password": PASSWORD,
            // Ignored: role is never caller-controlled on this path.
            "role": "admin",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "farmer");
    assert_eq!(body["data"]["user"]["email"], "newuser@example.com");
    assert!(body["data"]["tokens"]["access"].is_string());
    assert!(body["data"]["tokens"]["refresh"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_email_is_field_level_error() {
    let (app, state) = spawn_app().await;

    signup(&app, "first", "dup@example.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "username": "second",
            "email": "DUP@Example.COM",
            "password": PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
    assert!(body["error"].is_string());

    // No second user was created.
    assert_eq!(state.store().list_farmers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_signup_rejects_weak_passwords() {
    let (app, _state) = spawn_app().await;

    for (password, _reason) in [("short1", "too short"), ("123456789", "all numeric")] {
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/signup",
            None,
            Some(serde_json::json!({
                "username": "weak",
                "email": "weak@example.com",
                "password": password,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "password");
    }
}

#[tokio::test]
async fn test_login_returns_role_and_username_claims() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;

    let body = login(&app, "farmer1@example.com").await;
    assert_eq!(body["data"]["role"], "farmer");
    assert_eq!(body["data"]["username"], "farmer1");
    assert!(body["data"]["access"].is_string());
    assert!(body["data"]["refresh"].is_string());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({
            "email": "farmer1@example.com",
            "password": "WrongPass123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_logout_without_cookie_still_succeeds() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("refresh_token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_refresh_token_lifecycle() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;

    let refresh = login(&app, "farmer1@example.com").await["data"]["refresh"]
        .as_str()
        .unwrap()
        .to_string();

    // A valid refresh token yields a new access token.
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/token/refresh",
        None,
        Some(serde_json::json!({ "refresh": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access"].is_string());

    // Logout with the cookie revokes it.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::COOKIE, format!("refresh_token={refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The revoked token no longer refreshes.
    let (status, _body) = send_json(
        &app,
        "POST",
        "/api/token/refresh",
        None,
        Some(serde_json::json!({ "refresh": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage never did.
    let (status, _body) = send_json(
        &app,
        "POST",
        "/api/token/refresh",
        None,
        Some(serde_json::json!({ "refresh": "garbage" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;
    let access = access_token(&app, "farmer1@example.com").await;

    let (status, _body) = send_json(
        &app,
        "POST",
        "/api/token/refresh",
        None,
        Some(serde_json::json!({ "refresh": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_requires_authentication() {
    let (app, _state) = spawn_app().await;

    let (status, _body) = send_json(&app, "GET", "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _body) =
        send_json(&app, "GET", "/api/profile", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_profile_returns_own_record() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;
    let token = access_token(&app, "farmer1@example.com").await;

    let (status, body) = send_json(&app, "GET", "/api/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "farmer1");
    assert_eq!(body["data"]["email"], "farmer1@example.com");
    // Placeholder icon resolves to an absolute URL.
    assert!(
        body["data"]["profile_icon"]
            .as_str()
            .unwrap()
            .ends_with("/media/profileIcon.png")
    );
}

fn multipart_request(uri: &str, token: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "----agritrack-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("{}; boundary={boundary}", mime::MULTIPART_FORM_DATA),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_update_profile_success() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;
    let token = access_token(&app, "farmer1@example.com").await;

    let request = multipart_request(
        "/api/profile/update",
        &token,
        &[
            ("username", "updatedusername"),
            ("email", "Updated@Example.com"),
        ],
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["username"], "updatedusername");
    assert_eq!(body["data"]["email"], "updated@example.com");
}

#[tokio::test]
async fn test_update_profile_duplicate_email_leaves_record_untouched() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;
    signup(&app, "other", "other@example.com").await;
    let token = access_token(&app, "farmer1@example.com").await;

    let request = multipart_request(
        "/api/profile/update",
        &token,
        &[("email", "other@example.com")],
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let (status, body) = send_json(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "farmer1@example.com");
}

#[tokio::test]
async fn test_update_profile_invalid_email() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer1", "farmer1@example.com").await;
    let token = access_token(&app, "farmer1@example.com").await;

    let request =
        multipart_request("/api/profile/update", &token, &[("email", "not-an-email")]);

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Admin farmer management
// ============================================================================

#[tokio::test]
async fn test_farmer_management_is_admin_only() {
    let (app, state) = spawn_app().await;
    seed_admin(&state).await;
    signup(&app, "farmer1", "farmer1@example.com").await;
    let farmer_token = access_token(&app, "farmer1@example.com").await;

    let (status, _body) = send_json(&app, "GET", "/api/farmers", Some(&farmer_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _body) = send_json(
        &app,
        "POST",
        "/api/farmers",
        Some(&farmer_token),
        Some(serde_json::json!({
            "username": "failfarmer",
            "email": "failfarmer@example.com",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _body) = send_json(&app, "GET", "/api/farmers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_farmer_crud() {
    let (app, state) = spawn_app().await;
    seed_admin(&state).await;
    let admin_token = access_token(&app, "admin@example.com").await;

    // Create
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/farmers",
        Some(&admin_token),
        Some(serde_json::json!({
            "username": "newfarmer",
            "email": "newfarmer@example.com",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "farmer");
    let farmer_id = body["data"]["id"].as_i64().unwrap();

    // List is newest-first and contains the new account
    let (status, body) = send_json(&app, "GET", "/api/farmers", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["username"], "newfarmer");

    // Retrieve
    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/farmers/{farmer_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "newfarmer");

    // Update
    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/farmers/{farmer_id}"),
        Some(&admin_token),
        Some(serde_json::json!({ "username": "updatedfarmer", "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "updatedfarmer");
    assert_eq!(body["data"]["is_active"], false);

    // A deactivated farmer can no longer log in.
    let (status, _body) = send_json(
        &app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({
            "email": "newfarmer@example.com",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Delete
    let (status, _body) = send_json(
        &app,
        "DELETE",
        &format!("/api/farmers/{farmer_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) = send_json(
        &app,
        "GET",
        &format!("/api/farmers/{farmer_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_accounts_are_invisible_to_farmer_detail_path() {
    let (app, state) = spawn_app().await;
    seed_admin(&state).await;
    let admin_token = access_token(&app, "admin@example.com").await;

    let admin_id = state
        .store()
        .verify_credentials("admin@example.com", PASSWORD)
        .await
        .unwrap()
        .unwrap()
        .id;

    let (status, _body) = send_json(
        &app,
        "GET",
        &format!("/api/farmers/{admin_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Crops
// ============================================================================

async fn create_crop(
    app: &Router,
    token: &str,
    name: &str,
    crop_type: &str,
    quantity: i64,
) -> serde_json::Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/farmer/crops",
        Some(token),
        Some(serde_json::json!({
            "name": name,
            "crop_type": crop_type,
            "quantity": quantity,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "crop create failed: {body}");
    body
}

#[tokio::test]
async fn test_crop_lists_are_owner_scoped_for_farmers() {
    let (app, state) = spawn_app().await;
    seed_admin(&state).await;

    signup(&app, "farmer_a", "farmer_a@example.com").await;
    signup(&app, "farmer_b", "farmer_b@example.com").await;
    let token_a = access_token(&app, "farmer_a@example.com").await;
    let token_b = access_token(&app, "farmer_b@example.com").await;
    let admin_token = access_token(&app, "admin@example.com").await;

    create_crop(&app, &token_a, "Wheat", "cereal", 10).await;
    create_crop(&app, &token_a, "Beans", "legume", 4).await;
    create_crop(&app, &token_b, "Corn", "cereal", 20).await;

    let (status, body) = send_json(&app, "GET", "/api/farmer/crops", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    let crops_a = body["data"].as_array().unwrap();
    assert_eq!(crops_a.len(), 2);
    assert!(crops_a.iter().all(|c| c["farmer"] == "farmer_a"));

    // Newest first
    assert_eq!(crops_a[0]["name"], "Beans");

    // An admin sees every farmer's crops on the same endpoint.
    let (status, body) =
        send_json(&app, "GET", "/api/farmer/crops", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_crop_create_validates_boundary() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer_a", "farmer_a@example.com").await;
    let token = access_token(&app, "farmer_a@example.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/farmer/crops",
        Some(&token),
        Some(serde_json::json!({ "name": "Wheat", "crop_type": "mineral", "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "crop_type");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/farmer/crops",
        Some(&token),
        Some(serde_json::json!({ "name": "Wheat", "crop_type": "cereal", "quantity": -3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "quantity");
}

#[tokio::test]
async fn test_foreign_crop_is_not_found_and_unmodified() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer_a", "farmer_a@example.com").await;
    signup(&app, "farmer_b", "farmer_b@example.com").await;
    let token_a = access_token(&app, "farmer_a@example.com").await;
    let token_b = access_token(&app, "farmer_b@example.com").await;

    let crop = create_crop(&app, &token_a, "Wheat", "cereal", 10).await;
    let crop_id = crop["data"]["id"].as_i64().unwrap();

    // B cannot see, update, or delete A's crop; the pre-filtered query makes
    // it look absent rather than forbidden.
    let uri = format!("/api/farmer/crops/{crop_id}");

    let (status, _body) = send_json(&app, "GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _body) = send_json(
        &app,
        "PATCH",
        &uri,
        Some(&token_b),
        Some(serde_json::json!({ "quantity": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _body) = send_json(&app, "DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still intact for the owner.
    let (status, body) = send_json(&app, "GET", &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 10);
}

#[tokio::test]
async fn test_owner_crop_update_and_delete() {
    let (app, _state) = spawn_app().await;
    signup(&app, "farmer_a", "farmer_a@example.com").await;
    let token = access_token(&app, "farmer_a@example.com").await;

    let crop = create_crop(&app, &token, "Wheat", "cereal", 10).await;
    let crop_id = crop["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/farmer/crops/{crop_id}");

    let (status, body) = send_json(
        &app,
        "PATCH",
        &uri,
        Some(&token),
        Some(serde_json::json!({ "quantity": 25, "crop_type": "legume" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 25);
    assert_eq!(body["data"]["crop_type"], "legume");
    assert_eq!(body["data"]["name"], "Wheat");

    let (status, _body) = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) = send_json(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_surface_can_act_across_owners() {
    let (app, state) = spawn_app().await;
    seed_admin(&state).await;

    signup(&app, "farmer_a", "farmer_a@example.com").await;
    let token_a = access_token(&app, "farmer_a@example.com").await;
    let admin_token = access_token(&app, "admin@example.com").await;

    let crop = create_crop(&app, &token_a, "Wheat", "cereal", 10).await;
    let crop_id = crop["data"]["id"].as_i64().unwrap();

    // The admin detail surface is not owner-scoped.
    let uri = format!("/api/crops/{crop_id}");

    let (status, body) = send_json(&app, "GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["farmer"], "farmer_a");

    let (status, body) = send_json(
        &app,
        "PATCH",
        &uri,
        Some(&admin_token),
        Some(serde_json::json!({ "quantity": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 12);

    let (status, _body) = send_json(&app, "DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Farmers never reach the admin surface.
    let (status, _body) = send_json(&app, "GET", "/api/crops", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_creates_crop_on_behalf_of_farmer() {
    let (app, state) = spawn_app().await;
    seed_admin(&state).await;

    let farmer = signup(&app, "farmer_a", "farmer_a@example.com").await;
    let farmer_id = farmer["data"]["user"]["id"].as_i64().unwrap();
    let admin_token = access_token(&app, "admin@example.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/crops",
        Some(&admin_token),
        Some(serde_json::json!({
            "farmer_id": farmer_id,
            "name": "Cassava",
            "crop_type": "root_tuber",
            "quantity": 7,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["farmer"], "farmer_a");

    // Unknown target farmer is a field-level validation error.
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/crops",
        Some(&admin_token),
        Some(serde_json::json!({
            "farmer_id": 9999,
            "name": "Cassava",
            "crop_type": "root_tuber",
            "quantity": 7,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "farmer_id");
}
