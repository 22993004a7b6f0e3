use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use super::validation::{validate_email, validate_password, validate_username};
use super::{
    ApiError, ApiResponse, AppState, LoginRequest, LoginResponse, MessageResponse, RefreshRequest,
    RefreshResponse, SignupRequest, SignupResponse, UserDto,
};
use crate::entities::users::Role;
use crate::services::TokenKind;

const REFRESH_COOKIE: &str = "refresh_token";

/// Authenticated identity resolved from access-token claims. Threaded into
/// handlers explicitly via `Extension`; never read from ambient state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves `Authorization: Bearer <access token>` into a [`CurrentUser`]
/// request extension. Claims are trusted as-is after the signature and expiry
/// check; no storage round-trip per request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided"))?;

    let claims = state.tokens().verify(&token, TokenKind::Access)?;

    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::unauthorized("Invalid token"))?;

    tracing::Span::current().record("user_id", claims.username.as_str());

    request.extensions_mut().insert(CurrentUser {
        id: user_id,
        username: claims.username,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match user.role {
        Role::Admin => Ok(next.run(request).await),
        Role::Farmer => Err(ApiError::forbidden("Admin access required")),
    }
}

pub async fn require_farmer(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match user.role {
        Role::Farmer => Ok(next.run(request).await),
        Role::Admin => Err(ApiError::forbidden("Farmer access required")),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /signup
/// Create a Farmer account. Role is forced to Farmer no matter what the
/// request body carries.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<SignupResponse>>), ApiError> {
    let username = validate_username(&payload.username)?;
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password, state.config().security.min_password_length)?;

    let user = state
        .store()
        .create_user(
            username,
            email,
            &payload.password,
            Role::Farmer,
            &state.config().security,
        )
        .await?;

    let tokens = state.tokens().issue_pair(&user)?;

    tracing::info!(username = %user.username, "New farmer signed up");

    let jar = jar.add(refresh_cookie(
        tokens.refresh.clone(),
        &state.config().server,
        state.config().security.refresh_ttl_days,
    ));

    let response = SignupResponse {
        user: UserDto::from_user(user, &state.config().server.base_url),
        tokens,
    };

    Ok((StatusCode::CREATED, jar, Json(ApiResponse::success(response))))
}

/// POST /login
/// Authenticate by case-normalized email and password. Failures are a flat
/// 401 with no tokens.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let user = state
        .store()
        .verify_credentials(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let tokens = state.tokens().issue_pair(&user)?;

    let jar = jar.add(refresh_cookie(
        tokens.refresh.clone(),
        &state.config().server,
        state.config().security.refresh_ttl_days,
    ));

    Ok((
        jar,
        Json(ApiResponse::success(LoginResponse {
            access: tokens.access,
            refresh: tokens.refresh,
            role: user.role,
            username: user.username,
        })),
    ))
}

/// POST /logout
/// Revoke the refresh token carried by the cookie, if any. Always succeeds
/// and always clears the cookie; a missing, malformed, or already-revoked
/// token is not an error.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    if let Some(cookie) = jar.get(REFRESH_COOKIE)
        && let Ok(claims) = state.tokens().verify(cookie.value(), TokenKind::Refresh)
        && let Err(e) = state.store().revoke_token(&claims.jti, claims.exp).await
    {
        tracing::debug!("Ignoring blacklist failure during logout: {e}");
    }

    let jar = jar.add(clear_refresh_cookie(&state.config().server));

    (
        jar,
        Json(ApiResponse::success(MessageResponse {
            message: "Successfully logged out!".to_string(),
        })),
    )
}

/// POST /token/refresh
/// Trade a valid, non-revoked refresh token for a fresh access token.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let claims = state.tokens().verify(&payload.refresh, TokenKind::Refresh)?;

    let revoked = state
        .store()
        .is_token_revoked(&claims.jti)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if revoked {
        return Err(ApiError::unauthorized("Refresh token has been revoked"));
    }

    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::unauthorized("Invalid token"))?;

    let access = state
        .tokens()
        .issue_access(user_id, &claims.username, claims.role)?;

    Ok(Json(ApiResponse::success(RefreshResponse { access })))
}

// ============================================================================
// Cookies
// ============================================================================

fn refresh_cookie(
    token: String,
    server: &crate::config::ServerConfig,
    ttl_days: i64,
) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .secure(server.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(ttl_days))
        .path("/")
        .build()
}

fn clear_refresh_cookie(server: &crate::config::ServerConfig) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .http_only(true)
        .secure(server.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}
