use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::services::UserInfo;

const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub api_key: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Identity established by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let username = match session_username(&session).await {
        Some(user) => Some(user),
        None => match extract_api_key(&headers) {
            Some(key) => state
                .auth_service()
                .verify_api_key(&key)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "API key verification failed");
                    None
                }),
            None => None,
        },
    };

    let Some(username) = username else {
        return ApiError::unauthorized().into_response();
    };

    tracing::Span::current().record("user_id", username.as_str());
    request.extensions_mut().insert(CurrentUser { username });
    next.run(request).await
}

/// Gate for HTML pages: anonymous browsers are sent to the sign-in page.
pub async fn page_guard(session: Session, request: Request, next: Next) -> Response {
    if session_username(&session).await.is_some() {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

async fn session_username(session: &Session) -> Option<String> {
    session
        .get::<String>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten()
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    session
        .insert(SESSION_USER_KEY, &result.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = %result.username, "User logged in");

    Ok(Json(ApiResponse::success(LoginResponse {
        username: result.username,
        api_key: result.api_key,
    })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to flush session on logout");
    }
    Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service().get_user_info(&user.username).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// POST /auth/api-key/regenerate
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state
        .auth_service()
        .regenerate_api_key(&user.username)
        .await?;

    tracing::info!(user_id = %user.username, "API key regenerated");

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}
