//! Handlers for back-office login and logout.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crave_core::error::CoreError;
use crave_db::models::session::CreateAdminSession;
use crave_db::repositories::{AdminSessionRepo, UserRepo};

use crate::auth::password::verify_password;
use crate::auth::session::{generate_session_token, ADMIN_SESSION_COOKIE};
use crate::cookies;
use crate::error::{AppError, AppResult};
use crate::middleware::admin::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::LoginResult;

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

/// POST /admin/login
///
/// On success the plaintext token goes to the browser in the
/// `admin_session` cookie; only its digest is stored.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(username = %user.username, "Failed admin login");
        return Err(invalid_credentials());
    }

    let ttl_hours = state.config.admin_session_ttl_hours;
    let expires_at = Utc::now() + Duration::hours(ttl_hours);
    let (token, token_hash) = generate_session_token();
    AdminSessionRepo::create(
        &state.pool,
        &CreateAdminSession {
            user_id: user.id,
            token_hash,
            expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Admin logged in");

    let cookie = cookies::build(
        ADMIN_SESSION_COOKIE,
        &token,
        ttl_hours * 3600,
        state.config.cookie_secure,
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: LoginResult {
                username: user.username,
                expires_at,
            },
        }),
    ))
}

/// POST /admin/logout
pub async fn logout(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<impl IntoResponse> {
    AdminSessionRepo::revoke(&state.pool, admin.session_id).await?;
    tracing::info!(user_id = admin.user_id, "Admin logged out");

    Ok((
        StatusCode::NO_CONTENT,
        [(
            SET_COOKIE,
            cookies::clear(ADMIN_SESSION_COOKIE, state.config.cookie_secure),
        )],
    ))
}
