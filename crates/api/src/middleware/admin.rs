//! Admin session extractor for back-office handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use crave_core::error::CoreError;
use crave_core::types::DbId;
use crave_db::repositories::AdminSessionRepo;

use crate::auth::session::{hash_session_token, ADMIN_SESSION_COOKIE};
use crate::cookies;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated back-office user, resolved from the `admin_session`
/// cookie against the `admin_sessions` table.
///
/// ```ignore
/// async fn dashboard(State(state): State<AppState>, admin: AdminSession) -> AppResult<...> {
///     tracing::debug!(user_id = admin.user_id, "dashboard");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub session_id: DbId,
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookies::read(&parts.headers, ADMIN_SESSION_COOKIE)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Admin login required".into()))
            })?;

        let session =
            AdminSessionRepo::find_active_by_token_hash(&state.pool, &hash_session_token(&token))
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized(
                        "Admin session is invalid or expired".into(),
                    ))
                })?;

        Ok(AdminSession {
            session_id: session.id,
            user_id: session.user_id,
        })
    }
}
