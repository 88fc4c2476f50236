//! Admin session model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use crave_core::types::{DbId, Timestamp};

/// A row from the `admin_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminSession {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

/// DTO for opening a session. Only the token hash is persisted.
#[derive(Debug, Clone)]
pub struct CreateAdminSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
