//! Integration tests for back-office users and admin sessions.

use chrono::{Duration, Utc};
use crave_db::models::session::CreateAdminSession;
use crave_db::repositories::{AdminSessionRepo, UserRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn upsert_replaces_password_hash(pool: PgPool) {
    let first = UserRepo::upsert(&pool, "admin", "hash-one").await.unwrap();
    let second = UserRepo::upsert(&pool, "admin", "hash-two").await.unwrap();

    assert_eq!(first.id, second.id);
    let stored = UserRepo::find_by_username(&pool, "admin").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "hash-two");
    assert!(UserRepo::find_by_username(&pool, "nobody").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn session_lookup_respects_revocation_and_expiry(pool: PgPool) {
    let user = UserRepo::upsert(&pool, "admin", "hash").await.unwrap();

    let live = AdminSessionRepo::create(
        &pool,
        &CreateAdminSession {
            user_id: user.id,
            token_hash: "live".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        },
    )
    .await
    .unwrap();
    AdminSessionRepo::create(
        &pool,
        &CreateAdminSession {
            user_id: user.id,
            token_hash: "stale".to_string(),
            expires_at: Utc::now() - Duration::hours(1),
        },
    )
    .await
    .unwrap();

    let found = AdminSessionRepo::find_active_by_token_hash(&pool, "live").await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(live.id));
    assert!(AdminSessionRepo::find_active_by_token_hash(&pool, "stale")
        .await
        .unwrap()
        .is_none());

    assert!(AdminSessionRepo::revoke(&pool, live.id).await.unwrap());
    assert!(!AdminSessionRepo::revoke(&pool, live.id).await.unwrap());
    assert!(AdminSessionRepo::find_active_by_token_hash(&pool, "live")
        .await
        .unwrap()
        .is_none());

    let removed = AdminSessionRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(removed, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn revoke_all_for_user_counts_active_sessions(pool: PgPool) {
    let user = UserRepo::upsert(&pool, "admin", "hash").await.unwrap();
    for token in ["a", "b", "c"] {
        AdminSessionRepo::create(
            &pool,
            &CreateAdminSession {
                user_id: user.id,
                token_hash: token.to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(AdminSessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 3);
    assert_eq!(AdminSessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 0);
}
