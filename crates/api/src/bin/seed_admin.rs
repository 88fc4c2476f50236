//! Create or reset the back-office account.
//!
//! ```text
//! ADMIN_USERNAME=owner ADMIN_PASSWORD=... crave-seed-admin
//! ```
//!
//! Running it again for an existing username replaces the password and
//! signs out every open session of that user.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crave_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LEN};
use crave_db::repositories::{AdminSessionRepo, UserRepo};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crave_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let username = std::env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?;
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

    let username = username.trim();
    if username.is_empty() {
        return Err(anyhow!("ADMIN_USERNAME cannot be empty"));
    }
    validate_password_strength(&password, MIN_PASSWORD_LEN).map_err(|e| anyhow!(e))?;

    let pool = crave_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    crave_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let password_hash =
        hash_password(&password).map_err(|e| anyhow!("Failed to hash password: {e}"))?;
    let user = UserRepo::upsert(&pool, username, &password_hash)
        .await
        .context("Failed to store admin user")?;
    let revoked = AdminSessionRepo::revoke_all_for_user(&pool, user.id)
        .await
        .context("Failed to revoke existing sessions")?;

    tracing::info!(user_id = user.id, username = %user.username, revoked, "Admin user ready");
    Ok(())
}
