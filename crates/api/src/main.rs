use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crave_api::background;
use crave_api::config::ServerConfig;
use crave_api::router::build_app_router;
use crave_api::state::{AppState, Integrations};
use crave_events::queue::{DEFAULT_QUEUE_CAPACITY, SHUTDOWN_GRACE};
use crave_events::{EmailConfig, EmailDelivery, Mailer, NotificationQueue, NotificationWorker};
use crave_mpesa::{DarajaClient, MpesaConfig, PaymentGateway};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crave_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = crave_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    crave_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    crave_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Payment gateway ---
    let mpesa_config = MpesaConfig::from_env();
    let mpesa_credentials = mpesa_config.has_credentials();
    if !mpesa_credentials {
        tracing::warn!("MPESA_CONSUMER_KEY/MPESA_CONSUMER_SECRET not set, STK pushes will fail");
    }
    let daraja = DarajaClient::new(mpesa_config).expect("Failed to build M-Pesa HTTP client");
    tracing::info!(
        base_url = %daraja.config().base_url,
        short_code = %daraja.config().short_code,
        "M-Pesa client ready"
    );
    let gateway: Arc<dyn PaymentGateway> = Arc::new(daraja);

    // --- Notifications ---
    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let host = email_config.smtp_host.clone();
            match EmailDelivery::new(email_config) {
                Ok(delivery) => {
                    tracing::info!(%host, "SMTP delivery enabled");
                    let delivery: Arc<dyn Mailer> = Arc::new(delivery);
                    Some(delivery)
                }
                Err(e) => {
                    tracing::error!(error = %e, %host, "Invalid SMTP settings, order emails are disabled");
                    None
                }
            }
        }
        None => {
            tracing::warn!("SMTP_HOST not set, order emails are disabled");
            None
        }
    };

    let integrations = Integrations {
        mpesa_credentials,
        email_enabled: mailer.is_some(),
    };

    let cancel = CancellationToken::new();

    let (notifications, jobs) = NotificationQueue::new(DEFAULT_QUEUE_CAPACITY);
    let (worker, failures) =
        NotificationWorker::new(pool.clone(), mailer, config.admin_email.clone());
    let worker_handle = tokio::spawn(worker.run(jobs, cancel.clone()));
    let failures_handle = tokio::spawn(crave_events::log_failures(failures));
    tracing::info!("Notification worker started");

    // --- Background jobs ---
    let sweep_handle = tokio::spawn(background::session_sweep::run(pool.clone(), cancel.clone()));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
        notifications,
        integrations,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, worker_handle).await;
    // The worker owned the failure sender, so the logger ends with it.
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, failures_handle).await;
    tracing::info!("Notification worker stopped");

    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        sweep_handle,
    )
    .await;
    tracing::info!("Background jobs stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
