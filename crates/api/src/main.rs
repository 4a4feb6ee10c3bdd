use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use quotedesk_api::config::{LogFormat, ServerConfig};
use quotedesk_api::mailer::Mailer;
use quotedesk_api::router::build_app_router;
use quotedesk_api::state::AppState;
use quotedesk_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "quotedesk_api=debug,quotedesk_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    let pool = prepare_database().await;
    let mailer = build_mailer(&config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Quote desk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connect, verify and migrate. Startup aborts on any failure.
async fn prepare_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = quotedesk_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");
    quotedesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    quotedesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

/// SMTP mailer when `SMTP_HOST` is configured.
fn build_mailer(config: &ServerConfig) -> Option<Arc<Mailer>> {
    let Some(mail) = &config.mail else {
        tracing::warn!("SMTP_HOST not set, inquiries will be recorded but not mailed");
        return None;
    };
    let mailer = Mailer::new(mail).expect("Invalid SMTP configuration");
    tracing::info!(smtp_host = %mail.smtp_host, smtp_port = mail.smtp_port, "SMTP mailer configured");
    Some(Arc::new(mailer))
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
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

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down");
}
