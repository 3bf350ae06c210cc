//! Bizdesk - back-office web application.
//!
//! Serves inventory, sales, staff and feedback pages for a small business.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates for server-side rendering
//! - In-memory record store (nothing survives a restart)
//! - tower-sessions with signed cookies for login state and flash notices
//! - SMTP via lettre for the feedback mailbox

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use bizdesk_server::config::{AdminPassword, ServerConfig};
use bizdesk_server::routes;
use bizdesk_server::services::{DisabledNotifier, DynNotifier, SmtpNotifier};
use bizdesk_server::state::AppState;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Tracing target for notices meant only for the local operator console.
const CONSOLE_ONLY_TARGET: &str = "bizdesk_server::console";

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    // Never ship console-only notices (they may carry credentials)
    if metadata.target() == CONSOLE_ONLY_TARGET {
        return sentry_tracing::EventFilter::Ignore;
    }

    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Pick the feedback transport: SMTP when credentials are configured.
fn build_notifier(config: &ServerConfig) -> DynNotifier {
    let Some(mail) = config.mail.as_ref() else {
        tracing::warn!("MAIL_USERNAME/MAIL_PASSWORD not set; feedback delivery is disabled");
        return Arc::new(DisabledNotifier);
    };

    match SmtpNotifier::new(mail) {
        Ok(notifier) => {
            tracing::info!(
                smtp_host = %mail.smtp_host,
                smtp_port = mail.smtp_port,
                recipient = %mail.feedback_recipient,
                "Feedback mail enabled"
            );
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up SMTP; feedback delivery is disabled");
            Arc::new(DisabledNotifier)
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bizdesk_server=info,tower_http=debug".into());

    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let AdminPassword::Generated(password) = &config.admin.password {
        tracing::warn!(
            target: CONSOLE_ONLY_TARGET,
            username = %config.admin.username,
            password = %password.expose_secret(),
            "No BIZDESK_ADMIN_PASSWORD set; generated a one-time operator password"
        );
    }

    let notifier = build_notifier(&config);

    // Build application state (seeds the operator account)
    let state = AppState::new(config.clone(), notifier)
        .await
        .expect("Failed to create application state");

    // Build router
    let app = routes::app(state)
        .expect("Failed to build router")
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("bizdesk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
