//! Integration tests for Bizdesk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bizdesk-integration-tests
//! ```
//!
//! Each test spawns the real router on an ephemeral localhost port with a
//! fresh in-memory store, then drives it with a cookie-carrying `reqwest`
//! client. Nothing external is needed: feedback mail goes to a
//! [`RecordingNotifier`] (or a failing stand-in) instead of SMTP.
//!
//! # Test Categories
//!
//! - `auth` - Login, registration, logout and route protection
//! - `records` - Products, sales, employees, low stock, profit and loss
//! - `feedback` - Feedback form and mail failure handling
//! - `health` - Liveness and request IDs

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use tokio::sync::Mutex;

use bizdesk_core::Username;
use bizdesk_server::config::{AdminPassword, AdminSeed, ServerConfig};
use bizdesk_server::routes;
use bizdesk_server::services::{DynNotifier, FeedbackMessage, Notifier, NotifyError};
use bizdesk_server::state::AppState;

/// Session secret used by every test server.
pub const TEST_SESSION_SECRET: &str =
    "k3J9xQ2mZ7vB1nR8tY4wE6uI0oP5aS-dF2gH7jK9lL3zX8cV1bN4mQ6wE0rT5yU2iO";

/// Seeded operator account.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "operator-pass-123";

/// Configuration for an in-process test server.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        admin: AdminSeed {
            username: Username::parse(ADMIN_USERNAME).expect("valid username"),
            password: AdminPassword::Plain(SecretString::from(ADMIN_PASSWORD)),
        },
        low_stock_threshold: 5,
        mail: None,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Notifier that keeps every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<FeedbackMessage>>,
}

impl RecordingNotifier {
    /// Messages received so far.
    pub async fn sent(&self) -> Vec<FeedbackMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_feedback(&self, feedback: &FeedbackMessage) -> Result<(), NotifyError> {
        self.sent.lock().await.push(feedback.clone());
        Ok(())
    }
}

/// Notifier whose transport always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_feedback(&self, _feedback: &FeedbackMessage) -> Result<(), NotifyError> {
        Err(NotifyError::InvalidAddress("relay refused recipient".to_string()))
    }
}

/// A running test server plus a client that keeps its session cookie.
pub struct TestApp {
    pub address: SocketAddr,
    pub client: Client,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    /// Spawn a server whose feedback mail is recorded.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        Self::spawn_inner(notifier.clone(), notifier).await
    }

    /// Spawn a server that delivers feedback through `notifier`.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn_with_notifier(notifier: DynNotifier) -> Self {
        Self::spawn_inner(notifier, Arc::new(RecordingNotifier::default())).await
    }

    async fn spawn_inner(notifier: DynNotifier, recorder: Arc<RecordingNotifier>) -> Self {
        let state = AppState::new(test_config(), notifier)
            .await
            .expect("Failed to create application state");
        let app = routes::app(state.clone()).expect("Failed to build router");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            state,
            notifier: recorder,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    /// GET `path` without following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a url-encoded form to `path` without following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET `path` and return the body text.
    ///
    /// # Panics
    ///
    /// Panics if the request or body read fails.
    pub async fn page(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("Failed to read body")
    }

    /// Log in as `username`.
    ///
    /// # Panics
    ///
    /// Panics if login is rejected.
    pub async fn login(&self, username: &str, password: &str) {
        let resp = self
            .post_form("/login", &[("username", username), ("password", password)])
            .await;
        assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER, "login rejected");
        assert_eq!(location(&resp), "/");
    }

    /// Log in as the seeded operator.
    ///
    /// # Panics
    ///
    /// Panics if login is rejected.
    pub async fn login_as_admin(&self) {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    }
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
