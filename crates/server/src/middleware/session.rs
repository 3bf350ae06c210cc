//! Session middleware configuration.
//!
//! Sessions live in process memory, like every other record, in a bounded
//! [`SessionCache`]. The cookie only carries the session id, signed with the
//! configured secret.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::ExposeSecret;
use tower_sessions::{
    Expiry, SessionManagerLayer,
    cookie::{Key, time::OffsetDateTime},
    service::SignedCookie,
    session::{Id, Record},
    session_store::{self, SessionStore},
};

use crate::config::{ConfigError, ServerConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bizdesk_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Upper bound on live sessions; the least recently used go first.
const SESSION_CACHE_CAPACITY: u64 = 100_000;

/// In-memory session store that forgets idle and expired sessions.
///
/// Entries untouched for the idle period are evicted by moka, and a record
/// whose own expiry date has passed is dropped when it is next loaded.
#[derive(Clone)]
pub struct SessionCache {
    records: Cache<Id, Record>,
}

impl SessionCache {
    #[must_use]
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            records: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Number of sessions currently held (may lag until maintenance runs).
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.records.entry_count()
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.records.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.records.get(session_id).await else {
            return Ok(None);
        };
        if record.expiry_date <= OffsetDateTime::now_utc() {
            self.records.invalidate(session_id).await;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer backed by a fresh [`SessionCache`].
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the session secret is too short
/// to derive a signing key from.
pub fn create_session_layer(
    config: &ServerConfig,
) -> Result<SessionManagerLayer<SessionCache, SignedCookie>, ConfigError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes()).map_err(|e| {
        ConfigError::InsecureSecret("BIZDESK_SESSION_SECRET".to_string(), e.to_string())
    })?;

    let store = SessionCache::new(
        SESSION_CACHE_CAPACITY,
        Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs()),
    );

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
