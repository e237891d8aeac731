// Session store: the bearer token and user profile, persisted redundantly to
// a cookie jar and a key-value store.

pub mod cookie_jar;
pub mod kv_store;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

pub use cookie_jar::{Cookie, CookieJar};
pub use kv_store::KvStore;

use crate::config::SessionConfig;

/// Cookie and key-value entry holding the bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Key-value entry holding the JSON user profile.
pub const PROFILE_KEY: &str = "auth_user";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

// ---------------------------------------------------------------------------
// Storage capability
// ---------------------------------------------------------------------------

/// A client-side string store. Implemented by the cookie jar and the
/// key-value store so the session can write to both the same way.
pub trait TokenStore: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Session data
// ---------------------------------------------------------------------------

/// The authenticated session established by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub is_admin: bool,
    pub user_id: Option<i64>,
}

/// Profile record stored under `auth_user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(rename = "esAdmin", default)]
    pub is_admin: bool,
    #[serde(rename = "codUsuario", default)]
    pub user_id: Option<i64>,
}

impl UserProfile {
    pub fn role_label(&self) -> &'static str {
        if self.is_admin {
            "Administrador"
        } else {
            "Usuario"
        }
    }
}

/// Session lifecycle signal broadcast to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    /// Nothing has happened since startup.
    Idle,
    Established,
    /// The session was torn down; the UI must navigate to the login screen.
    Ended(EndReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Logout,
    /// The backend rejected the token with a 401.
    Unauthorized,
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Process-wide session state. Shared as `Arc<SessionStore>` between the HTTP
/// client, the auth flow and the application loop.
///
/// Reads and writes never fail towards the caller: a store that errors is
/// logged and treated as empty.
pub struct SessionStore {
    cookies: Arc<dyn TokenStore>,
    kv: Arc<dyn TokenStore>,
    signal: watch::Sender<SessionSignal>,
}

impl SessionStore {
    pub fn new(cookies: Arc<dyn TokenStore>, kv: Arc<dyn TokenStore>) -> Self {
        let (signal, _) = watch::channel(SessionSignal::Idle);
        Self { cookies, kv, signal }
    }

    /// Open both backends from configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self, StoreError> {
        let cookies = CookieJar::open(config.resolved_cookie_jar_path(), config.cookie_ttl_hours)?;
        let kv = KvStore::open(config.resolved_store_path())?;
        Ok(Self::new(Arc::new(cookies), Arc::new(kv)))
    }

    /// Ephemeral store with an in-memory jar and an in-memory SQLite database.
    pub fn in_memory() -> Result<Self, StoreError> {
        let cookies = CookieJar::in_memory(24);
        let kv = KvStore::open(":memory:")?;
        Ok(Self::new(Arc::new(cookies), Arc::new(kv)))
    }

    /// Persist the token to both stores and the profile to the key-value
    /// store. Every write is attempted even if an earlier one fails.
    pub fn establish(&self, session: &Session) {
        self.write(self.cookies.as_ref(), TOKEN_KEY, &session.token);
        self.write(self.kv.as_ref(), TOKEN_KEY, &session.token);

        let profile = UserProfile {
            username: session.username.clone(),
            is_admin: session.is_admin,
            user_id: session.user_id,
        };
        match serde_json::to_string(&profile) {
            Ok(json) => self.write(self.kv.as_ref(), PROFILE_KEY, &json),
            Err(e) => warn!("failed to serialize user profile: {e}"),
        }

        info!(username = %session.username, admin = session.is_admin, "session established");
        self.signal.send_replace(SessionSignal::Established);
    }

    /// Cookie value if present and unexpired, else the key-value copy.
    pub fn current_token(&self) -> Option<String> {
        self.read(self.cookies.as_ref(), TOKEN_KEY)
            .or_else(|| self.read(self.kv.as_ref(), TOKEN_KEY))
            .filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    /// Profile from the key-value store. Missing or malformed yields `None`.
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.read(self.kv.as_ref(), PROFILE_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| warn!("stored user profile is malformed: {e}"))
            .ok()
    }

    /// Numeric user id of the signed-in user, from the key-value profile.
    pub fn user_id(&self) -> Option<i64> {
        self.profile().and_then(|p| p.user_id)
    }

    /// Delete the cookie and both key-value entries, then signal navigation to
    /// the login screen.
    pub fn teardown(&self, reason: EndReason) {
        self.delete(self.cookies.as_ref(), TOKEN_KEY);
        self.delete(self.kv.as_ref(), TOKEN_KEY);
        self.delete(self.kv.as_ref(), PROFILE_KEY);

        info!(?reason, "session torn down");
        self.signal.send_replace(SessionSignal::Ended(reason));
    }

    /// Subscribe to lifecycle signals.
    pub fn subscribe(&self) -> watch::Receiver<SessionSignal> {
        self.signal.subscribe()
    }

    // --- store helpers ---

    fn read(&self, store: &dyn TokenStore, key: &str) -> Option<String> {
        store
            .get(key)
            .map_err(|e| warn!("{} read of {key} failed: {e}", store.name()))
            .ok()
            .flatten()
    }

    fn write(&self, store: &dyn TokenStore, key: &str, value: &str) {
        if let Err(e) = store.set(key, value) {
            warn!("{} write of {key} failed: {e}", store.name());
        }
    }

    fn delete(&self, store: &dyn TokenStore, key: &str) {
        if let Err(e) = store.remove(key) {
            warn!("{} removal of {key} failed: {e}", store.name());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
