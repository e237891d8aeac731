// Cookie jar: name/value records with a path and an expiry, persisted as JSON.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StoreError, TokenStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires_at: DateTime<Utc>,
}

impl Cookie {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Cookie jar backed by an optional JSON file. Without a file the jar lives
/// only in memory.
pub struct CookieJar {
    file: Option<PathBuf>,
    ttl: Duration,
    cookies: Mutex<Vec<Cookie>>,
}

impl CookieJar {
    /// Open the jar at `path`. A missing file starts an empty jar; a file that
    /// does not parse is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>, ttl_hours: u32) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let cookies = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Vec<Cookie>>(&text).unwrap_or_else(|e| {
                warn!("cookie jar {} is malformed, starting empty: {e}", path.display());
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            file: Some(path),
            ttl: Duration::hours(i64::from(ttl_hours)),
            cookies: Mutex::new(cookies),
        })
    }

    pub fn in_memory(ttl_hours: u32) -> Self {
        Self {
            file: None,
            ttl: Duration::hours(i64::from(ttl_hours)),
            cookies: Mutex::new(Vec::new()),
        }
    }

    /// Set a cookie on path `/` with an explicit expiry.
    pub fn set_with_expiry(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut cookies = self.lock()?;
        let now = Utc::now();
        cookies.retain(|c| c.name != name && !c.is_expired(now));
        cookies.push(Cookie {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            expires_at,
        });
        self.persist(&cookies)
    }

    /// Unexpired cookies, for display and tests.
    pub fn cookies(&self) -> Result<Vec<Cookie>, StoreError> {
        let now = Utc::now();
        Ok(self
            .lock()?
            .iter()
            .filter(|c| !c.is_expired(now))
            .cloned()
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Cookie>>, StoreError> {
        self.cookies.lock().map_err(|_| StoreError::Poisoned("cookie_jar"))
    }

    fn persist(&self, cookies: &[Cookie]) -> Result<(), StoreError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(cookies)?;
        std::fs::write(path, text).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })
    }
}

impl TokenStore for CookieJar {
    fn name(&self) -> &'static str {
        "cookie_jar"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        Ok(self
            .lock()?
            .iter()
            .find(|c| c.name == key && !c.is_expired(now))
            .map(|c| c.value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_with_expiry(key, value, Utc::now() + self.ttl)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut cookies = self.lock()?;
        let before = cookies.len();
        cookies.retain(|c| c.name != key);
        if cookies.len() != before {
            self.persist(&cookies)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
