// Configuration loading and parsing (console.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `backend.base_url`.
pub const API_URL_ENV: &str = "POLLA_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://192.168.3.107:9333/api/polla";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// console.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory that relative store paths resolve against. When unset the
    /// platform data directory is used.
    pub data_dir: Option<String>,
    /// SQLite key-value store (`auth_token`, `auth_user`).
    pub store_path: String,
    /// JSON cookie jar (`auth_token` cookie).
    pub cookie_jar_path: String,
    pub cookie_ttl_hours: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            data_dir: None,
            store_path: "session.db".to_string(),
            cookie_jar_path: "cookies.json".to_string(),
            cookie_ttl_hours: 24,
        }
    }
}

impl SessionConfig {
    pub fn resolved_store_path(&self) -> PathBuf {
        self.resolve(&self.store_path)
    }

    pub fn resolved_cookie_jar_path(&self) -> PathBuf {
        self.resolve(&self.cookie_jar_path)
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        if raw == ":memory:" {
            return PathBuf::from(raw);
        }
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            return path;
        }
        match &self.data_dir {
            Some(dir) => Path::new(dir).join(path),
            None => platform_data_dir().map(|d| d.join(&path)).unwrap_or(path),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub teams_page_size: usize,
    pub tournaments_page_size: usize,
    pub success_toast_secs: u64,
    pub error_toast_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            teams_page_size: 10,
            tournaments_page_size: 5,
            success_toast_secs: 3,
            error_toast_secs: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/console.toml` relative to `base_dir`, applying
/// `base_url_override` (the `POLLA_API_URL` value in `load_config()`).
///
/// Does not copy defaults. Prefer `load_config()`.
pub(crate) fn load_config_from(
    base_dir: &Path,
    base_url_override: Option<String>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("console.toml");
    let text = read_file(&path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    apply_env_override(&mut config, base_url_override);
    validate(&config)?;

    Ok(config)
}

/// Replace `backend.base_url` with a non-blank override value.
pub fn apply_env_override(config: &mut Config, base_url: Option<String>) {
    if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        config.backend.base_url = url;
    }
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd, std::env::var(API_URL_ENV).ok())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn platform_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "polla", "polla-admin")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.backend.base_url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: "must not be empty".into(),
        });
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: format!("must start with http:// or https://, got `{url}`"),
        });
    }

    let positive_fields: &[(&str, u64)] = &[
        ("backend.timeout_secs", config.backend.timeout_secs),
        ("session.cookie_ttl_hours", u64::from(config.session.cookie_ttl_hours)),
        ("ui.teams_page_size", config.ui.teams_page_size as u64),
        ("ui.tournaments_page_size", config.ui.tournaments_page_size as u64),
    ];
    for (name, val) in positive_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    for (name, val) in [
        ("session.store_path", &config.session.store_path),
        ("session.cookie_jar_path", &config.session.cookie_jar_path),
    ] {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
