//! Configuration loading, validation, and management for memhook.
//!
//! Settings come from three layers, highest priority first:
//!
//! 1. process environment (non-empty values only)
//! 2. `~/.config/memhook/config.env` (`KEY=VALUE` lines, `#` comments),
//!    or the file named by `MEMHOOK_CONFIG`
//! 3. built-in defaults
//!
//! The file is parsed without touching the process environment; the result
//! is one [`HookConfig`] value built at startup and passed to every stage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use memhook_core::store::CubeTarget;

pub const ENV_API_URL: &str = "MEMOS_API_URL";
pub const ENV_USER_ID: &str = "MEMOS_USER_ID";
pub const ENV_CUBE_ID: &str = "MEMOS_CUBE_ID";
pub const ENV_SECRET: &str = "INTERNAL_SERVICE_SECRET";
pub const ENV_RERANKER: &str = "MEMOS_RERANKER";
pub const ENV_INCLUDE_SKILL: &str = "MEMOS_INCLUDE_SKILL";
pub const ENV_INCLUDE_PREFERENCE: &str = "MEMOS_INCLUDE_PREFERENCE";
pub const ENV_ADAPTIVE_BUDGET: &str = "MEMOS_ADAPTIVE_BUDGET";
pub const ENV_CUBE_FIELD: &str = "MEMOS_CUBE_FIELD";

/// Overrides the config file location.
pub const ENV_CONFIG_PATH: &str = "MEMHOOK_CONFIG";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_USER_ID: &str = "default";
const DEFAULT_CUBE_ID: &str = "memos";

/// The resolved configuration, built once per process.
#[derive(Clone, PartialEq)]
pub struct HookConfig {
    /// Base URL of the memory store API
    pub api_url: String,

    /// User the memories belong to
    pub user_id: String,

    /// Memory space (cube) to query
    pub cube_id: String,

    /// Shared secret sent as `X-Internal-Service`
    pub secret: Option<String>,

    /// How the cube is named in request bodies
    pub cube_field: CubeField,

    /// Feature switches for the pipeline
    pub capabilities: Capabilities,
}

/// Pipeline feature switches selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Request and render skill memories
    pub include_skill: bool,

    /// Request and render preference memories
    pub include_preference: bool,

    /// Run the remote relevance judgment on text memories
    pub rerank_enabled: bool,

    /// Split the text budget across items instead of a flat per-item cap
    pub adaptive_budget: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            include_skill: true,
            include_preference: true,
            rerank_enabled: false,
            adaptive_budget: true,
        }
    }
}

/// Field used to address the cube in outbound bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubeField {
    /// `readable_cube_ids: [cube]`
    #[default]
    Readable,
    /// `mem_cube_id: cube`
    Single,
}

impl CubeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readable => "readable_cube_ids",
            Self::Single => "mem_cube_id",
        }
    }
}

impl FromStr for CubeField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readable_cube_ids" | "readable" => Ok(Self::Readable),
            "mem_cube_id" | "single" => Ok(Self::Single),
            other => Err(ConfigError::ValidationError(format!(
                "{ENV_CUBE_FIELD} must be readable_cube_ids or mem_cube_id, got {other:?}"
            ))),
        }
    }
}

impl std::fmt::Debug for HookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookConfig")
            .field("api_url", &self.api_url)
            .field("user_id", &self.user_id)
            .field("cube_id", &self.cube_id)
            .field("secret", &redact(&self.secret))
            .field("cube_field", &self.cube_field)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            user_id: DEFAULT_USER_ID.into(),
            cube_id: DEFAULT_CUBE_ID.into(),
            secret: None,
            cube_field: CubeField::default(),
            capabilities: Capabilities::default(),
        }
    }
}

impl HookConfig {
    /// Load configuration from the default file, with environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, with environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file = read_env_file(path)?;
        Self::resolve(&file, |key| std::env::var(key).ok())
    }

    /// Merge file values with an environment lookup and apply defaults.
    pub fn resolve<F>(file: &HashMap<String, String>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| -> Option<String> {
            non_empty(env(key)).or_else(|| non_empty(file.get(key).cloned()))
        };

        let defaults = Capabilities::default();
        let capabilities = Capabilities {
            include_skill: flag(&lookup, ENV_INCLUDE_SKILL, defaults.include_skill),
            include_preference: flag(&lookup, ENV_INCLUDE_PREFERENCE, defaults.include_preference),
            rerank_enabled: flag(&lookup, ENV_RERANKER, defaults.rerank_enabled),
            adaptive_budget: flag(&lookup, ENV_ADAPTIVE_BUDGET, defaults.adaptive_budget),
        };

        let cube_field = match lookup(ENV_CUBE_FIELD) {
            Some(raw) => raw.parse()?,
            None => CubeField::default(),
        };

        let config = Self {
            api_url: lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.into()),
            user_id: lookup(ENV_USER_ID).unwrap_or_else(|| DEFAULT_USER_ID.into()),
            cube_id: lookup(ENV_CUBE_ID).unwrap_or_else(|| DEFAULT_CUBE_ID.into()),
            secret: lookup(ENV_SECRET),
            cube_field,
            capabilities,
        };

        config.validate()?;
        Ok(config)
    }

    /// The config file path: `$MEMHOOK_CONFIG`, else `~/.config/memhook/config.env`.
    pub fn config_path() -> PathBuf {
        match non_empty(std::env::var(ENV_CONFIG_PATH).ok()) {
            Some(path) => PathBuf::from(path),
            None => Self::config_dir().join("config.env"),
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| {
            tracing::warn!("HOME directory not set, looking for config in the current directory");
            PathBuf::from(".")
        });
        home.join(".config").join("memhook")
    }

    /// The cube addressing used in request bodies.
    pub fn cube_target(&self) -> CubeTarget {
        match self.cube_field {
            CubeField::Readable => CubeTarget::Readable(vec![self.cube_id.clone()]),
            CubeField::Single => CubeTarget::Single(self.cube_id.clone()),
        }
    }

    /// Human-readable effective settings, secret redacted.
    pub fn render(&self) -> String {
        let caps = &self.capabilities;
        let on_off = |b: bool| if b { "on" } else { "off" };
        [
            format!("api_url            = {}", self.api_url),
            format!("user_id            = {}", self.user_id),
            format!("cube_id            = {}", self.cube_id),
            format!("cube_field         = {}", self.cube_field.as_str()),
            format!("secret             = {}", redact(&self.secret)),
            format!("include_skill      = {}", on_off(caps.include_skill)),
            format!("include_preference = {}", on_off(caps.include_preference)),
            format!("rerank             = {}", on_off(caps.rerank_enabled)),
            format!("adaptive_budget    = {}", on_off(caps.adaptive_budget)),
        ]
        .join("\n")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "{ENV_API_URL} must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }

        if self.user_id.trim().is_empty() || self.cube_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "user id and cube id must not be blank".into(),
            ));
        }

        Ok(())
    }
}

/// Read `KEY=VALUE` pairs from a config file. A missing file is not an error.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config file found at {}, using environment and defaults", path.display());
        return Ok(HashMap::new());
    }

    let entries = dotenvy::from_path_iter(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut values = HashMap::new();
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                values.insert(key, value.trim().to_string());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Skipping malformed config line: {e}");
            }
        }
    }
    Ok(values)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unrecognised values fall back to `default` so a typo degrades one
/// capability instead of disabling injection.
fn flag<L>(lookup: &L, key: &str, default: bool) -> bool
where
    L: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            tracing::warn!(key, value = %raw, default, "Unrecognised boolean, using default");
            default
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
