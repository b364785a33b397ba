use std::{collections::HashMap, fmt, fs, path::Path, time::Duration};

use anyhow::Context;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::messages::Locale;

pub const DEFAULT_SETTINGS_FILE: &str = "registration.toml";
pub const DEFAULT_TABLE: &str = "registration_requests";
pub const DEFAULT_NOTIFY_FUNCTION: &str = "send-email";

const KEY_PREFIX_LEN: usize = 12;

/// Environment variables and the setting each one overrides, applied in order:
/// vendor names first, then `REGISTRATION_*`, then `APP__*`, so the last one set wins.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SUPABASE_URL", "service_url"),
    ("REGISTRATION_SERVICE_URL", "service_url"),
    ("APP__SERVICE_URL", "service_url"),
    ("SUPABASE_ANON_KEY", "access_key"),
    ("REGISTRATION_ACCESS_KEY", "access_key"),
    ("APP__ACCESS_KEY", "access_key"),
    ("APP__TABLE", "table"),
    ("APP__NOTIFY_FUNCTION", "notify_function"),
    ("APP__REQUEST_TIMEOUT_SECONDS", "request_timeout_seconds"),
    ("APP__NAVIGATION_DELAY_MS", "navigation_delay_ms"),
    ("APP__LOCALE", "locale"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid service url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value '{value}' for setting '{key}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone)]
pub struct Settings {
    pub service_url: Option<String>,
    pub access_key: Option<String>,
    pub table: String,
    pub notify_function: String,
    pub request_timeout_seconds: u64,
    pub navigation_delay_ms: u64,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: None,
            access_key: None,
            table: DEFAULT_TABLE.into(),
            notify_function: DEFAULT_NOTIFY_FUNCTION.into(),
            request_timeout_seconds: 15,
            navigation_delay_ms: 2000,
            locale: Locale::default(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("service_url", &self.service_url)
            .field("access_key", &self.access_key.as_deref().map(key_prefix))
            .field("table", &self.table)
            .field("notify_function", &self.notify_function)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("navigation_delay_ms", &self.navigation_delay_ms)
            .field("locale", &self.locale)
            .finish()
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }

    /// Validated service endpoint and credential; both must be present.
    pub fn service_config(&self) -> Result<ServiceConfig, ConfigError> {
        let service_url = non_empty(self.service_url.as_deref());
        let access_key = non_empty(self.access_key.as_deref());

        let (service_url, access_key) = match (service_url, access_key) {
            (Some(url), Some(key)) => (url, key),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push("service_url");
                }
                if key.is_none() {
                    missing.push("access_key");
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let parsed = Url::parse(service_url).map_err(|err| ConfigError::InvalidUrl {
            url: service_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: service_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(ServiceConfig {
            service_url: parsed,
            access_key: access_key.to_string(),
        })
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "service_url" => self.service_url = Some(value.trim().to_string()),
            "access_key" => self.access_key = Some(value.trim().to_string()),
            "table" => self.table = value.trim().to_string(),
            "notify_function" => self.notify_function = value.trim().to_string(),
            "request_timeout_seconds" => {
                self.request_timeout_seconds = value.trim().parse().map_err(|_| invalid())?;
            }
            "navigation_delay_ms" => {
                self.navigation_delay_ms = value.trim().parse().map_err(|_| invalid())?;
            }
            "locale" => self.locale = value.parse().map_err(|_| invalid())?,
            other => warn!(key = other, "ignoring unknown registration setting"),
        }

        Ok(())
    }
}

/// Base URL and credential for the hosted store and its functions.
#[derive(Clone)]
pub struct ServiceConfig {
    pub service_url: Url,
    pub access_key: String,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service_url", &self.service_url.as_str())
            .field("access_key", &self.key_prefix())
            .finish()
    }
}

impl ServiceConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.service_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn key_prefix(&self) -> String {
        key_prefix(&self.access_key)
    }
}

/// Loads settings from defaults, then the settings file, then the environment.
///
/// An explicit `path` must exist; the default `registration.toml` is optional.
/// An invalid value in the file is an error, while an invalid environment
/// override is logged and skipped, keeping the value from the file or default.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid settings file '{DEFAULT_SETTINGS_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    for (key, value) in file_cfg {
        let value = match value {
            toml::Value::String(text) => text,
            toml::Value::Integer(number) => number.to_string(),
            other => {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: other.to_string(),
                }
                .into())
            }
        };
        settings.apply(&key, &value)?;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for (name, key) in ENV_OVERRIDES {
        let Some(value) = lookup(name) else {
            continue;
        };
        if let Err(err) = settings.apply(key, &value) {
            warn!(variable = *name, %err, "ignoring invalid environment override");
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn key_prefix(key: &str) -> String {
    key.chars().take(KEY_PREFIX_LEN).collect()
}
