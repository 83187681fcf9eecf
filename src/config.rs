/// Deployment configuration.
/// The backend URL and anon key are required; the deep-link constants fall back to the
/// production values when the environment leaves them unset.
use leptos::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_APP_SCHEME: &str = "phenohunt";
pub const DEFAULT_APP_DOMAIN: &str = "app.phenohunt.com";
pub const DEFAULT_APP_STORE_URL: &str = "https://apps.apple.com/us/app/phenohunt/id6754624180";
pub const DEFAULT_HANDOFF_TIMEOUT_MS: u64 = 1500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Public (anon-scope) connection details for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_URL"));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                key: "SUPABASE_URL",
                reason: format!("expected an http(s) URL, got '{}'", url),
            });
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
        }
        Ok(BackendConfig {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = lookup("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        Self::new(&url, &anon_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLinkConfig {
    pub app_scheme: String,
    pub app_domain: String,
    pub app_store_url: String,
    pub handoff_timeout_ms: u64,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        DeepLinkConfig {
            app_scheme: DEFAULT_APP_SCHEME.to_string(),
            app_domain: DEFAULT_APP_DOMAIN.to_string(),
            app_store_url: DEFAULT_APP_STORE_URL.to_string(),
            handoff_timeout_ms: DEFAULT_HANDOFF_TIMEOUT_MS,
        }
    }
}

impl DeepLinkConfig {
    pub fn handoff_timeout(&self) -> Duration {
        Duration::from_millis(self.handoff_timeout_ms)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DeepLinkConfig::default();
        let handoff_timeout_ms = match lookup("HANDOFF_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "HANDOFF_TIMEOUT_MS",
                reason: e.to_string(),
            })?,
            None => defaults.handoff_timeout_ms,
        };
        Ok(DeepLinkConfig {
            app_scheme: lookup("APP_SCHEME").unwrap_or(defaults.app_scheme),
            app_domain: lookup("APP_DOMAIN").unwrap_or(defaults.app_domain),
            app_store_url: lookup("APP_STORE_URL").unwrap_or(defaults.app_store_url),
            handoff_timeout_ms,
        })
    }
}

/// Everything the browser needs to talk to the backend and run deep links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicConfig {
    pub backend: BackendConfig,
    pub deep_link: DeepLinkConfig,
}

impl PublicConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(PublicConfig {
            backend: BackendConfig::from_lookup(&lookup)?,
            deep_link: DeepLinkConfig::from_lookup(&lookup)?,
        })
    }

    #[cfg(feature = "ssr")]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }
}

/// Server-side settings that never reach the browser.
#[cfg(feature = "ssr")]
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub public: PublicConfig,
    pub content_dir: std::path::PathBuf,
}

#[cfg(feature = "ssr")]
impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let content_dir = std::env::var("CONTENT_DIR").unwrap_or_else(|_| "content".to_string());
        Ok(ServerConfig {
            public: PublicConfig::from_env()?,
            content_dir: content_dir.into(),
        })
    }
}

#[server(FetchPublicConfig, "/api")]
pub async fn fetch_public_config() -> Result<PublicConfig, ServerFnError> {
    use actix_web::{web, HttpRequest};

    let Some(req) = use_context::<HttpRequest>() else {
        return Err(ServerFnError::new("request context unavailable"));
    };
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        return Err(ServerFnError::new("server configuration not registered"));
    };
    Ok(config.public.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_backend_url_is_reported_by_name() {
        let err = PublicConfig::from_lookup(lookup_from(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
    }

    #[test]
    fn missing_anon_key_is_reported_by_name() {
        let err = PublicConfig::from_lookup(lookup_from(&[("SUPABASE_URL", "https://x.supabase.co")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn blank_anon_key_counts_as_missing() {
        let err = BackendConfig::new("https://x.supabase.co", "   ").unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_backend_url() {
        let cfg = BackendConfig::new("https://x.supabase.co/", "anon").unwrap();
        assert_eq!(cfg.url, "https://x.supabase.co");
    }

    #[test]
    fn non_http_backend_url_is_rejected() {
        let err = BackendConfig::new("x.supabase.co", "anon").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SUPABASE_URL", .. }));
    }

    #[test]
    fn deep_link_defaults_apply_when_unset() {
        let cfg = PublicConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(cfg.deep_link, DeepLinkConfig::default());
        assert_eq!(cfg.deep_link.handoff_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn handoff_timeout_is_configurable() {
        let cfg = DeepLinkConfig::from_lookup(lookup_from(&[("HANDOFF_TIMEOUT_MS", "2500")])).unwrap();
        assert_eq!(cfg.handoff_timeout_ms, 2500);

        let err = DeepLinkConfig::from_lookup(lookup_from(&[("HANDOFF_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "HANDOFF_TIMEOUT_MS", .. }));
    }
}
