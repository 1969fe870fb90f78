//! Backend Configuration
//!
//! The project URL and anon key are baked in at build time from
//! `SUPABASE_URL` and `SUPABASE_ANON_KEY`.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

/// Remote table holding the notes
pub const NOTES_TABLE: &str = "notes";
/// Realtime channel name for note changes
pub const NOTES_CHANNEL: &str = "notes_changes";
/// Realtime keep-alive period
pub const HEARTBEAT_INTERVAL_MS: u32 = 30_000;
/// How long a toast stays on screen
pub const TOAST_DURATION_MS: u32 = 3_000;
/// Local storage key of the persisted session
pub const SESSION_STORAGE_KEY: &str = "dont-forget.session";
/// Sessions this close to expiry are refreshed before use
pub const SESSION_REFRESH_LEEWAY_SECS: i64 = 60;

/// Hosted backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, without trailing slash
    pub url: String,
    /// Public anon key
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_URL"));
        }
        if anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
        }

        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            url: url.to_string(),
            anon_key: anon_key.trim().to_string(),
        })
    }

    /// Settings captured from the build environment
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let url = option_env!("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let key = option_env!("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        Self::new(url, key)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    pub fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.url, endpoint)
    }

    /// Websocket endpoint of the realtime service
    pub fn realtime_url(&self) -> Result<String, ConfigError> {
        let mut url = Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ConfigError::InvalidUrl(self.url.clone()))?;
        url.set_path("/realtime/v1/websocket");
        url.query_pairs_mut()
            .clear()
            .append_pair("apikey", &self.anon_key)
            .append_pair("vsn", "1.0.0");
        Ok(url.to_string())
    }
}
