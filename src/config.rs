use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key; provider calls fail fast when absent
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with poster paths to build poster URLs
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Locale sent to TMDB with every request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Timeout applied to every outbound provider request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Maximum age of the genre snapshot before it is refetched
    #[serde(default = "default_genre_cache_ttl_secs")]
    pub genre_cache_ttl_secs: u64,

    /// Shared admin secret; admin login is disabled when absent
    #[serde(default)]
    pub admin_password: Option<String>,

    /// PostgreSQL connection URL; an in-memory store is used when absent
    #[serde(default)]
    pub database_url: Option<String>,

    /// Insert demo content into an empty store at startup
    #[serde(default)]
    pub seed_demo: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "ko-KR".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_genre_cache_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        // An empty value in .env means "not set"
        config.tmdb_api_key = config.tmdb_api_key.filter(|k| !k.trim().is_empty());
        config.admin_password = config.admin_password.filter(|p| !p.is_empty());
        config.database_url = config.database_url.filter(|u| !u.trim().is_empty());

        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn genre_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.genre_cache_ttl_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_iter(vars(&[])).unwrap();

        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "ko-KR");
        assert_eq!(config.genre_cache_ttl(), Duration::from_secs(604_800));
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.database_url, None);
        assert!(!config.seed_demo);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_iter(vars(&[
            ("TMDB_API_KEY", "abc123"),
            ("TMDB_LANGUAGE", "en-US"),
            ("ADMIN_PASSWORD", "hunter2"),
            ("SEED_DEMO", "true"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.tmdb_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.admin_password.as_deref(), Some("hunter2"));
        assert!(config.seed_demo);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = Config::from_iter(vars(&[("TMDB_API_KEY", "  ")])).unwrap();
        assert_eq!(config.tmdb_api_key, None);
    }

    #[test]
    fn test_invalid_port_fails() {
        let result = Config::from_iter(vars(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }
}
