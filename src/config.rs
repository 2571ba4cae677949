use serde::Deserialize;
use std::{env, fmt::Display, fs, path::Path, str::FromStr, time::Duration};
use tracing::info;

use crate::{error::ConfigError, utils};

pub const DEFAULT_FEED_URL: &str = "https://shirokokun.substack.com/feed";
pub const DEFAULT_CACHE_TTL: u64 = 1800;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

const CONFIG_PATH_VAR: &str = "BLOG_FEED_CONFIG";

/// Optional `config.toml` contents. Every key may be left out.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct FileConfig {
    pub feed_url: Option<String>,
    pub cache_ttl: Option<u64>,
    pub port: Option<u16>,
    pub allowed_origins: Option<Vec<String>>,
}

impl FileConfig {
    pub fn from(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: FileConfig = toml::from_str(&contents)?;

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub feed_url: String,
    pub cache_ttl: Duration,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Defaults, then the config file, then environment variables.
    pub fn load() -> Result<Config, ConfigError> {
        let file = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => FileConfig::from(Path::new(&path))?,
            Err(_) => match utils::get_config_dir().map(|dir| dir.join("config.toml")) {
                Some(path) if path.exists() => FileConfig::from(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::resolve(file, |key| env::var(key).ok())
    }

    pub fn resolve<F>(file: FileConfig, var: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = var("SUBSTACK_RSS_URL")
            .or(file.feed_url)
            .unwrap_or_else(|| {
                info!("SUBSTACK_RSS_URL not set, using default: {DEFAULT_FEED_URL}");
                DEFAULT_FEED_URL.to_string()
            });

        let cache_ttl = match var("CACHE_TTL") {
            Some(raw) => parse_var("CACHE_TTL", &raw)?,
            None => file.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL),
        };

        let port = match var("PORT") {
            Some(raw) => parse_var("PORT", &raw)?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|raw| split_origins(&raw))
            .or(file.allowed_origins)
            .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        Ok(Config {
            feed_url,
            cache_ttl: Duration::from_secs(cache_ttl),
            port,
            allowed_origins,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::resolve(FileConfig::default(), vars(&[])).unwrap();

        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.cache_ttl, Duration::from_secs(1800));
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn file_values_are_used() {
        let file: FileConfig = toml::from_str(
            r#"
            feed_url = "https://blog.example.com/feed"
            cache_ttl = 60
            allowed_origins = ["https://example.com"]
            "#,
        )
        .unwrap();

        let config = Config::resolve(file, vars(&[])).unwrap();

        assert_eq!(config.feed_url, "https://blog.example.com/feed");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.allowed_origins, vec!["https://example.com"]);
    }

    #[test]
    fn environment_overrides_file() {
        let file = FileConfig {
            feed_url: Some("https://file.example.com/feed".to_string()),
            cache_ttl: Some(60),
            port: Some(9000),
            allowed_origins: None,
        };

        let config = Config::resolve(
            file,
            vars(&[
                ("SUBSTACK_RSS_URL", "https://env.example.com/feed"),
                ("CACHE_TTL", "0"),
                ("PORT", "3001"),
                (
                    "ALLOWED_ORIGINS",
                    "https://a.example.com, https://b.example.com,,",
                ),
            ]),
        )
        .unwrap();

        assert_eq!(config.feed_url, "https://env.example.com/feed");
        assert_eq!(config.cache_ttl, Duration::ZERO);
        assert_eq!(config.port, 3001);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        let err = Config::resolve(FileConfig::default(), vars(&[("CACHE_TTL", "soon")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "CACHE_TTL", .. }));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = FileConfig::from(Path::new("/nonexistent/blog-feed.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
