use std::{env, fmt};

use url::Url;

const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/";

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing environment variable {name}"),
            Self::Invalid(name) => write!(f, "invalid value of environment variable {name}"),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub telegram_token: String,
    pub api_id: i32,
    pub api_hash: String,
    pub db_encryption_key: String,
    pub youtube_api_key: String,
    pub youtube_api_url: Url,
    pub user_agent: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let api_id =
            required("API_ID")?.trim().parse().map_err(|_| ConfigError::Invalid("API_ID"))?;

        let youtube_api_url = lookup("YOUTUBE_API_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_YOUTUBE_API_URL.into());

        let mut youtube_api_url = Url::parse(&youtube_api_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(ConfigError::Invalid("YOUTUBE_API_URL"))?;

        // relative joins drop the last path segment unless it ends with a slash
        if !youtube_api_url.path().ends_with('/') {
            let path = format!("{}/", youtube_api_url.path());
            youtube_api_url.set_path(&path);
        }

        Ok(Self {
            telegram_token: required("TELEGRAM_TOKEN")?,
            api_id,
            api_hash: required("API_HASH")?,
            db_encryption_key: required("DB_ENCRYPTION_KEY")?,
            youtube_api_key: required("YOUTUBE_API_KEY")?,
            youtube_api_url,
            user_agent: lookup("USER_AGENT").filter(|user_agent| !user_agent.is_empty()),
        })
    }
}
