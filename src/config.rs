use std::env;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://quessbackend-3.onrender.com";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HRMS_API_URL is not a valid URL ({value}): {source}")]
    InvalidApiUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("HRMS_API_URL cannot serve as a base for API paths ({value})")]
    NotABaseUrl { value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_base_url: parse_api_url(env::var("HRMS_API_URL").ok().as_deref())?,
            port: parse_port(env::var("PORT").ok().as_deref()),
        })
    }
}

fn parse_api_url(value: Option<&str>) -> Result<Url, ConfigError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/');

    let url = Url::parse(value).map_err(|source| ConfigError::InvalidApiUrl {
        value: value.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABaseUrl {
            value: value.to_string(),
        });
    }
    Ok(url)
}

fn parse_port(value: Option<&str>) -> u16 {
    value
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}
