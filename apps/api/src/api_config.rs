use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tablero_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub upstream_base_url: Url,
    pub upstream_timeout: Duration,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let raw_upstream_url = lookup("UPSTREAM_API_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("UPSTREAM_API_URL is required".to_owned()))?;
        let upstream_base_url = Url::parse(raw_upstream_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid UPSTREAM_API_URL: {error}"))
        })?;
        if !matches!(upstream_base_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "UPSTREAM_API_URL must use http or https, got '{}'",
                upstream_base_url.scheme()
            )));
        }

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "UPSTREAM_TIMEOUT_SECS must be a positive integer, got '{value}'"
                    ))
                })?,
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            upstream_base_url,
            upstream_timeout,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
