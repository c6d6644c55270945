use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::errors::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TOKEN_DIR: &str = ".bank-session";
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_LANDING_ROUTE: &str = "/dashboard";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths such as `/auth/login` are appended to it.
    pub api_url: Url,
    pub token_dir: PathBuf,
    pub timeout: Duration,
    /// Unauthenticated entry point.
    pub login_route: String,
    /// Default page for an authenticated user.
    pub landing_route: String,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api_url: parse_base_url(api_url)?,
            token_dir: PathBuf::from(DEFAULT_TOKEN_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            landing_route: DEFAULT_LANDING_ROUTE.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = std::env::var("BANK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("BANK_HTTP_TIMEOUT_SECS")
            .map(|val| val.parse::<u64>())
            .unwrap_or(Ok(DEFAULT_TIMEOUT_SECS))
            .map_err(|_| ClientError::configuration("BANK_HTTP_TIMEOUT_SECS must be a valid integer"))?;

        let mut config = Self::new(&api_url)?.with_timeout(Duration::from_secs(timeout_secs));

        if let Ok(dir) = std::env::var("BANK_TOKEN_DIR") {
            config = config.with_token_dir(dir);
        }
        if let Ok(route) = std::env::var("BANK_LOGIN_ROUTE") {
            config = config.with_login_route(route)?;
        }
        if let Ok(route) = std::env::var("BANK_LANDING_ROUTE") {
            config = config.with_landing_route(route)?;
        }

        Ok(config)
    }

    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_login_route(mut self, route: impl Into<String>) -> Result<Self, ClientError> {
        self.login_route = validate_route("login", route.into())?;
        Ok(self)
    }

    pub fn with_landing_route(mut self, route: impl Into<String>) -> Result<Self, ClientError> {
        self.landing_route = validate_route("landing", route.into())?;
        Ok(self)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|err| ClientError::configuration(format!("invalid base URL {raw:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::configuration(format!("unsupported URL scheme: {other}"))),
    }
}

fn validate_route(kind: &str, route: String) -> Result<String, ClientError> {
    if !route.starts_with('/') {
        return Err(ClientError::configuration(format!("{kind} route must start with '/': {route}")));
    }
    Ok(route)
}
