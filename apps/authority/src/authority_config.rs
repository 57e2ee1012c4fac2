use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use grantdeck_core::{AntiForgeryToken, AppError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct AuthorityConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub csrf_token: AntiForgeryToken,
}

impl AuthorityConfig {
    pub fn load() -> Result<Self, AppError> {
        let host = env::var("AUTHORITY_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let port = parse_env_u16("AUTHORITY_PORT", 3001)?;
        let frontend_url = env::var("AUTHORITY_FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let csrf_token = AntiForgeryToken::new(required_non_empty_env("AUTHORITY_CSRF_TOKEN")?)?;

        Ok(Self {
            host,
            port,
            frontend_url,
            csrf_token,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.host).map_err(|error| {
            AppError::Validation(format!("invalid AUTHORITY_HOST '{}': {error}", self.host))
        })?;
        Ok(SocketAddr::from((host, self.port)))
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

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        Err(_) => Ok(default),
    }
}
