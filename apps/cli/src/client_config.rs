use std::env;
use std::time::Duration;

use grantdeck_core::{AntiForgeryToken, AppError, AppResult};
use grantdeck_domain::Locale;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::cli_args::GlobalArgs;

/// Runtime configuration of the operator CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub csrf_token: Option<AntiForgeryToken>,
    pub csrf_page_url: Option<Url>,
    pub request_timeout: Duration,
    pub mutation_timeout: Duration,
    pub close_delay: Duration,
    pub notification_ttl: Duration,
    pub locale: Locale,
}

impl ClientConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_base_url = parse_url(
            "GRANTDECK_API_BASE_URL",
            optional("GRANTDECK_API_BASE_URL")
                .as_deref()
                .unwrap_or("http://127.0.0.1:3001"),
        )?;
        let csrf_token = optional("GRANTDECK_CSRF_TOKEN")
            .map(AntiForgeryToken::new)
            .transpose()?;
        let csrf_page_url = optional("GRANTDECK_CSRF_PAGE_URL")
            .map(|value| parse_url("GRANTDECK_CSRF_PAGE_URL", &value))
            .transpose()?;
        let locale = optional("GRANTDECK_LOCALE")
            .map(|value| value.parse::<Locale>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            csrf_token,
            csrf_page_url,
            request_timeout: parse_duration_ms(&optional, "GRANTDECK_REQUEST_TIMEOUT_MS", 15_000)?,
            mutation_timeout: parse_duration_ms(
                &optional,
                "GRANTDECK_MUTATION_TIMEOUT_MS",
                10_000,
            )?,
            close_delay: parse_duration_ms(&optional, "GRANTDECK_CLOSE_DELAY_MS", 1_500)?,
            notification_ttl: parse_duration_ms(
                &optional,
                "GRANTDECK_NOTIFICATION_TTL_MS",
                5_000,
            )?,
            locale,
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, args: &GlobalArgs) -> AppResult<Self> {
        if let Some(api_base_url) = &args.api_base_url {
            self.api_base_url = api_base_url.clone();
        }
        if let Some(token) = &args.csrf_token {
            self.csrf_token = Some(AntiForgeryToken::new(token.as_str())?);
        }
        if let Some(locale) = args.locale {
            self.locale = locale;
        }

        Ok(self)
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_url(name: &str, value: &str) -> AppResult<Url> {
    Url::parse(value.trim())
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
}

fn parse_duration_ms(
    optional: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<Duration> {
    let millis = match optional(name) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?,
        None => default,
    };

    if millis == 0 {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use grantdeck_core::AppError;
    use grantdeck_domain::Locale;

    use super::ClientConfig;
    use crate::cli_args::GlobalArgs;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let Ok(config) = load(&[]) else {
            panic!("defaults should load");
        };

        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:3001/");
        assert_eq!(config.csrf_token, None);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.mutation_timeout, Duration::from_secs(10));
        assert_eq!(config.close_delay, Duration::from_millis(1_500));
        assert_eq!(config.notification_ttl, Duration::from_secs(5));
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let result = load(&[("GRANTDECK_MUTATION_TIMEOUT_MS", "0")]);

        assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("greater than zero")));
    }

    #[test]
    fn invalid_url_and_locale_are_rejected() {
        assert!(matches!(
            load(&[("GRANTDECK_API_BASE_URL", "not a url")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("GRANTDECK_LOCALE", "de")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn flags_override_environment() {
        let Ok(config) = load(&[
            ("GRANTDECK_CSRF_TOKEN", "from-env"),
            ("GRANTDECK_LOCALE", "en"),
        ]) else {
            panic!("config should load");
        };
        let args = GlobalArgs {
            api_base_url: url::Url::parse("http://authority.test:9000").ok(),
            csrf_token: Some("from-flag".to_owned()),
            locale: Some(Locale::Tr),
        };

        let Ok(config) = config.with_overrides(&args) else {
            panic!("overrides should apply");
        };
        assert_eq!(config.api_base_url.as_str(), "http://authority.test:9000/");
        assert_eq!(
            config.csrf_token.as_ref().map(|token| token.as_str()),
            Some("from-flag")
        );
        assert_eq!(config.locale, Locale::Tr);
    }
}
