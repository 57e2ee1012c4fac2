use async_trait::async_trait;
use grantdeck_application::AntiForgeryTokenSource;
use grantdeck_core::{AntiForgeryToken, AppError, AppResult};
use regex::Regex;
use url::Url;

/// Token source returning a fixed, preconfigured token.
#[derive(Debug, Clone, Default)]
pub struct StaticAntiForgeryToken {
    token: Option<AntiForgeryToken>,
}

impl StaticAntiForgeryToken {
    /// Creates a source; `None` sends requests without a token.
    #[must_use]
    pub fn new(token: Option<AntiForgeryToken>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AntiForgeryTokenSource for StaticAntiForgeryToken {
    async fn anti_forgery_token(&self) -> AppResult<Option<AntiForgeryToken>> {
        Ok(self.token.clone())
    }
}

/// Patterns locating an anti-forgery token in page markup.
///
/// A `<meta name="csrf-token">` tag wins over a hidden
/// `<input name="csrf_token">` field.
#[derive(Debug, Clone)]
pub struct TokenMarkupPatterns {
    meta: Regex,
    input: Regex,
    content: Regex,
    value: Regex,
}

impl TokenMarkupPatterns {
    /// Compiles the markup patterns.
    pub fn new() -> AppResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|error| {
                AppError::Internal(format!("invalid anti-forgery markup pattern: {error}"))
            })
        };

        Ok(Self {
            meta: compile(r#"(?is)<meta\b[^>]*\bname\s*=\s*["']csrf-token["'][^>]*>"#)?,
            input: compile(r#"(?is)<input\b[^>]*\bname\s*=\s*["']csrf_token["'][^>]*>"#)?,
            content: compile(r#"(?is)\bcontent\s*=\s*["']([^"']*)["']"#)?,
            value: compile(r#"(?is)\bvalue\s*=\s*["']([^"']*)["']"#)?,
        })
    }

    /// Extracts the token from page markup.
    #[must_use]
    pub fn extract(&self, markup: &str) -> Option<AntiForgeryToken> {
        let from_tag = |tag: &Regex, attribute: &Regex| {
            let tag = tag.find(markup)?;
            let value = attribute.captures(tag.as_str())?.get(1)?;
            AntiForgeryToken::new(value.as_str()).ok()
        };

        from_tag(&self.meta, &self.content).or_else(|| from_tag(&self.input, &self.value))
    }
}

/// Token source that reads the token from a rendered admin page.
pub struct PageMarkupTokenSource {
    http_client: reqwest::Client,
    page_url: Url,
    patterns: TokenMarkupPatterns,
}

impl PageMarkupTokenSource {
    /// Creates a source reading `page_url` on every call.
    pub fn new(http_client: reqwest::Client, page_url: Url) -> AppResult<Self> {
        Ok(Self {
            http_client,
            page_url,
            patterns: TokenMarkupPatterns::new()?,
        })
    }
}

#[async_trait]
impl AntiForgeryTokenSource for PageMarkupTokenSource {
    async fn anti_forgery_token(&self) -> AppResult<Option<AntiForgeryToken>> {
        let response = self
            .http_client
            .get(self.page_url.clone())
            .send()
            .await
            .map_err(|error| {
                AppError::Network(format!(
                    "failed to load anti-forgery page '{}': {error}",
                    self.page_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "anti-forgery page '{}' returned status {status}",
                self.page_url
            )));
        }

        let markup = response.text().await.map_err(|error| {
            AppError::Network(format!("failed to read anti-forgery page: {error}"))
        })?;
        let token = self.patterns.extract(&markup);
        if token.is_none() {
            tracing::warn!(page = %self.page_url, "page carries no anti-forgery token");
        }

        Ok(token)
    }
}
