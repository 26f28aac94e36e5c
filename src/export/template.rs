//! Stylesheet template source
//!
//! The ebook stylesheet lives in a separate template repository and is
//! fetched fresh for every export. Its content is opaque to us.

use async_trait::async_trait;

use crate::config::TemplateConfig;
use crate::error::{Result, SerializeError};

/// Where the converter's extra CSS comes from
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Fetch the stylesheet text
    async fn fetch(&self) -> Result<String>;
}

/// Stylesheet fetched over HTTP
pub struct HttpTemplateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpTemplateSource {
    pub fn new(config: &TemplateConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                SerializeError::TemplateFetchError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Fetching stylesheet template from {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            SerializeError::TemplateFetchError(format!("Failed to fetch {}: {}", self.url, e))
        })?;

        if !response.status().is_success() {
            return Err(SerializeError::TemplateFetchError(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        response.text().await.map_err(|e| {
            SerializeError::TemplateFetchError(format!("Failed to read template body: {}", e))
        })
    }
}

/// Stylesheet held in memory
pub struct StaticTemplate(pub String);

#[async_trait]
impl TemplateSource for StaticTemplate {
    async fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let config = TemplateConfig {
            // Port 9 (discard) is closed on any sane test machine
            url: "http://127.0.0.1:9/template.css".to_string(),
            timeout_secs: 5,
        };
        let source = HttpTemplateSource::new(&config).unwrap();

        let result = source.fetch().await;
        assert!(matches!(result, Err(SerializeError::TemplateFetchError(_))));
    }

    #[tokio::test]
    async fn test_static_template() {
        let source = StaticTemplate("p { margin: 0 }".to_string());
        assert_eq!(source.fetch().await.unwrap(), "p { margin: 0 }");
    }
}
