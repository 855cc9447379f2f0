use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, warn};

use crate::models::Property;
use crate::sources::traits::PropertySource;

/// REST client for the hosted listings backend
pub struct BackendSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("stay-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn properties_url(&self) -> String {
        format!("{}/properties", self.base_url)
    }

    pub fn property_url(&self, id: &str) -> String {
        format!("{}/properties/{}", self.base_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl PropertySource for BackendSource {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        let url = self.properties_url();
        debug!("Fetching URL: {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to fetch properties")?;

        if !response.status().is_success() {
            warn!("Backend returned status: {}", response.status());
            anyhow::bail!("Failed to fetch properties: {}", response.status());
        }

        let properties: Vec<Property> = response
            .json()
            .await
            .context("Failed to decode properties response")?;

        info!("Fetched {} properties from backend", properties.len());
        Ok(properties)
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        let url = self.property_url(id);
        debug!("Fetching URL: {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to fetch property {id}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!("Backend returned status: {}", response.status());
            anyhow::bail!("Failed to fetch property {}: {}", id, response.status());
        }

        let property = response
            .json()
            .await
            .context("Failed to decode property response")?;
        Ok(Some(property))
    }

    fn source_name(&self) -> &'static str {
        "Backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_ignore_trailing_slash() {
        let source = BackendSource::new("https://api.example.com/v1/", None).unwrap();
        assert_eq!(source.properties_url(), "https://api.example.com/v1/properties");
        assert_eq!(
            source.property_url("prop-001"),
            "https://api.example.com/v1/properties/prop-001"
        );
    }
}
