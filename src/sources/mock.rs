use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::Property;
use crate::sources::fixtures;
use crate::sources::traits::PropertySource;

/// Serves fixture listings after an artificial delay
pub struct MockSource {
    properties: Vec<Property>,
    latency: Duration,
}

impl MockSource {
    /// Bundled fixtures answering immediately. `from_config` applies the
    /// configured delay (300 ms by default).
    pub fn instant() -> Result<Self> {
        Ok(Self::with_properties(fixtures::bundled()?, Duration::ZERO))
    }

    pub fn with_properties(properties: Vec<Property>, latency: Duration) -> Self {
        Self {
            properties,
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Fixtures named in the config, or the bundled set
    pub async fn from_config(config: &Config) -> Result<Self> {
        let properties = match &config.fixtures_path {
            Some(path) => {
                info!("📋 Loading fixtures from {}", path.display());
                fixtures::from_file(path).await?
            }
            None => fixtures::bundled()?,
        };

        Ok(Self::with_properties(
            properties,
            Duration::from_millis(config.mock_latency_ms),
        ))
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            debug!("Simulating {:?} of latency", self.latency);
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl PropertySource for MockSource {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        self.simulate_latency().await;
        Ok(self.properties.clone())
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        self.simulate_latency().await;
        Ok(self.properties.iter().find(|p| p.id == id).cloned())
    }

    fn source_name(&self) -> &'static str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn finds_property_by_id() {
        let source = MockSource::instant().unwrap();
        let found = source.get_property("prop-004").await.unwrap();
        assert_eq!(found.map(|p| p.title), Some("Clifftop villa with infinity pool".to_string()));
        assert!(source.get_property("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn default_config_delays_but_instant_does_not() {
        let configured = MockSource::from_config(&Config::default()).await.unwrap();
        assert_eq!(configured.latency(), Duration::from_millis(300));
        assert_eq!(MockSource::instant().unwrap().latency(), Duration::ZERO);
    }

    #[tokio::test]
    async fn waits_for_configured_latency() {
        let source = MockSource::with_properties(Vec::new(), Duration::from_millis(20));
        let started = Instant::now();
        source.list_properties().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
