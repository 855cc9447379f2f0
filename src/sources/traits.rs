use crate::models::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can serve property listings
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch every listing
    async fn list_properties(&self) -> Result<Vec<Property>>;

    /// Fetch a single listing, `None` when the id is unknown
    async fn get_property(&self, id: &str) -> Result<Option<Property>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
