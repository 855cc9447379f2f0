use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Property, Wishlist};
use crate::sources::PropertySource;
use crate::storage::{self, KeyValueStore};

const WISHLIST_KEY: &str = "wishlist";

/// Saved listings, persisted as one blob
pub struct WishlistService {
    store: Arc<dyn KeyValueStore>,
}

impl WishlistService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing or unreadable blobs yield an empty wishlist
    pub async fn load(&self) -> Result<Wishlist> {
        match storage::load_json(self.store.as_ref(), WISHLIST_KEY).await {
            Ok(Some(wishlist)) => Ok(wishlist),
            Ok(None) => Ok(Wishlist::default()),
            Err(crate::error::ScoutError::Serialization(e)) => {
                warn!("Discarding corrupt wishlist: {}", e);
                Ok(Wishlist::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, mut wishlist: Wishlist) -> Result<Wishlist> {
        wishlist.last_updated = Utc::now();
        storage::save_json(self.store.as_ref(), WISHLIST_KEY, &wishlist).await?;
        Ok(wishlist)
    }

    /// Returns false when the id was already saved
    pub async fn add(&self, property_id: &str) -> Result<bool> {
        let mut wishlist = self.load().await?;
        if wishlist.property_ids.iter().any(|id| id == property_id) {
            return Ok(false);
        }
        wishlist.property_ids.push(property_id.to_string());
        self.save(wishlist).await?;
        debug!("Added {} to wishlist", property_id);
        Ok(true)
    }

    /// Returns false when the id was not saved
    pub async fn remove(&self, property_id: &str) -> Result<bool> {
        let mut wishlist = self.load().await?;
        let before = wishlist.property_ids.len();
        wishlist.property_ids.retain(|id| id != property_id);
        if wishlist.property_ids.len() == before {
            return Ok(false);
        }
        self.save(wishlist).await?;
        debug!("Removed {} from wishlist", property_id);
        Ok(true)
    }

    /// Flip membership; returns whether the id is saved afterwards
    pub async fn toggle(&self, property_id: &str) -> Result<bool> {
        if self.remove(property_id).await? {
            Ok(false)
        } else {
            self.add(property_id).await
        }
    }

    pub async fn contains(&self, property_id: &str) -> Result<bool> {
        Ok(self
            .load()
            .await?
            .property_ids
            .iter()
            .any(|id| id == property_id))
    }

    /// Saved ids in insertion order
    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self.load().await?.property_ids)
    }

    pub async fn clear(&self) -> Result<()> {
        self.save(Wishlist::default()).await?;
        Ok(())
    }

    /// `add`, refusing ids the source does not list
    pub async fn add_listed(
        &self,
        property_id: &str,
        source: &dyn PropertySource,
    ) -> anyhow::Result<bool> {
        ensure_listed(property_id, source).await?;
        Ok(self.add(property_id).await?)
    }

    /// `toggle`, refusing to save ids the source does not list. Removal
    /// always succeeds so delisted entries can be cleaned up.
    pub async fn toggle_listed(
        &self,
        property_id: &str,
        source: &dyn PropertySource,
    ) -> anyhow::Result<bool> {
        if !self.contains(property_id).await? {
            ensure_listed(property_id, source).await?;
        }
        Ok(self.toggle(property_id).await?)
    }

    /// Fetch the saved listings, skipping ids the source no longer has
    pub async fn resolve(&self, source: &dyn PropertySource) -> anyhow::Result<Vec<Property>> {
        let mut properties = Vec::new();
        for id in self.list().await? {
            match source.get_property(&id).await? {
                Some(property) => properties.push(property),
                None => warn!("Wishlisted property {} is no longer listed", id),
            }
        }
        Ok(properties)
    }
}

async fn ensure_listed(property_id: &str, source: &dyn PropertySource) -> anyhow::Result<()> {
    if source.get_property(property_id).await?.is_none() {
        anyhow::bail!("Property not found: {}", property_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;
    use crate::storage::MemoryStore;

    fn service() -> (Arc<MemoryStore>, WishlistService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), WishlistService::new(store))
    }

    #[tokio::test]
    async fn add_is_idempotent_and_keeps_order() {
        let (_, wishlist) = service();
        assert!(wishlist.add("prop-002").await.unwrap());
        assert!(wishlist.add("prop-001").await.unwrap());
        assert!(!wishlist.add("prop-002").await.unwrap());
        assert_eq!(wishlist.list().await.unwrap(), vec!["prop-002", "prop-001"]);
    }

    #[tokio::test]
    async fn remove_and_toggle() {
        let (_, wishlist) = service();
        assert!(!wishlist.remove("prop-001").await.unwrap());

        assert!(wishlist.toggle("prop-001").await.unwrap());
        assert!(wishlist.contains("prop-001").await.unwrap());
        assert!(!wishlist.toggle("prop-001").await.unwrap());
        assert!(!wishlist.contains("prop-001").await.unwrap());
    }

    #[tokio::test]
    async fn mutations_refresh_timestamp() {
        let (_, wishlist) = service();
        let before = wishlist.load().await.unwrap().last_updated;
        wishlist.add("prop-003").await.unwrap();
        assert!(wishlist.load().await.unwrap().last_updated >= before);
    }

    #[tokio::test]
    async fn corrupt_blob_reads_as_empty() {
        let (store, wishlist) = service();
        store.set(WISHLIST_KEY, "{not json").await.unwrap();
        assert!(wishlist.list().await.unwrap().is_empty());
        assert!(wishlist.add("prop-001").await.unwrap());
        assert_eq!(wishlist.list().await.unwrap(), vec!["prop-001"]);
    }

    #[tokio::test]
    async fn resolve_skips_unknown_ids() {
        let (_, wishlist) = service();
        wishlist.add("prop-005").await.unwrap();
        wishlist.add("delisted").await.unwrap();
        wishlist.add("prop-001").await.unwrap();

        let source = MockSource::instant().unwrap();
        let properties = wishlist.resolve(&source).await.unwrap();
        let ids: Vec<_> = properties.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prop-005", "prop-001"]);
    }

    #[tokio::test]
    async fn listed_variants_reject_unknown_ids() {
        let (store, wishlist) = service();
        let source = MockSource::instant().unwrap();

        assert!(wishlist.toggle_listed("ghost", &source).await.is_err());
        assert!(wishlist.add_listed("ghost", &source).await.is_err());
        assert!(wishlist.list().await.unwrap().is_empty());

        assert!(wishlist.toggle_listed("prop-006", &source).await.unwrap());
        assert!(wishlist.add_listed("prop-002", &source).await.unwrap());
        assert_eq!(wishlist.list().await.unwrap(), vec!["prop-006", "prop-002"]);

        // an entry that has since been delisted can still be toggled off
        let stale = Wishlist {
            property_ids: vec!["gone".to_string()],
            ..Wishlist::default()
        };
        storage::save_json(store.as_ref(), WISHLIST_KEY, &stale)
            .await
            .unwrap();
        assert!(!wishlist.toggle_listed("gone", &source).await.unwrap());
    }

    #[tokio::test]
    async fn clear_empties_the_list() {
        let (_, wishlist) = service();
        wishlist.add("prop-001").await.unwrap();
        wishlist.clear().await.unwrap();
        assert!(wishlist.list().await.unwrap().is_empty());
    }
}
