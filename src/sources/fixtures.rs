use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Property;

const BUNDLED: &str = include_str!("../../data/properties.json");

/// Listings shipped with the crate
pub fn bundled() -> Result<Vec<Property>> {
    serde_json::from_str(BUNDLED).context("Bundled fixtures are not valid property JSON")
}

/// Listings from a JSON array on disk
pub async fn from_file(path: &Path) -> Result<Vec<Property>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fixtures from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse fixtures in {}", path.display()))
}
