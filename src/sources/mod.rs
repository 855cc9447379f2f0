pub mod backend;
pub mod fixtures;
pub mod mock;
pub mod traits;

pub use backend::BackendSource;
pub use mock::MockSource;
pub use traits::PropertySource;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, DataSource};

/// Build the source selected by the config
pub async fn connect(config: &Config) -> Result<Box<dyn PropertySource>> {
    let source: Box<dyn PropertySource> = match config.data_source {
        DataSource::Mock => Box::new(MockSource::from_config(config).await?),
        DataSource::Backend => {
            let url = config
                .backend_url
                .clone()
                .context("backend_url must be set when data_source = \"backend\"")?;
            Box::new(BackendSource::new(url, config.backend_api_key.clone())?)
        }
    };

    info!("Using {} property source", source.source_name());
    Ok(source)
}
