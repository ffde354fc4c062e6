use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cache::{CacheFactory, LinkCache};
use crate::config::StaticConfig;
use crate::services::LinkService;
use crate::storage::{LinkStore, SeaOrmStorage, StorageFactory};

/// Handles shared by every command of one process run
pub struct AppContext {
    pub storage: Arc<SeaOrmStorage>,
    pub cache: Arc<dyn LinkCache>,
    pub link_service: Arc<LinkService>,
}

impl AppContext {
    /// 创建存储与缓存，并注入 LinkService
    pub async fn init(config: &StaticConfig) -> Result<Self> {
        let start_time = std::time::Instant::now();
        debug!("Initializing application context...");

        let storage = StorageFactory::create(&config.database)
            .await
            .context("Failed to create storage backend")?;
        info!("Using storage backend: {}", storage.backend_name());

        let cache = CacheFactory::create(&config.cache).context("Failed to create cache")?;

        let link_service = Arc::new(LinkService::new(
            storage.clone(),
            cache.clone(),
            config.links.clone(),
        ));

        debug!(
            "Application context ready in {:.2?}",
            start_time.elapsed()
        );

        Ok(Self {
            storage,
            cache,
            link_service,
        })
    }

    /// Release database connections. Errors are logged, not returned.
    pub async fn close(&self) {
        match self.storage.close().await {
            Ok(()) => info!("Storage closed"),
            Err(e) => warn!("Failed to close storage cleanly: {}", e),
        }
    }
}
