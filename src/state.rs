use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ImageService, TokenService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tokens: Arc<TokenService>,

    pub images: Arc<ImageService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = Arc::new(TokenService::new(&config.security));
        let images = Arc::new(ImageService::new(&config.media));

        Ok(Self {
            config,
            store,
            tokens,
            images,
        })
    }
}
