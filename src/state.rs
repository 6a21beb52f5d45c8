use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::{AvatarStore, LocalAvatarStore};
use crate::store::{postgres::PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub avatars: Arc<dyn AvatarStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = Arc::new(PgUserStore::connect(&config.database_url).await?) as Arc<dyn UserStore>;
        let avatars =
            Arc::new(LocalAvatarStore::new(config.upload_dir.clone())) as Arc<dyn AvatarStore>;

        Ok(Self {
            store,
            avatars,
            config,
        })
    }

    pub fn from_parts(
        store: Arc<dyn UserStore>,
        avatars: Arc<dyn AvatarStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            avatars,
            config,
        }
    }
}
