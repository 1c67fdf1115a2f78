use crate::config::AppConfig;
use crate::foods::repo::{CatalogSource, FileCatalog};
use crate::foods::repo_types::FoodRecord;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Vec<FoodRecord>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let source = FileCatalog::new(&config.food_dataset_path);
        Self::load(config, &source).await
    }

    pub async fn load(config: Arc<AppConfig>, source: &dyn CatalogSource) -> anyhow::Result<Self> {
        let catalog = Arc::new(source.load().await?);
        Ok(Self::from_parts(catalog, config))
    }

    pub fn from_parts(catalog: Arc<Vec<FoodRecord>>, config: Arc<AppConfig>) -> Self {
        Self { catalog, config }
    }

    #[cfg(test)]
    pub fn fake(catalog: Vec<FoodRecord>) -> Self {
        let config = Arc::new(AppConfig {
            food_dataset_path: "fake.csv".into(),
            server: crate::config::ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
        });
        Self::from_parts(Arc::new(catalog), config)
    }
}
