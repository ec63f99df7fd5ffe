use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::post_service::PostService;
use data::post_repository::PostRepository;
use data::repositories::elasticsearch::post_repository::{
    ElasticsearchConfig, ElasticsearchPostRepository,
};
use data::repositories::memory::post_repository::InMemoryPostRepository;
use infrastructure::credentials::Credentials;
use infrastructure::logging::init_logging;
use infrastructure::settings::{Settings, StoreBackend};
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let repo = build_repository(&settings).await?;
    let credentials = Credentials::new(&settings.auth_username, &settings.auth_password)
        .context("failed to hash AUTH_PASSWORD")?;

    let state = AppState::new(Arc::new(PostService::new(repo)), Arc::new(credentials));

    server::run_http(&settings, state).await
}

async fn build_repository(settings: &Settings) -> Result<Arc<dyn PostRepository>> {
    match settings.store_backend {
        StoreBackend::Elasticsearch => {
            let repo = ElasticsearchPostRepository::new(ElasticsearchConfig {
                url: settings.elasticsearch_url.clone(),
                index: settings.elasticsearch_index.clone(),
                username: settings.elasticsearch_username.clone(),
                password: settings.elasticsearch_password.clone(),
                max_results: settings.elasticsearch_max_results,
            })?;
            repo.ensure_index().await.with_context(|| {
                format!("failed to prepare index at {}", settings.elasticsearch_url)
            })?;
            info!(
                url = %settings.elasticsearch_url,
                index = %settings.elasticsearch_index,
                "using elasticsearch post store"
            );
            Ok(Arc::new(repo))
        }
        StoreBackend::Memory => {
            info!("using in-memory post store");
            Ok(Arc::new(InMemoryPostRepository::new()))
        }
    }
}
