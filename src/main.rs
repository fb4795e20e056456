//! Inkdex - A lightweight blog platform with index-backed search

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkdex::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxArticleRepository, SqlxCategoryRepository, SqlxUserRepository},
    },
    search,
    services::{ArticleService, CategoryService, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkdex=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Inkdex blog platform...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize search backend and bootstrap the indices
    let search_backend = search::create_backend(&config.search)?;
    search_backend.ensure_indices().await?;
    tracing::info!("Search backend ready: {:?}", config.search.driver);

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let article_repo = SqlxArticleRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        article_repo.clone(),
        search_backend.clone(),
    ));
    let category_service = Arc::new(CategoryService::new(
        category_repo.clone(),
        search_backend.clone(),
    ));
    let article_service = Arc::new(ArticleService::new(
        article_repo,
        user_repo,
        category_repo,
        search_backend.clone(),
    ));

    // Build application state
    let state = AppState {
        user_service,
        category_service,
        article_service,
        search: search_backend,
        pagination: Arc::new(config.pagination.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
