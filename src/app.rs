use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use argon2::Argon2;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tokio::net::TcpListener;

use crate::{
    api,
    cache::{Cache, MemoryCache, RedisCache},
    config::Settings,
    services::TokenKeys,
    store::{ArticleStore, PgStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<dyn ArticleStore>,
    pub users: Arc<dyn UserStore>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<TokenKeys>,
    pub hasher: Argon2<'static>,
}

impl AppState {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        users: Arc<dyn UserStore>,
        cache: Arc<dyn Cache>,
        tokens: TokenKeys,
    ) -> Self {
        Self {
            articles,
            users,
            cache,
            tokens: Arc::new(tokens),
            hasher: Argon2::default(),
        }
    }
}

pub async fn connect_to_db(database_url: &str) -> Result<Pool<Postgres>> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    // Run SQL migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("SQL migrations failed")?;

    Ok(pool)
}

/// Redis when configured, otherwise a per-process cache
pub async fn connect_cache(config: &Settings) -> Result<Arc<dyn Cache>> {
    match &config.redis_url {
        Some(url) => {
            let cache = RedisCache::connect(url.as_str())
                .await
                .context("Failed to connect to redis")?;
            tracing::info!(host = url.host_str(), "using redis cache");
            Ok(Arc::new(cache))
        }
        None => {
            tracing::warn!("REDIS_HOST is not set, falling back to in-process cache");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}

pub async fn build_app_state(pool: Pool<Postgres>, config: &Settings) -> Result<AppState> {
    let store = Arc::new(PgStore::new(pool));
    let cache = connect_cache(config).await?;
    let tokens = TokenKeys::new(&config.jwt.secret, config.jwt.expires_in);

    Ok(AppState::new(store.clone(), store, cache, tokens))
}

pub async fn run(config: Settings) -> Result<()> {
    let pool = connect_to_db(config.database_url.as_str()).await?;
    let state = build_app_state(pool, &config).await?;
    let router = api::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("App running on {addr}");

    axum::serve(listener, router).await?;

    Ok(())
}
