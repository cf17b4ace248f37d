use anyhow::Result;
use article_api::{app, config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::load()?;
    let _ = app::connect_to_db(config.database_url.as_str()).await?;
    tracing::info!("DB successfully initialized");

    Ok(())
}
