use crate::{
    domain::migration::Migration,
    infrastructure::{persistence::PersistenceAdapter, settings::Settings},
};
use editorial_common::database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = database::connect(&settings.database).await?;
    let persistence = PersistenceAdapter::new(database);

    let created = Migration::new(persistence).migrate().await?;
    if created.is_empty() {
        tracing::info!("schema is up to date");
    } else {
        tracing::info!(tables = ?created, "schema migrated");
    }

    Ok(())
}
