use editorial_common::database;
use editorial_service::domain::{authors::AuthorDirectory, repository::PublicationRepository};
use editorial_service::infrastructure::AppStateImpl;
use editorial_service::infrastructure::authors::HttpAuthorDirectory;
use editorial_service::infrastructure::http::{HttpServer, HttpServerConfig};
use editorial_service::infrastructure::persistence::{
    InMemoryPublicationRepository, PostgresPublicationRepository,
};
use editorial_service::infrastructure::settings::{Settings, StoreKind};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let authors = HttpAuthorDirectory::new(&settings.authors)?;
    tracing::info!(url = %settings.authors.url, "authors service configured");

    match settings.store {
        StoreKind::Postgres => {
            let database_settings = settings
                .database
                .as_ref()
                .context("postgres store requires database settings")?;
            let database = database::connect(database_settings).await?;

            serve(PostgresPublicationRepository::new(database), authors, &settings).await
        }
        StoreKind::Memory => {
            tracing::warn!("publications are kept in memory and lost on restart");
            serve(InMemoryPublicationRepository::new(), authors, &settings).await
        }
    }
}

async fn serve<R: PublicationRepository, A: AuthorDirectory>(
    repository: R,
    authors: A,
    settings: &Settings,
) -> anyhow::Result<()> {
    let state = AppStateImpl::new(repository, authors);

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
