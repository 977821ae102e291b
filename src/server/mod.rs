pub mod app;
pub mod handlers;

use anyhow::Result;
use tracing::info;

use crate::auth::Authenticator;
use crate::database::connection::{establish_connection, get_database_url, setup_database};

pub async fn start_server(
    port: u16,
    database_path: &str,
    cors_origin: Option<&str>,
    authenticator: Authenticator,
) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    setup_database(&db).await?;
    info!("Database migrations completed");

    let app = app::create_app(db, cors_origin, authenticator).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /graphql                    - GraphQL API & Playground");
}
