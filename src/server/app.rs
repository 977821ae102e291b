use anyhow::Result;
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::health;
use crate::auth::Authenticator;
use crate::graphql::{create_schema, AppSchema};

#[derive(Clone)]
pub struct AppState {
    pub schema: AppSchema,
    pub authenticator: Authenticator,
}

pub async fn create_app(
    db: DatabaseConnection,
    cors_origin: Option<&str>,
    authenticator: Authenticator,
) -> Result<Router> {
    let state = AppState {
        schema: create_schema(db),
        authenticator,
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // GraphQL API and playground
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

// Handler for the GraphQL playground
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

// Handler for GraphQL requests; the authenticated user rides along as
// request-scoped data so resolvers never touch headers.
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(user) = state.authenticator.authenticate(bearer_token(&headers)) {
        request = request.data(user);
    }
    state.schema.execute(request).await.into()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
