use crate::graphql::schema::{create_schema, GatewaySchema};
use crate::messaging::Messaging;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    http::Method,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mq-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    Extension(schema): Extension<GatewaySchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GraphiQL IDE endpoint
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Create the HTTP router with the composed schema attached
pub fn create_server(messaging: Arc<dyn Messaging>) -> anyhow::Result<Router> {
    let schema = create_schema(messaging)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(health))
        .route("/graphql", post(graphql_handler).get(graphql_handler))
        .route("/graphiql", get(graphiql))
        .layer(Extension(schema))
        .layer(ServiceBuilder::new().layer(cors)))
}

/// Start the HTTP server on the specified port
pub async fn start_server(messaging: Arc<dyn Messaging>, port: u16) -> anyhow::Result<()> {
    let app = create_server(messaging)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("GraphQL gateway listening on http://localhost:{port}/graphql");
    info!("GraphiQL UI on http://localhost:{port}/graphiql");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
