mod graphql;
mod health;

pub use graphql::graphiql;
pub use health::health;

use crate::{app_state::AppState, schema::build_schema, ui};
use async_graphql_axum::GraphQL;
use axum::{
    routing::{get, post, post_service},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn router(app: Arc<AppState>) -> Router {
    let schema = build_schema(app.clone());
    let graphql = if cfg!(debug_assertions) {
        get(graphiql).post_service(GraphQL::new(schema))
    } else {
        post_service(GraphQL::new(schema))
    };

    Router::new()
        .route("/", get(ui::routes::index))
        .route("/chat/{session}", get(ui::routes::show_chat))
        .route("/chat/{session}/send", post(ui::routes::send_message))
        .route("/chat/{session}/clear", post(ui::routes::clear_chat))
        .route("/graphql", graphql)
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(app)
}
