use async_graphql::http::GraphiQLSource;
use axum::response::Html;

/// GraphiQL playground, mounted on `GET /graphql` in debug builds only.
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
