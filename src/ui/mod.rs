pub mod client;
pub mod render;
pub mod routes;
pub mod sessions;
pub mod state;

use crate::utils::data_types::{ChatQuery, ChatResponse};
use client::QueryError;
use futures::future::BoxFuture;

/// Transport the chat UI uses to reach the GraphQL endpoint.
pub trait QueryClient: Send + Sync {
    fn query(&self, query: ChatQuery) -> BoxFuture<'_, Result<ChatResponse, QueryError>>;
}
