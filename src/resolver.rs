use crate::{
    env::SecretSource,
    providers::{Provider, ProviderFn},
    utils::data_types::{ChatArgs, ChatResponse},
};
use axum::http::HeaderMap;
use reqwest::{self as r};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0} API key not configured")]
    MissingKey(&'static str),
    #[error("{provider} API Error: {status} - {body}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("Request failed: {0}")]
    Request(#[from] r::Error),
    #[error("Request failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Answers one chat query against `provider`.
///
/// Never fails: every problem is folded into the `error` field of the
/// returned response.
pub async fn resolve(
    client: &r::Client,
    secrets: &SecretSource,
    provider: &Provider,
    args: ChatArgs,
) -> ChatResponse {
    match request_completion(client, secrets, provider, args).await {
        Ok(res) => res,
        Err(err) => {
            tracing::warn!("[{}] {}", provider.display_name(), err);
            ChatResponse::from_error(err.to_string())
        }
    }
}

async fn request_completion(
    client: &r::Client,
    secrets: &SecretSource,
    provider: &Provider,
    args: ChatArgs,
) -> Result<ChatResponse, ResolveError> {
    let api_key = secrets
        .get(provider.api_key_var())
        .ok_or(ResolveError::MissingKey(provider.display_name()))?;

    let mut headers = HeaderMap::new();
    provider.post_header_modifier(&mut headers);

    tracing::info!(
        "[{}] {} messages -> {}",
        provider.kind().id(),
        args.messages.len(),
        provider.chat_url()
    );

    let res = client
        .post(provider.chat_url())
        .headers(headers)
        .bearer_auth(api_key)
        .body(provider.body_modifier(args)?)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(ResolveError::Upstream {
            provider: provider.display_name(),
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(provider.parse_response(&text)?)
}
