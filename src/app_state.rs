use crate::{
    env::Env,
    providers::{Provider, ProviderKind},
    resolver::resolve,
    ui::{client::HttpQueryClient, render::Templates, sessions::SessionStore, QueryClient},
    utils::{
        create_client,
        data_types::{ChatArgs, ChatResponse},
    },
};
use eyre::Result;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub env: Env,
    pub client: Client,
    pub sessions: Mutex<SessionStore>,
    pub query_client: Arc<dyn QueryClient>,
    pub templates: Templates,
}

impl AppState {
    pub fn new(env: Env) -> Result<Self> {
        let client = create_client()?;
        let query_client = Arc::new(HttpQueryClient::new(client.clone(), env.query_url.clone()));
        Self::with_query_client(env, client, query_client)
    }

    pub fn with_query_client(
        env: Env,
        client: Client,
        query_client: Arc<dyn QueryClient>,
    ) -> Result<Self> {
        Ok(Self {
            sessions: Mutex::new(SessionStore::new(env.session_idle, env.max_sessions)),
            env,
            client,
            query_client,
            templates: Templates::new()?,
        })
    }

    pub async fn resolve(&self, kind: ProviderKind, args: ChatArgs) -> ChatResponse {
        let provider = Provider::new(kind, &self.env);
        resolve(&self.client, &self.env.secrets, &provider, args).await
    }
}
