use super::{client::QueryError, QueryClient};
use crate::{
    providers::ProviderKind,
    utils::data_types::{ChatArgs, ChatMessage, ChatQuery, ChatResponse},
};

const DEEPSEEK_MODEL: &str = "deepseek-chat";
const DEEPSEEK_TEMPERATURE: f64 = 0.7;
const OPENAI_MODEL: &str = "gpt-4o";

/// One browser session's view of the conversation.
#[derive(Debug, Default, Clone)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    input: String,
    provider: ProviderKind,
    in_flight: bool,
}

impl ChatState {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn select_provider(&mut self, provider: ProviderKind) {
        self.provider = provider;
    }

    /// Starts a submission and returns the query to send.
    ///
    /// Returns `None` when the input is blank or another submission is still
    /// pending; the state is left untouched in that case.
    pub fn begin_submit(&mut self) -> Option<ChatQuery> {
        if self.in_flight || self.input.trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input);
        self.messages.push(ChatMessage::user(input));
        self.in_flight = true;

        Some(query_for(self.provider, self.messages.clone()))
    }

    /// Records the outcome of the pending submission.
    pub fn finish_submit(&mut self, outcome: Result<ChatResponse, QueryError>) {
        let reply = match outcome {
            Ok(res) => match (&res.error, res.first_content()) {
                (Some(error), _) => Some(format!("Error: {error}")),
                (None, Some(content)) => Some(content.to_owned()),
                (None, None) => None,
            },
            Err(err) => Some(format!("Request failed: {err}")),
        };

        match reply {
            Some(content) => self.messages.push(ChatMessage::assistant(content)),
            None => tracing::warn!("Provider answered without choices or error"),
        }
        self.in_flight = false;
    }

    /// Runs one full submission against `client`.
    pub async fn submit<C: QueryClient + ?Sized>(&mut self, client: &C) {
        if let Some(query) = self.begin_submit() {
            let outcome = client.query(query).await;
            self.finish_submit(outcome);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

fn query_for(provider: ProviderKind, messages: Vec<ChatMessage>) -> ChatQuery {
    let args = match provider {
        ProviderKind::DeepSeek => ChatArgs {
            messages,
            model: Some(DEEPSEEK_MODEL.to_owned()),
            temperature: Some(DEEPSEEK_TEMPERATURE),
            ..Default::default()
        },
        ProviderKind::OpenAI => ChatArgs {
            messages,
            model: Some(OPENAI_MODEL.to_owned()),
            ..Default::default()
        },
    };
    ChatQuery::new(provider, args)
}
