use crate::providers::ProviderKind;
use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

#[derive(Serialize, Deserialize, SimpleObject, InputObject, Debug, Clone, PartialEq)]
#[graphql(name = "Message", input_name = "MessageInput")]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.to_owned(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_ASSISTANT.to_owned(),
            content: content.into(),
        }
    }
}

/// Variables accepted by both chat operations.
///
/// `stream` is accepted for schema compatibility only. Streaming is never
/// performed: DeepSeek always receives `false`, OpenAI never receives it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChatArgs {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize, SimpleObject, Debug, Clone, PartialEq)]
#[graphql(rename_fields = "snake_case")]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Serialize, Deserialize, SimpleObject, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[graphql(rename_fields = "snake_case")]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider-agnostic answer to a chat query.
///
/// Either `choices` or `error` carries the meaningful payload. A response with
/// neither is treated as "no content".
#[derive(Serialize, Deserialize, SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(rename_fields = "snake_case")]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()
            .and_then(|choices| choices.first())
            .map(|choice| choice.message.content.as_str())
    }
}

/// One call to a chat field of the GraphQL schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatQuery {
    DeepSeekChat(ChatArgs),
    OpenAIChat(ChatArgs),
}

impl ChatQuery {
    pub fn new(provider: ProviderKind, args: ChatArgs) -> Self {
        match provider {
            ProviderKind::DeepSeek => Self::DeepSeekChat(args),
            ProviderKind::OpenAI => Self::OpenAIChat(args),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::DeepSeekChat(_) => ProviderKind::DeepSeek,
            Self::OpenAIChat(_) => ProviderKind::OpenAI,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::DeepSeekChat(_) => "deepseekChat",
            Self::OpenAIChat(_) => "openaiChat",
        }
    }

    pub fn args(&self) -> &ChatArgs {
        match self {
            Self::DeepSeekChat(args) | Self::OpenAIChat(args) => args,
        }
    }

    pub fn into_args(self) -> ChatArgs {
        match self {
            Self::DeepSeekChat(args) | Self::OpenAIChat(args) => args,
        }
    }
}
