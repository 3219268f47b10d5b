use super::ProviderFn;
use crate::utils::data_types::{ChatArgs, ChatMessage, ChatResponse, Choice, Usage};
use axum::http::HeaderMap;
use reqwest::{self as r, Url};
use serde::{Deserialize, Serialize};

const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    chat_url: Url,
}

impl OpenAIProvider {
    pub fn new(chat_url: Url) -> Self {
        Self { chat_url }
    }
}

// OpenAI gets no `stream` field at all
#[derive(Serialize, Debug)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl From<ChatArgs> for OpenAIRequest {
    fn from(args: ChatArgs) -> Self {
        Self {
            model: args.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            messages: args.messages,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
        }
    }
}

#[derive(Deserialize, Debug)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
    refusal: Option<String>,
}

impl OpenAIMessage {
    /// A refusal arrives with `content: null`; show it as the reply text.
    fn into_text(self) -> String {
        self.content.or(self.refusal).unwrap_or_default()
    }
}

#[derive(Deserialize, Debug)]
struct OpenAIChoice {
    #[serde(default)]
    index: u32,
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct OpenAIResponse {
    id: Option<String>,
    object: Option<String>,
    created: Option<i64>,
    model: Option<String>,
    choices: Option<Vec<OpenAIChoice>>,
    usage: Option<OpenAIUsage>,
}

impl From<OpenAIResponse> for ChatResponse {
    fn from(res: OpenAIResponse) -> Self {
        let choices = res.choices.map(|choices| {
            choices
                .into_iter()
                .map(|c| {
                    let role = c.message.role.clone();
                    Choice {
                        index: c.index,
                        message: ChatMessage {
                            role,
                            content: c.message.into_text(),
                        },
                        finish_reason: c.finish_reason,
                    }
                })
                .collect()
        });

        Self {
            id: res.id,
            object: res.object,
            created: res.created,
            model: res.model,
            choices,
            usage: res.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            error: None,
        }
    }
}

impl ProviderFn for OpenAIProvider {
    fn display_name(&self) -> &'static str {
        "OpenAI"
    }

    fn api_key_var(&self) -> &'static str {
        "OPENAI_API_KEY"
    }

    fn chat_url(&self) -> Url {
        self.chat_url.clone()
    }

    fn post_header_modifier(&self, headers: &mut HeaderMap) {
        headers.clear();
        headers.insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/json"),
        );
    }

    fn body_modifier(&self, args: ChatArgs) -> serde_json::Result<r::Body> {
        let body = serde_json::to_vec(&OpenAIRequest::from(args))?;
        Ok(r::Body::from(body))
    }

    fn parse_response(&self, body: &str) -> serde_json::Result<ChatResponse> {
        let res: OpenAIResponse = serde_json::from_str(body)?;
        Ok(res.into())
    }
}
