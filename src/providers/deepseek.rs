use super::ProviderFn;
use crate::utils::data_types::{ChatArgs, ChatMessage, ChatResponse, Choice, Usage};
use axum::http::HeaderMap;
use reqwest::{self as r, Url};
use serde::{Deserialize, Serialize};

const DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Clone, Debug)]
pub struct DeepSeekProvider {
    chat_url: Url,
}

impl DeepSeekProvider {
    pub fn new(chat_url: Url) -> Self {
        Self { chat_url }
    }
}

#[derive(Serialize, Debug)]
struct DeepSeekRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl From<ChatArgs> for DeepSeekRequest {
    fn from(args: ChatArgs) -> Self {
        Self {
            model: args.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            messages: args.messages,
            // no streaming transport exists, so the flag is always off
            stream: false,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
        }
    }
}

#[derive(Deserialize, Debug)]
struct DeepSeekMessage {
    role: String,
    content: Option<String>,
    // chain-of-thought from deepseek-reasoner, not surfaced to the chat
    #[allow(dead_code)]
    reasoning_content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DeepSeekChoice {
    #[serde(default)]
    index: u32,
    message: DeepSeekMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DeepSeekUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
    #[allow(dead_code)]
    prompt_cache_hit_tokens: Option<u32>,
    #[allow(dead_code)]
    prompt_cache_miss_tokens: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct DeepSeekResponse {
    id: Option<String>,
    object: Option<String>,
    created: Option<i64>,
    model: Option<String>,
    choices: Option<Vec<DeepSeekChoice>>,
    usage: Option<DeepSeekUsage>,
}

impl From<DeepSeekResponse> for ChatResponse {
    fn from(res: DeepSeekResponse) -> Self {
        let choices = res.choices.map(|choices| {
            choices
                .into_iter()
                .map(|c| Choice {
                    index: c.index,
                    message: ChatMessage {
                        role: c.message.role,
                        content: c.message.content.unwrap_or_default(),
                    },
                    finish_reason: c.finish_reason,
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

impl ProviderFn for DeepSeekProvider {
    fn display_name(&self) -> &'static str {
        "DeepSeek"
    }

    fn api_key_var(&self) -> &'static str {
        "DEEPSEEK_API_KEY"
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
        let body = serde_json::to_vec(&DeepSeekRequest::from(args))?;
        Ok(r::Body::from(body))
    }

    fn parse_response(&self, body: &str) -> serde_json::Result<ChatResponse> {
        let res: DeepSeekResponse = serde_json::from_str(body)?;
        Ok(res.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> DeepSeekProvider {
        DeepSeekProvider::new(Url::parse("https://api.deepseek.com/chat/completions").unwrap())
    }

    #[test]
    fn request_uses_defaults_and_forces_stream_off() {
        let req = DeepSeekRequest::from(ChatArgs {
            messages: vec![ChatMessage::user("hi")],
            stream: Some(true),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "deepseek-chat",
                "messages": [{ "role": "user", "content": "hi" }],
                "stream": false
            })
        );
    }

    #[test]
    fn request_merges_overrides() {
        let req = DeepSeekRequest::from(ChatArgs {
            messages: vec![],
            model: Some("deepseek-reasoner".to_owned()),
            temperature: Some(0.5),
            max_tokens: Some(256),
            ..Default::default()
        });
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "deepseek-reasoner");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["max_tokens"], 256);
    }

    #[test]
    fn full_response_maps_to_unified_shape() {
        let body = json!({
            "id": "930c60df-bf64-41c9-a88e-3ec75f81e00e",
            "object": "chat.completion",
            "created": 1705651092,
            "model": "deepseek-reasoner",
            "system_fingerprint": "fp_7e73fd9a08",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!",
                    "reasoning_content": "The user greets me."
                },
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 16,
                "completion_tokens": 10,
                "total_tokens": 26,
                "prompt_cache_hit_tokens": 0,
                "prompt_cache_miss_tokens": 16
            }
        })
        .to_string();

        let res = provider().parse_response(&body).unwrap();
        assert_eq!(res.id.as_deref(), Some("930c60df-bf64-41c9-a88e-3ec75f81e00e"));
        assert_eq!(res.created, Some(1705651092));
        assert_eq!(res.first_content(), Some("Hello!"));
        assert_eq!(
            res.usage,
            Some(Usage {
                prompt_tokens: 16,
                completion_tokens: 10,
                total_tokens: 26
            })
        );
        assert_eq!(res.error, None);
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"length"}]}"#;
        let res = provider().parse_response(body).unwrap();
        assert_eq!(res.first_content(), Some(""));
        assert_eq!(
            res.choices.unwrap()[0].finish_reason.as_deref(),
            Some("length")
        );
    }
}
