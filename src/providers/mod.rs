mod deepseek;
mod openai;

use crate::{env::Env, utils::data_types::{ChatArgs, ChatResponse}};
use axum::http::HeaderMap;
use deepseek::DeepSeekProvider;
use openai::OpenAIProvider;
use reqwest::{Body, Url};
use serde::{Deserialize, Serialize};

pub trait ProviderFn {
    /// Human readable name used in error messages.
    fn display_name(&self) -> &'static str;
    /// Environment entry holding the bearer token.
    fn api_key_var(&self) -> &'static str;
    fn chat_url(&self) -> Url;
    fn post_header_modifier(&self, headers: &mut HeaderMap);
    fn body_modifier(&self, args: ChatArgs) -> serde_json::Result<Body>;
    /// Maps the provider's native JSON envelope into the unified response.
    fn parse_response(&self, body: &str) -> serde_json::Result<ChatResponse>;
}

macro_rules! impl_provider {
    ($($name:ident => $provider:ident ($url:ident)),*) => {
        // define providers
        pub enum Provider {
            $($name($provider),)*
        }

        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum ProviderKind {
            #[default]
            $($name),*
        }

        impl Provider {
            // endpoints come from the environment, keys are read per request
            pub fn new(kind: ProviderKind, env: &Env) -> Self {
                match kind {
                    $(ProviderKind::$name => Provider::$name($provider::new(env.$url.clone())),)*
                }
            }

            pub fn kind(&self) -> ProviderKind {
                match self {
                    $(Provider::$name(_) => ProviderKind::$name,)*
                }
            }
        }

        impl ProviderKind {
            pub const ALL: &'static [ProviderKind] = &[$(ProviderKind::$name),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }

            pub fn id(&self) -> String {
                self.as_str().to_lowercase()
            }
        }

        // wrap provider functions
        impl ProviderFn for Provider {
            fn display_name(&self) -> &'static str {
                match self {
                    $(Provider::$name(p) => p.display_name(),)*
                }
            }

            fn api_key_var(&self) -> &'static str {
                match self {
                    $(Provider::$name(p) => p.api_key_var(),)*
                }
            }

            fn chat_url(&self) -> Url {
                match self {
                    $(Provider::$name(p) => p.chat_url(),)*
                }
            }

            fn post_header_modifier(&self, headers: &mut HeaderMap) {
                match self {
                    $(Provider::$name(p) => p.post_header_modifier(headers),)*
                }
            }

            fn body_modifier(&self, args: ChatArgs) -> serde_json::Result<Body> {
                match self {
                    $(Provider::$name(p) => p.body_modifier(args),)*
                }
            }

            fn parse_response(&self, body: &str) -> serde_json::Result<ChatResponse> {
                match self {
                    $(Provider::$name(p) => p.parse_response(body),)*
                }
            }
        }
    };
}

impl_provider!(
    DeepSeek => DeepSeekProvider(deepseek_chat_url),
    OpenAI => OpenAIProvider(openai_chat_url)
);
