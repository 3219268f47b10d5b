use crate::{
    app_state::AppState,
    utils::data_types::{ChatArgs, ChatMessage, ChatQuery, ChatResponse},
};
use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};
use std::sync::Arc;

pub type ChatSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(app: Arc<AppState>) -> ChatSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(app)
        .finish()
}

pub struct QueryRoot;

#[Object(rename_args = "snake_case")]
impl QueryRoot {
    /// DeepSeek chat completion.
    async fn deepseek_chat(
        &self,
        ctx: &Context<'_>,
        messages: Vec<ChatMessage>,
        #[graphql(default_with = "Some(\"deepseek-chat\".to_owned())")] model: Option<String>,
        #[graphql(default)] stream: bool,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> async_graphql::Result<ChatResponse> {
        let args = ChatArgs {
            messages,
            model,
            stream: Some(stream),
            temperature,
            max_tokens,
        };
        answer(ctx, ChatQuery::DeepSeekChat(args)).await
    }

    /// OpenAI chat completion.
    async fn openai_chat(
        &self,
        ctx: &Context<'_>,
        messages: Vec<ChatMessage>,
        #[graphql(default_with = "Some(\"gpt-4o\".to_owned())")] model: Option<String>,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> async_graphql::Result<ChatResponse> {
        let args = ChatArgs {
            messages,
            model,
            temperature,
            max_tokens,
            ..Default::default()
        };
        answer(ctx, ChatQuery::OpenAIChat(args)).await
    }
}

async fn answer(ctx: &Context<'_>, query: ChatQuery) -> async_graphql::Result<ChatResponse> {
    let app = ctx.data::<Arc<AppState>>()?;
    tracing::info!(
        "[POST] {} ({} messages)",
        query.operation(),
        query.args().messages.len()
    );

    let provider = query.provider();
    Ok(app.resolve(provider, query.into_args()).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::Env, utils::fake_upstream::FakeUpstream};
    use serde_json::{json, Value};

    const HI_THERE: &str =
        r#"{"id":"r-1","choices":[{"index":0,"message":{"role":"assistant","content":"hi there"},"finish_reason":"stop"}],"usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#;

    fn schema_for(env: Env) -> ChatSchema {
        build_schema(Arc::new(AppState::new(env).unwrap()))
    }

    async fn run(schema: &ChatSchema, query: &str) -> (Value, Vec<String>) {
        let res = schema.execute(query).await;
        let errors = res.errors.iter().map(|e| e.message.clone()).collect();
        (res.data.into_json().unwrap(), errors)
    }

    #[tokio::test]
    async fn deepseek_chat_applies_schema_defaults() {
        let upstream = FakeUpstream::start(200, HI_THERE).await;
        let schema = schema_for(Env::for_tests(
            &upstream.base_url,
            &[("DEEPSEEK_API_KEY", "sk-ds")],
        ));

        let (data, errors) = run(
            &schema,
            r#"{ deepseekChat(messages: [{ role: "user", content: "hello" }]) {
                id
                choices { index message { role content } finish_reason }
                usage { prompt_tokens completion_tokens total_tokens }
                error
            } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data,
            json!({ "deepseekChat": {
                "id": "r-1",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "hi there" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5 },
                "error": null
            }})
        );
        let sent = upstream.last_request().unwrap();
        assert_eq!(sent.path, "/deepseek/chat/completions");
        assert_eq!(sent.body["model"], "deepseek-chat");
        assert_eq!(sent.body["stream"], false);
    }

    #[tokio::test]
    async fn openai_chat_passes_overrides_at_full_precision() {
        let upstream = FakeUpstream::start(200, HI_THERE).await;
        let schema = schema_for(Env::for_tests(
            &upstream.base_url,
            &[("OPENAI_API_KEY", "sk-oa")],
        ));

        let (_, errors) = run(
            &schema,
            r#"{ openaiChat(
                messages: [{ role: "user", content: "hello" }],
                model: "gpt-4o-mini",
                temperature: 0.123456789,
                max_tokens: 64
            ) { error } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let sent = upstream.last_request().unwrap().body;
        assert_eq!(sent["model"], "gpt-4o-mini");
        assert_eq!(sent["temperature"], 0.123456789);
        assert_eq!(sent["max_tokens"], 64);
        assert!(sent.get("stream").is_none());
    }

    #[tokio::test]
    async fn missing_key_is_a_response_error_not_a_graphql_error() {
        let upstream = FakeUpstream::start(200, HI_THERE).await;
        let schema = schema_for(Env::for_tests(&upstream.base_url, &[]));

        let (data, errors) = run(
            &schema,
            r#"{ openaiChat(messages: []) { choices { index } error } }"#,
        )
        .await;

        assert!(errors.is_empty());
        assert_eq!(
            data,
            json!({ "openaiChat": { "choices": null, "error": "OpenAI API key not configured" } })
        );
        assert_eq!(upstream.hits(), 0);
    }

    #[tokio::test]
    async fn unknown_fields_are_rejected() {
        let schema = schema_for(Env::for_tests("http://127.0.0.1:9", &[]));
        let (_, errors) = run(&schema, r#"{ geminiChat(messages: []) { error } }"#).await;
        assert!(errors.iter().any(|e| e.contains("geminiChat")), "{errors:?}");
    }

    #[test]
    fn sdl_matches_the_published_shape() {
        let sdl = schema_for(Env::for_tests("http://127.0.0.1:9", &[])).sdl();
        assert!(sdl.contains("input MessageInput"));
        assert!(sdl.contains("type Message"));
        assert!(sdl.contains("deepseekChat("));
        assert!(sdl.contains("openaiChat("));
        assert!(sdl.contains("max_tokens: Int"));
        assert!(sdl.contains("finish_reason: String"));
        assert!(sdl.contains("prompt_tokens: Int!"));
    }
}
