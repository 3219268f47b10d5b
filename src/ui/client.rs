use super::QueryClient;
use crate::utils::data_types::{ChatQuery, ChatResponse};
use futures::{future::BoxFuture, FutureExt};
use reqwest::{self as r, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const RESPONSE_FIELDS: &str = "id object created model \
    choices { index message { role content } finish_reason } \
    usage { prompt_tokens completion_tokens total_tokens } error";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    Transport(#[from] r::Error),
    #[error("query endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    GraphQL(String),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Debug)]
struct GraphQLRequest {
    query: String,
    variables: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
struct GraphQLReply {
    data: Option<Map<String, Value>>,
    #[serde(default)]
    errors: Vec<GraphQLErrorMessage>,
}

#[derive(Deserialize, Debug)]
struct GraphQLErrorMessage {
    message: String,
}

/// Variable declarations and field arguments for one chat field.
#[derive(Default)]
struct Arguments {
    declarations: Vec<String>,
    uses: Vec<String>,
    variables: Map<String, Value>,
}

impl Arguments {
    fn bind(&mut self, name: &str, ty: &str, value: Value) {
        self.declarations.push(format!("${name}: {ty}"));
        self.uses.push(format!("{name}: ${name}"));
        self.variables.insert(name.to_owned(), value);
    }
}

/// Builds the GraphQL request for `query`.
///
/// Unset optional arguments are left out of the document so the schema
/// defaults apply.
fn graphql_request(query: &ChatQuery) -> serde_json::Result<GraphQLRequest> {
    let args = query.args();
    let mut arguments = Arguments::default();

    arguments.bind(
        "messages",
        "[MessageInput!]!",
        serde_json::to_value(&args.messages)?,
    );
    if let Some(model) = &args.model {
        arguments.bind("model", "String", Value::from(model.as_str()));
    }
    if let (ChatQuery::DeepSeekChat(_), Some(stream)) = (query, args.stream) {
        arguments.bind("stream", "Boolean!", Value::from(stream));
    }
    if let Some(temperature) = args.temperature {
        arguments.bind("temperature", "Float", Value::from(temperature));
    }
    if let Some(max_tokens) = args.max_tokens {
        arguments.bind("max_tokens", "Int", Value::from(max_tokens));
    }

    let operation = query.operation();
    let document = format!(
        "query Chat({}) {{ {}({}) {{ {} }} }}",
        arguments.declarations.join(", "),
        operation,
        arguments.uses.join(", "),
        RESPONSE_FIELDS
    );

    Ok(GraphQLRequest {
        query: document,
        variables: arguments.variables,
    })
}

/// Sends chat queries to a GraphQL endpoint over HTTP.
pub struct HttpQueryClient {
    client: r::Client,
    url: Url,
}

impl HttpQueryClient {
    pub fn new(client: r::Client, url: Url) -> Self {
        Self { client, url }
    }

    async fn send(&self, query: ChatQuery) -> Result<ChatResponse, QueryError> {
        let operation = query.operation();
        let body = graphql_request(&query)?;
        let res = self.client.post(self.url.clone()).json(&body).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GraphQLReply = res.json().await?;
        if !reply.errors.is_empty() {
            let messages: Vec<String> = reply.errors.into_iter().map(|e| e.message).collect();
            return Err(QueryError::GraphQL(messages.join("; ")));
        }

        let field = reply
            .data
            .and_then(|mut data| data.remove(operation))
            .filter(|value| !value.is_null())
            .ok_or_else(|| QueryError::GraphQL(format!("no {operation} in response")))?;
        Ok(serde_json::from_value(field)?)
    }
}

impl QueryClient for HttpQueryClient {
    fn query(&self, query: ChatQuery) -> BoxFuture<'_, Result<ChatResponse, QueryError>> {
        self.send(query).boxed()
    }
}
