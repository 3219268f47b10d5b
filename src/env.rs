use eyre::{Result, WrapErr};
#[cfg(test)]
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8787;
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_PATH: &str = "chat/completions";
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;
const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Where provider API keys come from.
///
/// Keys are looked up on every request, never cached at startup.
#[derive(Debug, Clone)]
pub enum SecretSource {
    Process,
    #[cfg(test)]
    Fixed(HashMap<String, String>),
}

impl SecretSource {
    /// Returns the named secret, treating an empty value as unset.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match self {
            Self::Process => std::env::var(name).ok(),
            #[cfg(test)]
            Self::Fixed(map) => map.get(name).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug)]
pub struct Env {
    pub host: String,
    pub port: u16,
    pub deepseek_chat_url: Url,
    pub openai_chat_url: Url,
    pub query_url: Url,
    pub session_idle: Duration,
    pub max_sessions: usize,
    pub secrets: SecretSource,
}

impl Env {
    pub fn new() -> Result<Self> {
        let host = var_or("HOST", DEFAULT_HOST);
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let query_url = var_or("QUERY_URL", &default_query_url(&host, port));
        let session_idle = parse_var("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)?;

        let env = Self {
            host,
            port,
            deepseek_chat_url: chat_endpoint(&var_or("DEEPSEEK_BASE_URL", DEEPSEEK_BASE_URL))?,
            openai_chat_url: chat_endpoint(&var_or("OPENAI_BASE_URL", OPENAI_BASE_URL))?,
            query_url: Url::parse(&query_url)
                .wrap_err_with(|| format!("invalid QUERY_URL: {query_url}"))?,
            session_idle: Duration::from_secs(session_idle),
            max_sessions: parse_var("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?,
            secrets: SecretSource::Process,
        };
        tracing::info!("Environment Loaded");
        Ok(env)
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .wrap_err_with(|| format!("invalid {name}: {value}")),
        Err(_) => Ok(default),
    }
}

/// GraphQL endpoint of this server as the UI reaches it.
///
/// Wildcard binds are reached through loopback, anything else through the
/// bound host itself.
fn default_query_url(host: &str, port: u16) -> String {
    let host = match host {
        "0.0.0.0" | "" => "127.0.0.1".to_owned(),
        "::" | "[::]" => "[::1]".to_owned(),
        h if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
        h => h.to_owned(),
    };
    format!("http://{host}:{port}/graphql")
}

/// Appends the chat-completion path to a provider base url.
pub fn chat_endpoint(base: &str) -> Result<Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), CHAT_PATH);
    Url::parse(&joined).wrap_err_with(|| format!("invalid provider base url: {base}"))
}

#[cfg(test)]
impl Env {
    pub fn for_tests(upstream_base: &str, secrets: &[(&str, &str)]) -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 0,
            deepseek_chat_url: chat_endpoint(&format!("{upstream_base}/deepseek")).unwrap(),
            openai_chat_url: chat_endpoint(&format!("{upstream_base}/openai/v1")).unwrap(),
            query_url: Url::parse("http://127.0.0.1:9/graphql").unwrap(),
            session_idle: Duration::from_secs(60),
            max_sessions: 100,
            secrets: SecretSource::Fixed(
                secrets
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}
