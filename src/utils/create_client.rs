use reqwest::{self as r};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the single outbound client shared by every request.
///
/// No timeout is configured: a pending provider call runs until the
/// provider answers or the connection fails.
pub fn create_client() -> r::Result<r::Client> {
    r::Client::builder().user_agent(USER_AGENT).build()
}
