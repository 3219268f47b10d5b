use super::state::ChatState;
use crate::providers::ProviderKind;
use minijinja::{context, Environment, Error};
use serde::Serialize;
use uuid::Uuid;

const CHAT_TEMPLATE: &str = include_str!("templates/chat.html");

#[derive(Serialize)]
struct ProviderOption {
    id: String,
    label: &'static str,
}

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        // `.html` names get HTML auto-escaping
        env.add_template("chat.html", CHAT_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn chat_page(&self, session: Uuid, chat: &ChatState) -> Result<String, Error> {
        let providers: Vec<ProviderOption> = ProviderKind::ALL
            .iter()
            .map(|kind| ProviderOption {
                id: kind.id(),
                label: kind.as_str(),
            })
            .collect();

        self.env.get_template("chat.html")?.render(context! {
            session => session.to_string(),
            providers => providers,
            selected_provider => chat.provider().id(),
            messages => chat.messages(),
            input => chat.input(),
            in_flight => chat.in_flight(),
        })
    }
}
