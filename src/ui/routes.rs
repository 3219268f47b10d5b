use crate::{app_state::AppState, providers::ProviderKind, utils::data_types::ChatQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct SendForm {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub message: String,
}

fn chat_location(session: Uuid) -> String {
    format!("/chat/{session}")
}

pub async fn index() -> Redirect {
    Redirect::to(&chat_location(Uuid::new_v4()))
}

pub async fn show_chat(State(app): State<Arc<AppState>>, Path(session): Path<Uuid>) -> Response {
    // an unknown session renders empty without being stored
    let chat = app
        .sessions
        .lock()
        .await
        .get(&session)
        .cloned()
        .unwrap_or_default();

    match app.templates.chat_page(session, &chat) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            let msg = "Failed to render chat page";
            tracing::error!("{}: {:#}", msg, err);
            (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
        }
    }
}

pub async fn send_message(
    State(app): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
    Form(form): Form<SendForm>,
) -> Redirect {
    tracing::info!("[POST] chat {} via {}", session, form.provider.as_str());

    // the lock is released before the query so a second submit sees in-flight
    let query = {
        let mut sessions = app.sessions.lock().await;
        let chat = sessions.get_or_create(session);
        chat.select_provider(form.provider);
        chat.set_input(form.message);
        chat.begin_submit()
    };

    let Some(query) = query else {
        tracing::debug!("Submission ignored for {}", session);
        return Redirect::to(&chat_location(session));
    };

    // detached so the reply is recorded even if the browser drops the request
    let task = tokio::spawn(record_reply(app.clone(), session, query));
    if let Err(err) = task.await {
        tracing::error!("Query task for {} failed: {}", session, err);
    }

    Redirect::to(&chat_location(session))
}

async fn record_reply(app: Arc<AppState>, session: Uuid, query: ChatQuery) {
    let outcome = app.query_client.query(query).await;
    if let Err(err) = &outcome {
        tracing::error!("Query failed for {}: {}", session, err);
    }

    match app.sessions.lock().await.get_mut(&session) {
        Some(chat) => chat.finish_submit(outcome),
        None => tracing::warn!("Session {} is gone, reply dropped", session),
    }
}

pub async fn clear_chat(State(app): State<Arc<AppState>>, Path(session): Path<Uuid>) -> Redirect {
    if let Some(chat) = app.sessions.lock().await.get_mut(&session) {
        chat.clear();
    }
    tracing::info!("Cleared chat {}", session);
    Redirect::to(&chat_location(session))
}
