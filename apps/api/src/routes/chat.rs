use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Local;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::chat::{ChatLogEntry, ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /chat
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let turn = state
        .agent
        .respond(&req.message, req.company.as_deref())
        .await?;
    let company = turn.company.map(|c| c.to_string());

    info!(
        "Agent processed - session: {session_id}, company: {}, actions: {}",
        company.as_deref().unwrap_or("-"),
        turn.trace.len()
    );

    let entry = ChatLogEntry {
        timestamp: Local::now(),
        session_id: session_id.clone(),
        company: company.clone(),
        user_message: req.message,
        bot_response: turn.reply.clone(),
        agent_actions: turn.trace.steps().to_vec(),
    };
    if let Err(e) = state.chat_log.append(entry).await {
        warn!("Failed to append chat log for session {session_id}: {e}");
    }

    Ok(Json(ChatResponse {
        response: turn.reply,
        session_id,
        detected_company: company,
        agent_actions: turn.trace.into_steps(),
    }))
}
