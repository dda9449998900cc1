use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::chat_log::analytics::compute_analytics;
use crate::chat_log::parse_log_date;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /admin/logs/:date
pub async fn handle_get_logs(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Value>, AppError> {
    let date = parse_log_date(&date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date '{date}', expected YYYYMMDD")))?;

    let body = match state.chat_log.read(date).await? {
        Some(logs) => json!({ "logs": logs }),
        None => json!({ "logs": [], "message": "No logs found for this date" }),
    };
    Ok(Json(body))
}

/// GET /admin/analytics
pub async fn handle_analytics(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let body = match state.chat_log.read_today().await? {
        Some(entries) => json!(compute_analytics(&entries)),
        None => json!({ "message": "No data for today" }),
    };
    Ok(Json(body))
}
