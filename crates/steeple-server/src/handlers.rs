use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use steeple_core::SUBMISSION_COLLECTION;
use steeple_ingest::{TaskError, process_task};
use tracing::{info, warn};

use crate::server::AppState;

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "steeple-server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// POST /tasks/church — accept one church task payload, resolve a free
/// slug, and write the submission record to Directus.
///
/// Response envelope is the task pipeline's contract: `{"success": true}`
/// or `{"success": false, "error": "..."}`.
pub async fn church_task(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let probe_client = state.directus.clone();
    let result = process_task(&payload, state.bot_active, |slug| {
        let client = probe_client.clone();
        // A failed probe counts as "slug free"; a genuine collision is
        // still caught by the unique constraint on insert.
        async move {
            client
                .item_exists_by_slug(SUBMISSION_COLLECTION, &slug)
                .await
                .unwrap_or(false)
        }
    })
    .await;

    let record = match result {
        Ok(record) => record,
        Err(error) => {
            let status = match error {
                TaskError::BotDisabled => StatusCode::FORBIDDEN,
                TaskError::NotAnObject | TaskError::MissingName => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            };
            return (
                status,
                Json(json!({"success": false, "error": error.to_string()})),
            );
        }
    };

    match state.directus.create_item(SUBMISSION_COLLECTION, &record).await {
        Ok(_) => {
            info!(slug = %record["slug"], "stored church submission");
            (StatusCode::OK, Json(json!({"success": true})))
        }
        Err(error) => {
            warn!(%error, "submission write failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"success": false, "error": error.to_string()})),
            )
        }
    }
}
