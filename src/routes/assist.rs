//! AI text-assist endpoint
//!
//! Prefills a note from the selected text. Provider failure is not an
//! error here: the response carries an empty result and the note simply
//! starts blank.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::assist::AssistAction;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the assist router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(assist))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssistRequest {
    action: AssistAction,
    text: String,
    target_lang: Option<String>,
}

#[derive(Serialize)]
struct AssistResponse {
    result: String,
}

async fn assist(
    State(state): State<AppState>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<AssistResponse>> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text must not be empty".to_string()));
    }

    let result = state
        .assist()
        .prefill(request.action, &request.text, request.target_lang.as_deref())
        .await
        .unwrap_or_default();

    Ok(Json(AssistResponse { result }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::corpus::client::StaticCorpus;
    use crate::routes::testing::{state_with, BrokenAssist, FixedAssist};

    async fn server_with(assist: Box<dyn crate::assist::AssistProvider>) -> TestServer {
        let state = state_with(
            StaticCorpus::with_document("doc-1", "Costituzione", "corpo"),
            assist,
        )
        .await;
        TestServer::new(router().with_state(state)).unwrap()
    }

    #[tokio::test]
    async fn test_summarize() {
        let server = server_with(Box::new(FixedAssist("riassunto"))).await;

        let response = server
            .post("/")
            .json(&json!({ "action": "summarize", "text": "Art. 1. La Repubblica" }))
            .await;
        response.assert_status_ok();

        let json: Value = response.json();
        assert_eq!(json["result"], "riassunto");
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_empty_result() {
        let server = server_with(Box::new(BrokenAssist)).await;

        let response = server
            .post("/")
            .json(&json!({ "action": "translate", "text": "testo", "targetLang": "English" }))
            .await;
        response.assert_status_ok();

        let json: Value = response.json();
        assert_eq!(json["result"], "");
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let server = server_with(Box::new(FixedAssist("x"))).await;
        let response = server
            .post("/")
            .json(&json!({ "action": "summarize", "text": " " }))
            .await;
        assert_eq!(response.status_code(), 400);
    }

    #[tokio::test]
    async fn test_unknown_action_rejected() {
        let server = server_with(Box::new(FixedAssist("x"))).await;
        let response = server
            .post("/")
            .json(&json!({ "action": "export", "text": "testo" }))
            .await;
        assert_eq!(response.status_code(), 422);
    }
}
