use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use repochat_agent_client::{AgentClient, AgentError};
use repochat_api::{
    ChatRequest, ChatResponse, CheckSessionRequest, CreateSessionRequest, CreateSessionResponse,
    SessionStatusResponse, derived_session_id,
};
use repochat_core::{ContextLimits, build_prompt};

use crate::error::ApiErr;

const AGENT_UNREACHABLE_MSG: &str =
    "Could not connect to agent service. Make sure it is running on port 8080.";

/// Upstream status and body, echoed for diagnosis.
fn upstream_failure(error: String, body: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": error,
            "details": body,
        })),
    )
        .into_response()
}

/// POST /check-session — does the runtime already hold this session?
pub async fn check_session(
    State(agent): State<Arc<AgentClient>>,
    body: Result<Json<CheckSessionRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return ApiErr::bad_request("Missing request body").into_response();
    };
    let Some(session_id) = req.session_id else {
        return ApiErr::bad_request("Missing session_id").into_response();
    };

    match agent.session_exists(&req.user_id, &session_id).await {
        Ok(true) => Json(SessionStatusResponse {
            exists: true,
            session_id,
        })
        .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(SessionStatusResponse {
                exists: false,
                session_id,
            }),
        )
            .into_response(),
        Err(AgentError::Unavailable(err)) => {
            tracing::warn!("agent service unreachable: {err}");
            ApiErr::unavailable(AGENT_UNREACHABLE_MSG).into_response()
        }
        Err(err) => ApiErr::internal(format!("Error checking session: {err}")).into_response(),
    }
}

/// POST /create-session — create a runtime session seeded with the
/// repository.
pub async fn create_session(
    State(agent): State<Arc<AgentClient>>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return ApiErr::bad_request("Missing request body").into_response();
    };
    let session_id = req
        .session_id
        .unwrap_or_else(|| derived_session_id(&req.repository));

    match agent
        .create_session(&req.user_id, &session_id, &req.repository)
        .await
    {
        Ok(assigned) => Json(CreateSessionResponse {
            session_id: assigned,
            user_id: req.user_id,
            repository: req.repository,
            message: "Session created successfully".to_string(),
        })
        .into_response(),
        Err(AgentError::Unavailable(err)) => {
            tracing::warn!("agent service unreachable: {err}");
            ApiErr::unavailable(AGENT_UNREACHABLE_MSG).into_response()
        }
        Err(AgentError::Status { status, body }) => {
            upstream_failure(format!("Failed to create session: {status}"), body)
        }
        Err(err) => ApiErr::internal(format!("Error creating session: {err}")).into_response(),
    }
}

/// POST /chat — relay one question about the repository to the agent.
///
/// When no session id is supplied, one is derived from the repository name
/// and a create is attempted first, best-effort: the runtime may already
/// hold that session.
pub async fn chat(
    State(agent): State<Arc<AgentClient>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return ApiErr::bad_request("Missing message in request body").into_response();
    };
    let Some(message) = req.message else {
        return ApiErr::bad_request("Missing message in request body").into_response();
    };

    let session_id = match req.session_id {
        Some(id) => id,
        None => {
            let derived = derived_session_id(&req.repository);
            if let Err(err) = agent
                .create_session(&req.user_id, &derived, &req.repository)
                .await
            {
                tracing::debug!("pre-chat session create failed: {err}");
            }
            derived
        }
    };

    let prompt = build_prompt(
        &req.repository,
        &req.files,
        &message,
        &ContextLimits::default(),
    );

    match agent.run(&req.user_id, &session_id, &prompt).await {
        Ok(response) => Json(ChatResponse {
            response,
            repository: req.repository,
            files_count: req.files.len(),
            session_id,
            user_id: req.user_id,
        })
        .into_response(),
        Err(AgentError::Unavailable(err)) => {
            tracing::warn!("agent service unreachable: {err}");
            ApiErr::unavailable(AGENT_UNREACHABLE_MSG).into_response()
        }
        Err(AgentError::Timeout) => {
            ApiErr::gateway_timeout("Agent service request timed out").into_response()
        }
        Err(AgentError::Status { status, body }) => {
            upstream_failure(format!("Agent service returned status {status}"), body)
        }
        Err(err) => {
            ApiErr::internal(format!("Error processing chat request: {err}")).into_response()
        }
    }
}
