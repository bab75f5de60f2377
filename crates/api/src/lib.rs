//! Shared API types for repochat.
//!
//! This crate is the single source of truth for all request/response bodies:
//! the server (Axum) serializes them, tests and any future client
//! deserialize the same definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Re-export the file shape shared with the context builder
pub use repochat_core::files::FileEntry;

/// User identifier assumed when a request does not name one.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Session identifier assumed when neither a session nor a repository is
/// named.
pub const DEFAULT_SESSION_ID: &str = "default_session";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

/// Session id derived from a repository name: `octo/cat` → `session_octo_cat`.
pub fn derived_session_id(repository: &str) -> String {
    if repository.is_empty() {
        DEFAULT_SESSION_ID.to_string()
    } else {
        format!("session_{}", repository.replace('/', "_"))
    }
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Repository fetching ─────────────────────────────────────────────────────

/// Query string of `GET /source-code`.
#[derive(Debug, Deserialize)]
pub struct SourceCodeQuery {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// `GET /source-code` success body: the raw path → content mapping.
///
/// `total_files` always equals `files.len()`; failed per-file fetches appear
/// as sentinel strings, never as omissions.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceCodeResponse {
    pub repository: String,
    pub files: BTreeMap<String, String>,
    pub total_files: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateUrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateUrlResponse {
    pub valid: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GatherFilesRequest {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// `POST /gather-files` success body: the array form consumed by frontends,
/// with per-file byte sizes.
#[derive(Debug, Serialize, Deserialize)]
pub struct GatherFilesResponse {
    pub repository: String,
    pub files: Vec<FileEntry>,
    pub total_files: usize,
}

// ─── Agent sessions & chat ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckSessionRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub exists: bool,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub repository: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub user_id: String,
    pub repository: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub repository: String,
    pub files_count: usize,
    pub session_id: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_derivation_replaces_slashes() {
        assert_eq!(derived_session_id("octo/cat"), "session_octo_cat");
        assert_eq!(derived_session_id(""), "default_session");
    }

    #[test]
    fn check_session_request_defaults_user_id() {
        let req: CheckSessionRequest =
            serde_json::from_str(r#"{"session_id": "s1"}"#).expect("parse");
        assert_eq!(req.user_id, DEFAULT_USER_ID);
        assert_eq!(req.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn validate_response_omits_absent_fields() {
        let body = serde_json::to_string(&ValidateUrlResponse {
            valid: true,
            url: "https://github.com/octo/cat".into(),
            message: Some("Valid GitHub URL".into()),
            error: None,
        })
        .expect("serialize");
        assert!(!body.contains("error"));
        assert!(body.contains("Valid GitHub URL"));
    }
}
