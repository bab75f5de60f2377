use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use repochat_api::{
    FileEntry, GatherFilesRequest, GatherFilesResponse, SourceCodeQuery, SourceCodeResponse,
    ValidateUrlRequest, ValidateUrlResponse,
};
use repochat_core::{RepoRef, is_valid_repo_url};
use repochat_github::GithubClient;

use crate::error::ApiErr;

const INVALID_URL_MSG: &str = "Invalid GitHub URL format";
const REPO_UNAVAILABLE_MSG: &str = "Repository not found or inaccessible";

fn invalid_url(url: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": INVALID_URL_MSG, "url": url})),
    )
        .into_response()
}

/// GET /source-code?url=&token= — full repository snapshot as a
/// path → content mapping.
pub async fn source_code(
    State(github): State<Arc<GithubClient>>,
    Query(query): Query<SourceCodeQuery>,
) -> Response {
    let Some(url) = query.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Missing URL parameter",
                "usage": "GET /source-code?url=https://github.com/owner/repo&token=YOUR_TOKEN (optional)",
            })),
        )
            .into_response();
    };

    let Ok(repo) = RepoRef::parse(&url) else {
        return invalid_url(url);
    };

    match github.fetch_source(&repo, query.token.as_deref()).await {
        Ok(snapshot) => {
            let total_files = snapshot.files.len();
            Json(SourceCodeResponse {
                repository: snapshot.repository,
                files: snapshot.files,
                total_files,
            })
            .into_response()
        }
        Err(err) => {
            tracing::warn!("source fetch for {repo} failed: {err}");
            ApiErr::not_found(REPO_UNAVAILABLE_MSG).into_response()
        }
    }
}

/// POST /validate-github-url — shape check, then a reachability probe.
pub async fn validate_url(
    State(github): State<Arc<GithubClient>>,
    body: Result<Json<ValidateUrlRequest>, JsonRejection>,
) -> Response {
    let Some(url) = body.ok().and_then(|Json(req)| req.url) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing URL in request body", "valid": false})),
        )
            .into_response();
    };

    if !is_valid_repo_url(&url) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidateUrlResponse {
                valid: false,
                url,
                message: None,
                error: Some(INVALID_URL_MSG.to_string()),
            }),
        )
            .into_response();
    }

    if !github.url_exists(&url).await {
        return (
            StatusCode::NOT_FOUND,
            Json(ValidateUrlResponse {
                valid: false,
                url,
                message: None,
                error: Some("GitHub URL does not exist or is not accessible".to_string()),
            }),
        )
            .into_response();
    }

    Json(ValidateUrlResponse {
        valid: true,
        url,
        message: Some("Valid GitHub URL".to_string()),
        error: None,
    })
    .into_response()
}

/// POST /gather-files — same snapshot, in the array form frontends consume.
pub async fn gather_files(
    State(github): State<Arc<GithubClient>>,
    body: Result<Json<GatherFilesRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return ApiErr::bad_request("Missing URL in request body").into_response();
    };
    let Some(url) = req.url else {
        return ApiErr::bad_request("Missing URL in request body").into_response();
    };

    let Ok(repo) = RepoRef::parse(&url) else {
        return invalid_url(url);
    };

    match github.fetch_source(&repo, req.token.as_deref()).await {
        Ok(snapshot) => {
            let files: Vec<FileEntry> = snapshot
                .files
                .into_iter()
                .map(|(path, content)| FileEntry::new(path, content))
                .collect();
            let total_files = files.len();
            Json(GatherFilesResponse {
                repository: snapshot.repository,
                files,
                total_files,
            })
            .into_response()
        }
        Err(err) => {
            tracing::warn!("gather for {repo} failed: {err}");
            ApiErr::not_found(REPO_UNAVAILABLE_MSG).into_response()
        }
    }
}
