use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::future::join_all;
use reqwest::header;
use serde::Deserialize;

use repochat_core::RepoRef;

use crate::error::GithubError;

/// Content sentinel prefix recorded when one file fetch fails.
pub const FETCH_ERROR_PREFIX: &str = "Error fetching file: ";

/// Content sentinel recorded when the API body carries no `content` field.
pub const NO_CONTENT_SENTINEL: &str = "No content available";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = "Mozilla/5.0";
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github.v3+json";

// The recursive tree can be large; per-file bodies are small.
const TREE_TIMEOUT: Duration = Duration::from_secs(30);
const FILE_TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// One item of a recursive tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EntryKind {
    Blob,
    Tree,
    Other,
}

impl From<String> for EntryKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "blob" => Self::Blob,
            "tree" => Self::Tree,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
}

/// Full content snapshot of one repository at its default-ish branch.
///
/// `files` holds one entry per blob in the tree — a failed fetch contributes
/// its sentinel string, never an omission.
#[derive(Debug)]
pub struct RepoSnapshot {
    pub repository: String,
    pub files: BTreeMap<String, String>,
}

/// Client for the GitHub REST API.
///
/// Holds one `reqwest::Client` so connection setup is amortized across the
/// per-file fan-out of a fetch operation. A token passed to an individual
/// call takes precedence over the process-wide one stored here.
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, token)
    }

    /// Point the client at a different API origin (tests).
    pub fn with_base_url(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn resolve_token<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.token.as_deref())
    }

    fn api_get(&self, url: &str, token: Option<&str>, timeout: Duration) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, ACCEPT_GITHUB_JSON)
            .timeout(timeout);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("token {token}"));
        }
        req
    }

    /// Probe a URL for reachability: one GET, success status or bust.
    ///
    /// A 404 and a transient network failure both come back `false`; callers
    /// only learn "not accessible".
    pub async fn url_exists(&self, url: &str) -> bool {
        let req = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(PROBE_TIMEOUT);
        match req.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Recursive tree listing, trying `main` and then `master`.
    ///
    /// The two names are a heuristic, not a default-branch lookup —
    /// repositories defaulting to anything else surface as the second
    /// attempt's error.
    pub async fn fetch_tree(
        &self,
        repo: &RepoRef,
        token: Option<&str>,
    ) -> Result<Vec<TreeEntry>, GithubError> {
        let token = self.resolve_token(token);
        match self.tree_for_branch(repo, "main", token).await {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::debug!("tree listing for {repo} on main failed ({err}), trying master");
                self.tree_for_branch(repo, "master", token).await
            }
        }
    }

    async fn tree_for_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        token: Option<&str>,
    ) -> Result<Vec<TreeEntry>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{branch}?recursive=1",
            self.base_url, repo.owner, repo.name
        );
        let resp = self.api_get(&url, token, TREE_TIMEOUT).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GithubError::Status(status.as_u16()));
        }
        let body: TreeResponse = resp
            .json()
            .await
            .map_err(|e| GithubError::Decode(e.to_string()))?;
        Ok(body.tree)
    }

    /// Retrieve and decode one file. Never fails: any error is folded into
    /// the returned content as a sentinel string.
    pub async fn fetch_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
        token: Option<&str>,
    ) -> String {
        match self.try_file(repo, path, token).await {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!("content fetch for {repo}:{path} failed: {err}");
                format!("{FETCH_ERROR_PREFIX}{err}")
            }
        }
    }

    async fn try_file(
        &self,
        repo: &RepoRef,
        path: &str,
        token: Option<&str>,
    ) -> Result<String, GithubError> {
        let token = self.resolve_token(token);
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            repo.owner,
            repo.name,
            encode_path(path)
        );
        let resp = self.api_get(&url, token, FILE_TIMEOUT).send().await?;
        // No status check here: an error body simply lacks `content`.
        let body: ContentsResponse = resp
            .json()
            .await
            .map_err(|e| GithubError::Decode(e.to_string()))?;
        match body.content {
            Some(raw) => decode_blob(&raw),
            None => Ok(NO_CONTENT_SENTINEL.to_string()),
        }
    }

    /// Tree discovery plus an unbounded concurrent fan-out over every blob.
    ///
    /// One future per file, all joined before returning; a failed fetch is
    /// absorbed into its sentinel and never aborts a sibling. Only the tree
    /// stage can fail the whole operation.
    pub async fn fetch_source(
        &self,
        repo: &RepoRef,
        token: Option<&str>,
    ) -> Result<RepoSnapshot, GithubError> {
        let entries = self.fetch_tree(repo, token).await?;
        let blobs: Vec<TreeEntry> = entries
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::Blob)
            .collect();

        tracing::info!("fetching {} files from {repo}", blobs.len());

        let fetches = blobs.into_iter().map(|entry| async move {
            let content = self.fetch_file_content(repo, &entry.path, token).await;
            (entry.path, content)
        });
        let files: BTreeMap<String, String> = join_all(fetches).await.into_iter().collect();

        Ok(RepoSnapshot {
            repository: repo.full_name(),
            files,
        })
    }
}

/// Percent-encode each path segment, keeping `/` separators intact.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Base64-decode a contents payload (GitHub line-wraps it), then decode the
/// bytes as UTF-8 with invalid sequences replaced rather than raised.
fn decode_blob(raw: &str) -> Result<String, GithubError> {
    let compact: String = raw.split_whitespace().collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| GithubError::Decode(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
