use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([\w\-\.]+)/([\w\-\.]+)/?.*$").unwrap()
});

/// An `owner/name` pair identifying a GitHub repository.
///
/// Derived once from a user-supplied URL and reused for the tree listing and
/// every per-file request of that operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RepoUrlError {
    #[error("not a GitHub repository url")]
    InvalidFormat,
}

impl RepoRef {
    /// Parse `http(s)://github.com/<owner>/<repo>` with an optional trailing
    /// path or query. Owner and repo are limited to word characters, `-`
    /// and `.`; a trailing `.git` on the repo name is stripped.
    pub fn parse(url: &str) -> Result<Self, RepoUrlError> {
        let caps = REPO_URL_RE
            .captures(url)
            .ok_or(RepoUrlError::InvalidFormat)?;

        let owner = caps[1].to_string();
        let raw_name = &caps[2];
        let name = raw_name.strip_suffix(".git").unwrap_or(raw_name).to_string();

        Ok(Self { owner, name })
    }

    /// `"owner/name"` as used in API paths and response bodies.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Shape-only check, no network access.
pub fn is_valid_repo_url(url: &str) -> bool {
    RepoRef::parse(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_repo_url() {
        let repo = RepoRef::parse("https://github.com/octo/cat").expect("parse");
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.name, "cat");
        assert_eq!(repo.full_name(), "octo/cat");
    }

    #[test]
    fn accepts_trailing_path_and_query() {
        assert!(is_valid_repo_url("https://github.com/octo/cat/tree/main/src"));
        assert!(is_valid_repo_url("https://github.com/octo/cat?tab=readme-ov-file"));
        assert!(is_valid_repo_url("http://github.com/octo/cat/"));
    }

    #[test]
    fn strips_git_suffix() {
        let repo = RepoRef::parse("https://github.com/octo/cat.git").expect("parse");
        assert_eq!(repo.name, "cat");
        // only a literal `.git` suffix is removed
        let repo = RepoRef::parse("https://github.com/octo/cat.gitx").expect("parse");
        assert_eq!(repo.name, "cat.gitx");
    }

    #[test]
    fn allows_dots_and_hyphens_in_segments() {
        let repo = RepoRef::parse("https://github.com/my-org.io/my.repo-2").expect("parse");
        assert_eq!(repo.owner, "my-org.io");
        assert_eq!(repo.name, "my.repo-2");
    }

    #[test]
    fn rejects_missing_repo_segment() {
        assert!(!is_valid_repo_url("https://github.com/owner"));
        assert!(!is_valid_repo_url("https://github.com/"));
    }

    #[test]
    fn rejects_wrong_scheme_or_host() {
        assert!(!is_valid_repo_url("ftp://github.com/a/b"));
        assert!(!is_valid_repo_url("https://gitlab.com/a/b"));
        assert!(!is_valid_repo_url("not-a-url"));
    }
}
