pub mod client;
pub mod error;

pub use client::{EntryKind, GithubClient, RepoSnapshot, TreeEntry};
pub use error::GithubError;
