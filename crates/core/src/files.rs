use serde::{Deserialize, Serialize};

/// One fetched repository file, in the array form the HTTP surface exposes.
///
/// `content` is either the decoded file body or the sentinel string recorded
/// when that one fetch failed; `size` is the UTF-8 byte length of `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            size: content.len() as u64,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_utf8_byte_length() {
        let entry = FileEntry::new("src/main.rs", "héllo");
        assert_eq!(entry.size, 6);
    }

    #[test]
    fn size_defaults_to_zero_when_absent() {
        let entry: FileEntry =
            serde_json::from_str(r#"{"path": "a.rs", "content": "fn main() {}"}"#).expect("parse");
        assert_eq!(entry.size, 0);
    }
}
