//! Context assembly for chat requests.
//!
//! The agent runtime sits behind a token-limited model, so only a bounded
//! slice of the repository goes into each message: the first
//! [`ContextLimits::max_files`] files, each truncated to
//! [`ContextLimits::max_snippet_chars`] characters.

use crate::files::FileEntry;

/// Marker appended to a snippet that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Payload caps for one chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub max_files: usize,
    pub max_snippet_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_snippet_chars: 500,
        }
    }
}

/// Render the repository header plus per-file snippets.
///
/// Truncation counts characters, not bytes, so a snippet never ends inside a
/// multi-byte sequence. Files beyond the cap are dropped from the context but
/// still counted in the "Analyzing N files" line.
pub fn build_context(repository: &str, files: &[FileEntry], limits: &ContextLimits) -> String {
    let mut context = format!("Repository: {repository}\n\n");

    if files.is_empty() {
        return context;
    }

    context.push_str(&format!(
        "Analyzing {} files from the codebase.\n\n",
        files.len()
    ));

    for entry in files.iter().take(limits.max_files) {
        context.push_str(&format!("File: {}\n", entry.path));

        if entry.content.is_empty() {
            continue;
        }

        let mut chars = entry.content.char_indices();
        match chars.nth(limits.max_snippet_chars) {
            Some((cut, _)) => {
                context.push_str(&entry.content[..cut]);
                context.push_str(TRUNCATION_MARKER);
                context.push_str("\n\n");
            }
            None => {
                context.push_str(&entry.content);
                context.push_str("\n\n");
            }
        }
    }

    context
}

/// Context plus the question itself, as one text block for the agent.
pub fn build_prompt(
    repository: &str,
    files: &[FileEntry],
    message: &str,
    limits: &ContextLimits,
) -> String {
    let context = build_context(repository, files, limits);
    format!("{context}\nUser Question: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &str) -> FileEntry {
        FileEntry::new(path, content)
    }

    #[test]
    fn header_only_when_no_files() {
        let context = build_context("octo/cat", &[], &ContextLimits::default());
        assert_eq!(context, "Repository: octo/cat\n\n");
    }

    #[test]
    fn short_content_passes_through_unmodified() {
        let files = vec![entry("src/lib.rs", "pub fn x() {}")];
        let context = build_context("octo/cat", &files, &ContextLimits::default());
        assert!(context.contains("Analyzing 1 files from the codebase.\n\n"));
        assert!(context.contains("File: src/lib.rs\npub fn x() {}\n\n"));
        assert!(!context.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn long_content_truncates_to_exactly_the_cap() {
        let body = "x".repeat(501);
        let files = vec![entry("big.rs", &body)];
        let context = build_context("octo/cat", &files, &ContextLimits::default());

        let snippet = format!("{}...", "x".repeat(500));
        assert!(context.contains(&snippet));
        assert!(!context.contains(&"x".repeat(501)));
    }

    #[test]
    fn content_at_the_cap_is_not_truncated() {
        let body = "y".repeat(500);
        let files = vec![entry("exact.rs", &body)];
        let context = build_context("octo/cat", &files, &ContextLimits::default());
        assert!(context.contains(&format!("{body}\n\n")));
        assert!(!context.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // 501 two-byte characters; a byte cut at 500 would split one of them
        let body = "é".repeat(501);
        let files = vec![entry("utf8.rs", &body)];
        let context = build_context("octo/cat", &files, &ContextLimits::default());
        assert!(context.contains(&format!("{}...", "é".repeat(500))));
    }

    #[test]
    fn only_first_ten_files_enter_the_context() {
        let files: Vec<FileEntry> = (0..25)
            .map(|i| entry(&format!("file{i}.rs"), "fn f() {}"))
            .collect();
        let context = build_context("octo/cat", &files, &ContextLimits::default());

        assert!(context.contains("Analyzing 25 files from the codebase."));
        assert!(context.contains("File: file9.rs\n"));
        assert!(!context.contains("File: file10.rs\n"));
    }

    #[test]
    fn empty_content_lists_the_path_without_a_snippet() {
        let files = vec![entry("empty.rs", "")];
        let context = build_context("octo/cat", &files, &ContextLimits::default());
        assert!(context.ends_with("File: empty.rs\n"));
    }

    #[test]
    fn prompt_appends_the_question_label() {
        let prompt = build_prompt("octo/cat", &[], "what does this do?", &ContextLimits::default());
        assert!(prompt.ends_with("\nUser Question: what does this do?"));
        assert!(prompt.starts_with("Repository: octo/cat\n\n"));
    }
}
