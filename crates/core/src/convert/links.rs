//! Rewriting `id:` links in converted markdown.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::index::NoteIndex;

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [text](target); text has no `]`, target has no `)`
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap()
});

/// Where a markdown link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// `id:<identifier>`, another note in the knowledge base.
    Internal(&'a str),
    /// Anything else, kept as written.
    External(&'a str),
}

impl<'a> LinkTarget<'a> {
    pub fn parse(target: &'a str) -> Self {
        match target.strip_prefix("id:") {
            Some(id) => Self::Internal(id),
            None => Self::External(target),
        }
    }
}

/// Rewritten text plus what happened to its internal links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Replace `[text](id:X)` links with `[[Title]]` wikilinks.
///
/// Links to notes missing from `index` become `[Note not found: text](id:X)`.
/// All other links are emitted unchanged.
pub fn rewrite_links(text: &str, index: &NoteIndex) -> Rewritten {
    let mut resolved = 0;
    let mut unresolved = 0;

    let text = MARKDOWN_LINK_RE
        .replace_all(text, |caps: &Captures| {
            let link_text = &caps[1];
            let target = &caps[2];

            match LinkTarget::parse(target) {
                LinkTarget::Internal(id) => match index.get(id) {
                    Some(note) => {
                        resolved += 1;
                        format!("[[{}]]", note.safe_title)
                    }
                    None => {
                        tracing::debug!("Link target not found: {}", target);
                        unresolved += 1;
                        format!("[Note not found: {link_text}]({target})")
                    }
                },
                LinkTarget::External(_) => format!("[{link_text}]({target})"),
            }
        })
        .into_owned();

    Rewritten { text, resolved, unresolved }
}
