//! Content rendering for Quire.
//!
//! A document's extension decides how it is served: `.txt` bodies pass
//! through untouched as `text/plain`, `.md` bodies are converted to HTML
//! with CommonMark semantics. Anything else has no recognized rendering —
//! such documents can exist on disk (pre-seeded) but viewing one is an
//! error the caller recovers from.

use pulldown_cmark::{Parser, html};

use crate::error::RenderError;

/// Extension-derived document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.txt` — served raw.
    PlainText,
    /// `.md` — converted to HTML.
    Markdown,
}

impl DocumentKind {
    /// Derive the kind from a document name, `None` for unrecognized
    /// extensions.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".txt") {
            Some(Self::PlainText)
        } else if name.ends_with(".md") {
            Some(Self::Markdown)
        } else {
            None
        }
    }

    /// The content type a document of this kind is served with.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Markdown => "text/html",
        }
    }
}

/// A rendered document body plus its content type.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub body: String,
    pub content_type: &'static str,
}

/// Render a document's bytes according to its extension.
///
/// Content is interpreted as UTF-8; invalid sequences are replaced rather
/// than rejected, so a half-binary stray file still yields a page.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedType`] for unrecognized extensions.
pub fn render(name: &str, content: &[u8]) -> Result<Rendered, RenderError> {
    let kind = DocumentKind::from_name(name).ok_or_else(|| RenderError::UnsupportedType {
        name: name.to_owned(),
    })?;
    let text = String::from_utf8_lossy(content);

    let body = match kind {
        DocumentKind::PlainText => text.into_owned(),
        DocumentKind::Markdown => {
            let mut out = String::with_capacity(text.len() * 2);
            html::push_html(&mut out, Parser::new(&text));
            out
        }
    };

    Ok(Rendered {
        body,
        content_type: kind.content_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let rendered = render("history.txt", b"2019 - Ruby 2.7 released.").unwrap();
        assert_eq!(rendered.content_type, "text/plain");
        assert_eq!(rendered.body, "2019 - Ruby 2.7 released.");
    }

    #[test]
    fn markdown_heading_becomes_h1() {
        let rendered = render("about.md", b"# Ruby is...").unwrap();
        assert_eq!(rendered.content_type, "text/html");
        assert!(rendered.body.contains("<h1>Ruby is...</h1>"));
    }

    #[test]
    fn markdown_emphasis_and_lists() {
        let rendered = render("notes.md", b"*word*\n\n- one\n- two\n").unwrap();
        assert!(rendered.body.contains("<em>word</em>"));
        assert!(rendered.body.contains("<li>one</li>"));
    }

    #[test]
    fn unrecognized_extension_is_unsupported() {
        let err = render("logo.png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedType { .. }));
    }

    #[test]
    fn kind_from_name() {
        assert_eq!(DocumentKind::from_name("a.txt"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_name("a.md"), Some(DocumentKind::Markdown));
        assert_eq!(DocumentKind::from_name("a.png"), None);
        assert_eq!(DocumentKind::from_name("plain"), None);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let rendered = render("broken.txt", b"ok \xff end").unwrap();
        assert!(rendered.body.starts_with("ok "));
        assert!(rendered.body.ends_with(" end"));
    }
}
