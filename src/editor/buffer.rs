use crate::editor::traits::Editor;
use std::fmt;
use std::str::FromStr;

/// How links are written into a text buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkFormat {
    /// `[label](url)`
    #[default]
    Markdown,

    /// `<a href="url">label</a>`
    Html,
}

impl LinkFormat {
    /// Renders a link in this format
    pub fn render(&self, text: &str, href: &str) -> String {
        match self {
            LinkFormat::Markdown => format!(
                "[{}]({})",
                text.replace('[', "\\[").replace(']', "\\]"),
                href.replace(' ', "%20").replace(')', "%29")
            ),
            LinkFormat::Html => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(href),
                escape_html(text)
            ),
        }
    }
}

impl fmt::Display for LinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkFormat::Markdown => f.write_str("markdown"),
            LinkFormat::Html => f.write_str("html"),
        }
    }
}

impl FromStr for LinkFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(LinkFormat::Markdown),
            "html" => Ok(LinkFormat::Html),
            other => Err(format!("unknown link format '{}'", other)),
        }
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// In-memory document with a cursor
///
/// Stands in for the host editor in the CLI and in tests. Messages are
/// collected instead of shown.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    content: String,
    cursor: usize,
    format: LinkFormat,
    messages: Vec<String>,
}

impl TextBuffer {
    /// Creates an empty buffer
    pub fn new(format: LinkFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Creates a buffer holding `content` with the cursor at byte offset `cursor`
    ///
    /// The cursor is clamped to the content and moved back to a char boundary.
    pub fn with_content(content: &str, cursor: usize, format: LinkFormat) -> Self {
        let mut cursor = cursor.min(content.len());
        while !content.is_char_boundary(cursor) {
            cursor -= 1;
        }

        Self {
            content: content.to_string(),
            cursor,
            format,
            messages: Vec::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// True if nothing was ever written to the document or shown to the user
    pub fn is_untouched(&self) -> bool {
        self.content.is_empty() && self.messages.is_empty()
    }

    fn insert(&mut self, text: &str) {
        self.content.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

impl Editor for TextBuffer {
    fn insert_link(&mut self, text: &str, href: &str) {
        let rendered = self.format.render(text, href);
        self.insert(&rendered);
    }

    fn insert_text(&mut self, text: &str) {
        self.insert(text);
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
