//! Error messages
//!
//! A message is either plain text or rich content made of text and markup
//! segments. Only rendered errors may carry rich content.

use std::fmt;

/// One piece of rich content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Inserted as a text node
    Text(String),
    /// Parsed as HTML before insertion
    Markup(String),
}

/// Ordered text and markup segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichContent {
    segments: Vec<Segment>,
}

impl RichContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.segments.push(Segment::Markup(markup.into()));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// No segment carries any content
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| match s {
            Segment::Text(t) | Segment::Markup(t) => t.is_empty(),
        })
    }
}

impl From<Vec<Segment>> for RichContent {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

/// An error message shown for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    Plain(String),
    Rich(RichContent),
}

impl ErrorMessage {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.is_empty(),
            Self::Rich(content) => content.is_empty(),
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich(_))
    }

    /// Text a user would read. Markup segments contribute their text content.
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Rich(content) => content.segments.iter()
                .map(|segment| match segment {
                    Segment::Text(text) => text.clone(),
                    Segment::Markup(markup) => markup_text(markup),
                })
                .collect(),
        }
    }
}

fn markup_text(markup: &str) -> String {
    match fos_html::parse(markup) {
        Ok(doc) => doc.text_content(doc.body()),
        Err(err) => {
            tracing::warn!(%err, "could not parse markup segment; using it verbatim");
            markup.to_string()
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_text())
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl From<RichContent> for ErrorMessage {
    fn from(content: RichContent) -> Self {
        Self::Rich(content)
    }
}
