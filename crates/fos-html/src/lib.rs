//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever, plus the serializer and sanitizer used
//! when markup is written into a live document.

mod parser;
mod sanitizer;
mod serializer;

pub use fos_dom::Document;
pub use parser::HtmlParser;
pub use sanitizer::{Sanitizer, SanitizerConfig};
pub use serializer::{HtmlSerializer, escape_text};

use fos_dom::NodeId;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse `markup` as a fragment and append it to `parent`.
///
/// With the `sanitize` feature (on by default) scripts, event handler
/// attributes and script URLs are removed first. Returns the inserted
/// top-level nodes.
pub fn insert_markup(doc: &mut Document, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, ParseError> {
    if cfg!(feature = "sanitize") {
        let sanitizer = Sanitizer::default_safe();
        HtmlParser::new().insert_fragment(doc, parent, markup, Some(&sanitizer))
    } else {
        HtmlParser::new().insert_fragment(doc, parent, markup, None)
    }
}

/// innerHTML of a node
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(doc.tree(), node)
}

/// outerHTML of a node
pub fn outer_html(doc: &Document, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(doc.tree(), node)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] fos_dom::DomError),
}
