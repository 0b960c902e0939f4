//! HTML5 Parser implementation
//!
//! Parses with html5ever into an RcDom and converts the result to the
//! arena tree.

use fos_dom::{Document, DomTree, ElementData, Node, NodeData, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;
use crate::sanitizer::{Sanitizer, Verdict};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);
        let dom = Self::read(html)?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        Converter { tree: document.tree_mut(), sanitizer: None }.node(&dom.document, root)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `markup` as body content and append the resulting nodes to `parent`
    pub fn insert_fragment(
        &self,
        doc: &mut Document,
        parent: NodeId,
        markup: &str,
        sanitizer: Option<&Sanitizer>,
    ) -> Result<Vec<NodeId>, ParseError> {
        let dom = Self::read(markup)?;
        let Some(body) = find_body(&dom.document) else {
            return Ok(Vec::new());
        };

        let before = doc.tree().children(parent).count();
        let mut converter = Converter { tree: doc.tree_mut(), sanitizer };
        for child in body.children.borrow().iter() {
            converter.node(child, parent)?;
        }

        Ok(doc.tree().children(parent).skip(before).map(|(id, _)| id).collect())
    }

    fn read(html: &str) -> Result<RcDom, ParseError> {
        Ok(parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?)
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// `<body>` of a parsed document (html5ever always synthesizes one)
fn find_body(document: &Handle) -> Option<Handle> {
    let html = first_element(document, "html")?;
    first_element(&html, "body")
}

fn first_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent.children.borrow().iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if name.local.as_ref() == tag))
        .cloned()
}

/// RcDom to arena conversion
struct Converter<'a> {
    tree: &'a mut DomTree,
    sanitizer: Option<&'a Sanitizer>,
}

impl Converter<'_> {
    fn node(&mut self, handle: &Handle, parent: NodeId) -> Result<(), ParseError> {
        match &handle.data {
            RcNodeData::Document => self.children(handle, parent)?,
            RcNodeData::Doctype { name, .. } => {
                let id = self.tree.push(Node::doctype(name));
                self.tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !text.trim().is_empty() {
                    let id = self.tree.create_text(&text);
                    self.tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                if self.sanitizer.is_some_and(|s| !s.config().allow_comments) {
                    return Ok(());
                }
                let id = self.tree.create_comment(contents);
                self.tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref();
                let verdict = self.sanitizer.map_or(Verdict::Keep, |s| s.element(tag));
                match verdict {
                    Verdict::Drop => {
                        tracing::debug!(tag, "dropped element from inserted markup");
                    }
                    Verdict::Unwrap => self.children(handle, parent)?,
                    Verdict::Keep => {
                        let mut elem = ElementData::new(tag);
                        for attr in attrs.borrow().iter() {
                            let attr_name = attr.name.local.as_ref();
                            let value = attr.value.as_ref();
                            if self.sanitizer.is_none_or(|s| s.attribute(tag, attr_name, value)) {
                                elem.set_attr(attr_name, value);
                            }
                        }
                        let id = self.tree.push(Node::with_element(elem));
                        self.tree.append_child(parent, id)?;
                        self.children(handle, id)?;
                    }
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }

    fn children(&mut self, handle: &Handle, parent: NodeId) -> Result<(), ParseError> {
        for child in handle.children.borrow().iter() {
            self.node(child, parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();
        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert!(doc.body().is_valid());
    }

    #[test]
    fn test_parse_fragment_gets_body() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        assert!(doc.body().is_valid());
        assert_eq!(doc.text_content(doc.body()), "Text");
    }

    #[test]
    fn test_attributes_are_kept() {
        let doc = HtmlParser::new()
            .parse(r#"<form id="signup"><input name="email" type="email" required></form>"#)
            .unwrap();
        let form = doc.get_element_by_id("signup").unwrap();
        let (input, _) = doc.tree().children(form).next().unwrap();
        assert_eq!(doc.get_attribute(input, "type"), Some("email"));
        assert!(doc.has_attribute(input, "required"));
    }

    #[test]
    fn test_insert_fragment_returns_top_level_nodes() {
        let mut doc = Document::default();
        let body = doc.body();
        let inserted = HtmlParser::new()
            .insert_fragment(&mut doc, body, "<b>Bad</b> input", None)
            .unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(doc.text_content(body), "Bad input");
    }
}
