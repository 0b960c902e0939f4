//! Document - High-level document API

use std::cell::RefCell;
use std::rc::Rc;

use crate::{DomError, DomTree, ElementData, NodeData, NodeId, SharedDocument};

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Currently focused element
    focused: Option<NodeId>,
    /// Elements scrolled into view, oldest first
    scrolled: Vec<NodeId>,
    /// Last validation bubble shown by `report_validity`
    pub(crate) reported: Option<(NodeId, String)>,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Freshly created nodes can always be linked
        let _ = doc.tree.append_child(NodeId::ROOT, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            focused: None,
            scrolled: Vec::new(),
            reported: None,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self.first_child_tagged(root, "html");
        if self.html_element.is_valid() {
            self.head_element = self.first_child_tagged(self.html_element, "head");
            self.body_element = self.first_child_tagged(self.html_element, "body");
        }
    }

    fn first_child_tagged(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree
            .children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.is(tag)))
            .map_or(NodeId::NONE, |(id, _)| id)
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ---- elements and attributes -------------------------------------

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.tree.get_mut(id)?.as_element_mut()
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|e| e.is(tag))
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute. Returns whether the stored value changed.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(elem) => elem.set_attr(name, value),
            None => false,
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.attrs.remove(name).is_some())
    }

    /// Get element by ID (first in tree order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.element(node).and_then(ElementData::id) == Some(id))
    }

    /// Nearest inclusive ancestor matching `pred`
    pub fn closest(&self, id: NodeId, pred: impl Fn(&ElementData) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .find(|&node| self.element(node).is_some_and(&pred))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.tree.get(id).and_then(|n| n.as_text()) {
            out.push_str(text);
        }
        for node in self.tree.descendants(id) {
            if let Some(NodeData::Text(text)) = self.tree.get(node).map(|n| &n.data) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace all children with a single text node (none for "")
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.tree.clear_children(id);
        if text.is_empty() {
            return;
        }
        let node = self.tree.create_text(text);
        let _ = self.tree.append_child(id, node);
    }

    /// Detach every child
    pub fn clear_children(&mut self, id: NodeId) {
        self.tree.clear_children(id);
    }

    /// Position of each node in document tree order
    pub fn tree_order(&self) -> Vec<NodeId> {
        self.tree.descendants(self.tree.root())
    }

    // ---- focus and scrolling -----------------------------------------

    /// Focus an element. Non-elements are ignored.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        tracing::trace!(?id, "focus");
        self.focused = Some(id);
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// Bring an element into view
    pub fn scroll_into_view(&mut self, id: NodeId) {
        if self.element(id).is_some() {
            tracing::trace!(?id, "scroll into view");
            self.scrolled.push(id);
        }
    }

    /// Most recently scrolled-to element
    pub fn last_scrolled(&self) -> Option<NodeId> {
        self.scrolled.last().copied()
    }

    /// Every element scrolled into view so far, oldest first
    pub fn scroll_history(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// The validation bubble currently shown, if any
    pub fn reported_validity(&self) -> Option<(NodeId, &str)> {
        self.reported.as_ref().map(|(id, msg)| (*id, msg.as_str()))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_structure() {
        let doc = Document::new("about:blank");
        assert!(doc.document_element().is_valid());
        assert!(doc.head().is_valid());
        assert!(doc.body().is_valid());
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let p = doc.create_element("p");
        doc.set_attribute(p, "id", "error");
        doc.append_child(doc.body(), p).unwrap();

        assert_eq!(doc.get_element_by_id("error"), Some(p));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert_eq!(doc.get_element_by_id(""), None);
    }

    #[test]
    fn test_detached_elements_are_not_found_by_id() {
        let mut doc = Document::default();
        let p = doc.create_element("p");
        doc.set_attribute(p, "id", "ghost");
        assert_eq!(doc.get_element_by_id("ghost"), None);
    }

    #[test]
    fn test_text_content_roundtrip() {
        let mut doc = Document::default();
        let p = doc.create_element("p");
        doc.append_child(doc.body(), p).unwrap();

        doc.set_text_content(p, "Required");
        assert_eq!(doc.text_content(p), "Required");

        doc.set_text_content(p, "");
        assert_eq!(doc.text_content(p), "");
        assert_eq!(doc.tree().children(p).count(), 0);
    }

    #[test]
    fn test_closest() {
        let mut doc = Document::default();
        let fieldset = doc.create_element("fieldset");
        let input = doc.create_element("input");
        doc.append_child(doc.body(), fieldset).unwrap();
        doc.append_child(fieldset, input).unwrap();

        assert_eq!(doc.closest(input, |e| e.is("fieldset")), Some(fieldset));
        assert_eq!(doc.closest(input, |e| e.is("input")), Some(input));
        assert_eq!(doc.closest(input, |e| e.is("form")), None);
    }

    #[test]
    fn test_focus_and_scroll() {
        let mut doc = Document::default();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input).unwrap();

        assert!(doc.focus(input));
        assert_eq!(doc.active_element(), Some(input));
        assert!(!doc.focus(NodeId::ROOT));

        doc.scroll_into_view(input);
        assert_eq!(doc.last_scrolled(), Some(input));
    }
}
