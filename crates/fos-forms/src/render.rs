//! Error display
//!
//! Writes a resolved error into the document: native custom validity,
//! `aria-invalid` and the accessible description container named by the
//! anchor's `aria-describedby`.

use std::rc::Rc;

use fos_a11y::{AriaState, description_target, set_state};
use fos_dom::{Document, NodeId};

use crate::message::{ErrorMessage, Segment};
use crate::radio::FieldTarget;

/// Paints a message into a description container; `None` clears it.
///
/// Receives the document already borrowed; it must not borrow the shared
/// document again.
pub type Renderer = Rc<dyn Fn(&mut Document, NodeId, Option<&ErrorMessage>)>;

/// Brings a failing field (or its radiogroup) into view
pub type Scroller = Rc<dyn Fn(&mut Document, NodeId)>;

/// Renderer used when none is configured.
///
/// Plain messages and markup segments are parsed as HTML (sanitized unless
/// `fos-html` is built without `sanitize`); text segments become text nodes.
pub fn default_renderer() -> Renderer {
    Rc::new(paint)
}

fn paint(doc: &mut Document, container: NodeId, message: Option<&ErrorMessage>) {
    doc.clear_children(container);
    let Some(message) = message else {
        return;
    };

    let segments = match message {
        ErrorMessage::Plain(markup) => vec![Segment::Markup(markup.clone())],
        ErrorMessage::Rich(content) => content.segments().to_vec(),
    };
    for segment in segments {
        match segment {
            Segment::Text(text) => {
                let node = doc.create_text(&text);
                if let Err(err) = doc.append_child(container, node) {
                    tracing::warn!(%err, "could not append error text");
                }
            }
            Segment::Markup(markup) => {
                if let Err(err) = fos_html::insert_markup(doc, container, &markup) {
                    tracing::warn!(%err, "could not render error markup");
                }
            }
        }
    }
}

/// Show `message` on `target`. Returns `false` if nothing was written.
pub(crate) fn show_error(
    doc: &mut Document,
    target: &FieldTarget,
    message: &ErrorMessage,
    render: bool,
    renderer: &Renderer,
) -> bool {
    if message.is_empty() {
        tracing::debug!(?target, "empty error message; nothing to show");
        return false;
    }

    let container = description_target(doc, target.anchor());
    if render {
        doc.set_custom_validity(target.control(), "");
        match container {
            Some(container) => renderer(doc, container, Some(message)),
            None => tracing::debug!(?target, "rendered error has no description container"),
        }
    } else {
        let text = message.to_plain_text();
        doc.set_custom_validity(target.control(), &text);
        if let Some(container) = container {
            doc.set_text_content(container, &text);
        }
    }

    set_state(doc, target.anchor(), AriaState::Invalid(true));
    true
}

/// Remove any error from `target`
pub(crate) fn clear_error(doc: &mut Document, target: &FieldTarget, renderer: &Renderer) {
    doc.set_custom_validity(target.control(), "");
    set_state(doc, target.anchor(), AriaState::Invalid(false));
    if let Some(container) = description_target(doc, target.anchor()) {
        renderer(doc, container, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::RichContent;

    fn field() -> (Document, FieldTarget, NodeId) {
        let doc = fos_html::parse(r#"
            <input id="name" name="name" aria-describedby="name-error">
            <p id="name-error"></p>"#).unwrap();
        let input = doc.get_element_by_id("name").unwrap();
        let container = doc.get_element_by_id("name-error").unwrap();
        (doc, FieldTarget::Control(input), container)
    }

    #[test]
    fn test_plain_error_sets_validity_and_description() {
        let (mut doc, target, container) = field();
        let shown = show_error(&mut doc, &target, &"Required".into(), false, &default_renderer());
        assert!(shown);
        assert_eq!(doc.custom_validity(target.control()), "Required");
        assert_eq!(doc.text_content(container), "Required");
        assert_eq!(doc.get_attribute(target.anchor(), "aria-invalid"), Some("true"));
    }

    #[test]
    fn test_plain_error_text_is_not_markup() {
        let (mut doc, target, container) = field();
        show_error(&mut doc, &target, &"<b>x</b>".into(), false, &default_renderer());
        assert_eq!(fos_html::inner_html(&doc, container), "&lt;b&gt;x&lt;/b&gt;");
    }

    #[test]
    fn test_rendered_error_bypasses_native_message() {
        let (mut doc, target, container) = field();
        show_error(&mut doc, &target, &"<strong>Required</strong>".into(), true, &default_renderer());
        assert_eq!(doc.custom_validity(target.control()), "");
        assert_eq!(fos_html::inner_html(&doc, container), "<strong>Required</strong>");
    }

    #[test]
    fn test_rich_segments() {
        let (mut doc, target, container) = field();
        let message = ErrorMessage::from(RichContent::new().text("<raw>").markup("<em>ok</em>"));
        show_error(&mut doc, &target, &message, true, &default_renderer());
        assert_eq!(fos_html::inner_html(&doc, container), "&lt;raw&gt;<em>ok</em>");
    }

    #[test]
    fn test_empty_message_is_noop() {
        let (mut doc, target, _) = field();
        assert!(!show_error(&mut doc, &target, &"".into(), false, &default_renderer()));
        assert_eq!(doc.get_attribute(target.anchor(), "aria-invalid"), None);
    }

    #[test]
    fn test_clear_error() {
        let (mut doc, target, container) = field();
        show_error(&mut doc, &target, &"Required".into(), false, &default_renderer());
        clear_error(&mut doc, &target, &default_renderer());
        assert_eq!(doc.custom_validity(target.control()), "");
        assert_eq!(doc.text_content(container), "");
        assert_eq!(doc.get_attribute(target.anchor(), "aria-invalid"), Some("false"));
    }
}
