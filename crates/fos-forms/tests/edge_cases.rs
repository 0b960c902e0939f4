//! Edge case tests for fos-forms
//!
//! Silent no-ops, lifecycle misuse and overlapping validations.

use std::rc::Rc;
use std::time::Duration;

use fos_dom::{FormEvent, ListenerOptions, NodeId, SharedDocument};
use fos_forms::{
    ErrorConfig, Failure, FieldPhase, FormError, FormValidityObserver, RichContent,
    ValidateOptions, ValidatorOptions, Verdict,
};
use smol::Timer;

fn setup(html: &str, options: ValidatorOptions) -> (SharedDocument, FormValidityObserver, NodeId) {
    let doc = fos_html::parse(html).unwrap().into_shared();
    let form = doc.borrow().get_element_by_id("f").unwrap();
    let observer = FormValidityObserver::new(Rc::clone(&doc), options);
    observer.observe(form).unwrap();
    (doc, observer, form)
}

fn node(doc: &SharedDocument, id: &str) -> NodeId {
    doc.borrow().get_element_by_id(id).unwrap()
}

// ============================================================================
// SILENT NO-OPS
// ============================================================================

#[test]
fn test_bare_radio_is_ignored() {
    let (doc, observer, _) = setup(
        r#"<form id="f"><input type="radio" id="r" name="loose" required></form>"#,
        ValidatorOptions::default(),
    );
    let radio = node(&doc, "r");

    assert_eq!(observer.validate_field("loose", ValidateOptions::default()).unwrap().ready(), Some(false));
    observer.set_field_error("loose", "x", false).unwrap();
    observer.clear_field_error("loose").unwrap();

    assert_eq!(doc.borrow().get_attribute(radio, "aria-invalid"), None);
    assert_eq!(doc.borrow().custom_validity(radio), "");
}

#[test]
fn test_bare_radio_does_not_fail_whole_form() {
    let (_, observer, _) = setup(
        r#"<form id="f"><input type="radio" name="loose" required><input name="a"></form>"#,
        ValidatorOptions::default(),
    );
    let validation = observer.validate_fields(None, ValidateOptions::default()).unwrap();
    assert_eq!(validation.ready(), Some(true));
}

#[test]
fn test_fields_of_other_forms_are_ignored() {
    let (doc, observer, _) = setup(
        r#"<form id="f"></form><form id="g"><input id="a" name="a" required></form>"#,
        ValidatorOptions::new().on(["focusout"]),
    );
    let input = node(&doc, "a");

    assert_eq!(observer.validate_field("a", ValidateOptions::default()).unwrap().ready(), Some(false));
    assert!(observer.handle_event(&FormEvent::focusout(input)).is_none());
    assert_eq!(doc.borrow().get_attribute(input, "aria-invalid"), None);
}

#[test]
fn test_unnamed_field_events_are_ignored() {
    let (doc, observer, _) = setup(
        r#"<form id="f"><input id="a" required></form>"#,
        ValidatorOptions::new().on(["focusout"]),
    );
    let input = node(&doc, "a");
    assert!(observer.handle_event(&FormEvent::focusout(input)).is_none());
}

#[test]
fn test_form_attribute_associates_outside_controls() {
    let (doc, observer, _) = setup(
        r#"<form id="f"></form><input id="a" name="a" form="f" required>"#,
        ValidatorOptions::default(),
    );
    assert_eq!(observer.validate_field("a", ValidateOptions::default()).unwrap().ready(), Some(false));
    let input = node(&doc, "a");
    assert_eq!(doc.borrow().get_attribute(input, "aria-invalid"), Some("true"));
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_calls_after_disconnect_fail_fast() {
    let (_, observer, _) = setup(r#"<form id="f"><input name="a"></form>"#, ValidatorOptions::default());
    observer.disconnect();
    assert!(matches!(
        observer.validate_field("a", ValidateOptions::default()),
        Err(FormError::NotObserving)
    ));
    assert_eq!(observer.form(), None);
}

#[test]
fn test_rich_set_error_without_render_is_rejected() {
    let (_, observer, _) = setup(r#"<form id="f"><input name="a"></form>"#, ValidatorOptions::default());
    let err = observer
        .set_field_error("a", RichContent::new().text("x"), false)
        .unwrap_err();
    assert_eq!(err.to_string(), "Rich error messages can only be shown with render enabled");
}

#[test]
fn test_once_listener_fires_once() {
    let options = ValidatorOptions::new()
        .on(["focusout"])
        .listener(ListenerOptions { once: true, ..Default::default() });
    let (doc, observer, form) = setup(r#"<form id="f"><input id="a" name="a" required></form>"#, options);
    let input = node(&doc, "a");

    assert!(observer.handle_event(&FormEvent::focusout(input)).is_some());
    assert!(observer.handle_event(&FormEvent::focusout(input)).is_none());

    observer.unobserve(form).unwrap();
    observer.observe(form).unwrap();
    assert!(observer.handle_event(&FormEvent::focusout(input)).is_some());
}

#[test]
fn test_result_dropped_after_unobserve() {
    let (doc, observer, form) = setup(
        r#"<form id="f"><input id="a" name="a"></form>"#,
        ValidatorOptions::default(),
    );
    observer.configure("a", ErrorConfig::new().validate(|_| {
        Verdict::pending(async {
            Timer::after(Duration::from_millis(10)).await;
            Ok(Some(Failure::plain("Late")))
        })
    }));

    let validation = observer.validate_field("a", ValidateOptions::default()).unwrap();
    observer.unobserve(form).unwrap();
    assert!(!smol::block_on(validation.settle()));

    let input = node(&doc, "a");
    assert_eq!(doc.borrow().custom_validity(input), "");
    assert_eq!(doc.borrow().get_attribute(input, "aria-invalid"), None);
}

#[test]
fn test_result_dropped_after_reobserve() {
    let (doc, observer, form) = setup(
        r#"<form id="f"><input id="a" name="a"></form>"#,
        ValidatorOptions::default(),
    );
    observer.configure("a", ErrorConfig::new().validate(|_| {
        Verdict::pending(async {
            Timer::after(Duration::from_millis(10)).await;
            Ok(Some(Failure::plain("Stale")))
        })
    }));

    let validation = observer.validate_field("a", ValidateOptions::default()).unwrap();
    observer.unobserve(form).unwrap();
    observer.observe(form).unwrap();
    assert!(!smol::block_on(validation.settle()));

    let input = node(&doc, "a");
    assert_eq!(doc.borrow().custom_validity(input), "");
    assert_eq!(doc.borrow().get_attribute(input, "aria-invalid"), None);
    assert_eq!(doc.borrow().get_attribute(input, "aria-busy"), None);
    assert_eq!(observer.field_phase("a"), FieldPhase::Idle);
}

// ============================================================================
// ABANDONED VALIDATIONS
// ============================================================================

#[test]
fn test_ignored_event_validation_leaves_field_idle() {
    let (doc, observer, _) = setup(
        r#"<form id="f"><input id="b" name="b"></form>"#,
        ValidatorOptions::new().on(["focusout"]),
    );
    observer.configure("b", ErrorConfig::new().validate(|_| Verdict::pending(async { Ok(None) })));
    let input = node(&doc, "b");

    let _ = observer.handle_event(&FormEvent::focusout(input));
    assert_eq!(doc.borrow().get_attribute(input, "aria-busy"), None);
    assert_eq!(observer.field_phase("b"), FieldPhase::Idle);

    let validation = observer.validate_field("b", ValidateOptions::default()).unwrap();
    assert!(smol::block_on(validation.settle()));
    assert_eq!(doc.borrow().get_attribute(input, "aria-busy"), None);
    assert_eq!(doc.borrow().get_attribute(input, "aria-invalid"), Some("false"));
    assert_eq!(observer.field_phase("b"), FieldPhase::Idle);
}

// ============================================================================
// OVERLAPPING VALIDATIONS
// ============================================================================

#[test]
fn test_overlapping_validations_last_write_wins() {
    let (doc, observer, _) = setup(
        r#"<form id="f"><input id="a" name="a"></form>"#,
        ValidatorOptions::default(),
    );
    observer.configure("a", ErrorConfig::new().validate(|field| {
        let slow = field.value == "slow";
        Verdict::pending(async move {
            let delay = if slow { 40 } else { 5 };
            Timer::after(Duration::from_millis(delay)).await;
            Ok(slow.then(|| Failure::plain("Slow check failed")))
        })
    }));
    let input = node(&doc, "a");

    doc.borrow_mut().set_value(input, "slow");
    let first = observer.validate_field("a", ValidateOptions::default()).unwrap();
    doc.borrow_mut().set_value(input, "fast");
    let second = observer.validate_field("a", ValidateOptions::default()).unwrap();

    let (first, second) = smol::block_on(futures::future::join(first.settle(), second.settle()));
    assert!(!first);
    assert!(second);

    // The slower, older check applied last
    assert_eq!(doc.borrow().custom_validity(input), "Slow check failed");
    assert_eq!(doc.borrow().get_attribute(input, "aria-invalid"), Some("true"));
    assert_eq!(doc.borrow().get_attribute(input, "aria-busy"), None);
}
