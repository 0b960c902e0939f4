//! Form Validity Observer
//!
//! Observes one form, validates its fields on interaction events or on
//! demand, and keeps native validity, `aria-invalid` and accessible
//! descriptions in step.
//!
//! A field validation cycle moves through [`FieldPhase`]s:
//! `Idle -> Resolving -> (AwaitingAsync) -> Applying -> Idle`. Native
//! constraints always resolve synchronously; only a custom validator can
//! suspend the cycle. Overlapping cycles of the same field are not
//! cancelled: the last one to apply wins.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use fos_a11y::{AriaState, set_state};
use fos_dom::{Document, FormEvent, FormObserver, NodeId, SharedDocument};
use futures::FutureExt;
use futures::future::join_all;

use crate::FormError;
use crate::config::{ErrorConfig, FieldEntry};
use crate::field::{self, FieldView};
use crate::message::ErrorMessage;
use crate::options::{ValidateOptions, ValidatorOptions};
use crate::outcome::{Validation, ValidationOutcome};
use crate::radio::{self, FieldTarget};
use crate::render::{self, Renderer, Scroller};
use crate::resolver::{self, Resolution};
use crate::store::ErrorStore;

/// Where a field is in its validation cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPhase {
    #[default]
    Idle,
    Resolving,
    AwaitingAsync,
    Applying,
}

#[derive(Debug, Default)]
struct FieldState {
    phase: FieldPhase,
    /// Async validations not yet settled
    pending: usize,
}

/// Validates the fields of a single observed form.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct FormValidityObserver {
    inner: Rc<Inner>,
}

struct Inner {
    /// `None` for a server-side observer
    document: Option<SharedDocument>,
    listeners: RefCell<FormObserver>,
    validate_on: Vec<String>,
    revalidate_on: Option<String>,
    renderer: Renderer,
    scroller: Option<Scroller>,
    defaults: Rc<FieldEntry>,
    store: RefCell<ErrorStore>,
    form: Cell<Option<NodeId>>,
    /// Bumped on every detach; results of older cycles are discarded
    generation: Cell<u64>,
    fields: RefCell<HashMap<String, FieldState>>,
}

/// Bookkeeping of one in-flight async check.
///
/// Owned by the pending future, so `aria-busy` and the pending count are
/// released even if the future is dropped before it settles.
struct PendingCheck {
    inner: Rc<Inner>,
    form: NodeId,
    name: String,
    generation: u64,
}

impl Drop for PendingCheck {
    fn drop(&mut self) {
        self.inner.end_async(self.form, &self.name, self.generation);
    }
}

impl FormValidityObserver {
    pub fn new(document: SharedDocument, options: ValidatorOptions) -> Self {
        Self::build(Some(document), options)
    }

    /// An observer without a document.
    ///
    /// `configure` is a no-op and `observe` fails, so shared setup code can
    /// run where no document exists.
    pub fn server(options: ValidatorOptions) -> Self {
        Self::build(None, options)
    }

    fn build(document: Option<SharedDocument>, options: ValidatorOptions) -> Self {
        let ValidatorOptions { types, listener, revalidate_on, renderer, scroller, default_errors } = options;

        if default_errors.has_validate() {
            tracing::warn!("default_errors carries a validate function; it is ignored");
        }
        let mut defaults = default_errors.normalize();
        defaults.validate = None;

        let listened = types.iter().cloned().chain(revalidate_on.clone());
        Self {
            inner: Rc::new(Inner {
                document,
                listeners: RefCell::new(FormObserver::new(listened, listener)),
                validate_on: types,
                revalidate_on,
                renderer: renderer.unwrap_or_else(render::default_renderer),
                scroller,
                defaults: Rc::new(defaults),
                store: RefCell::new(ErrorStore::default()),
                form: Cell::new(None),
                generation: Cell::new(0),
                fields: RefCell::new(HashMap::new()),
            }),
        }
    }

    // ---- observation lifecycle -----------------------------------------

    /// Start observing `form`.
    ///
    /// Returns `Ok(false)` if `form` is already observed; fails if another
    /// form is.
    pub fn observe(&self, form: NodeId) -> Result<bool, FormError> {
        let document = self.inner.document.as_ref().ok_or(FormError::NoDocument)?;
        if !document.borrow().is_element(form, "form") {
            return Err(FormError::NotAForm(form));
        }
        match self.inner.form.get() {
            Some(current) if current == form => return Ok(false),
            Some(current) => return Err(FormError::AlreadyObserving { current }),
            None => {}
        }

        self.inner.listeners.borrow_mut().observe(form);
        self.inner.form.set(Some(form));
        tracing::info!(?form, "observing form");
        Ok(true)
    }

    /// Stop observing `form` and drop all field configuration.
    ///
    /// Returns `Ok(false)` if `form` was not the observed form.
    pub fn unobserve(&self, form: NodeId) -> Result<bool, FormError> {
        if self.inner.document.is_none() {
            return Err(FormError::NoDocument);
        }
        if self.inner.form.get() != Some(form) {
            return Ok(false);
        }

        self.inner.listeners.borrow_mut().unobserve(form);
        self.detach();
        tracing::info!(?form, "stopped observing form");
        Ok(true)
    }

    /// Stop observing and drop all field configuration
    pub fn disconnect(&self) {
        self.inner.listeners.borrow_mut().disconnect();
        if self.inner.form.get().is_some() {
            tracing::info!("observer disconnected");
        }
        self.detach();
    }

    fn detach(&self) {
        self.inner.form.set(None);
        self.inner.generation.set(self.inner.generation.get() + 1);
        self.inner.store.borrow_mut().clear();
        self.inner.fields.borrow_mut().clear();
    }

    /// The observed form
    pub fn form(&self) -> Option<NodeId> {
        self.inner.form.get()
    }

    fn observed_form(&self) -> Result<NodeId, FormError> {
        self.inner.form.get().ok_or(FormError::NotObserving)
    }

    /// Current phase of `name`'s validation cycle
    pub fn field_phase(&self, name: &str) -> FieldPhase {
        self.inner.fields.borrow().get(name).map_or(FieldPhase::Idle, |state| state.phase)
    }

    // ---- configuration ---------------------------------------------------

    /// Replace the error configuration of `name`
    pub fn configure(&self, name: &str, config: ErrorConfig) {
        if self.inner.document.is_none() {
            return;
        }
        self.inner.store.borrow_mut().configure(name, config);
    }

    // ---- error display -------------------------------------------------

    /// Show `message` on `name`, painted by the renderer when `render` is set
    pub fn set_field_error(
        &self,
        name: &str,
        message: impl Into<ErrorMessage>,
        render: bool,
    ) -> Result<(), FormError> {
        let message = message.into();
        let form = self.observed_form()?;
        if message.is_rich() && !render {
            return Err(FormError::RichMessageNotRendered);
        }
        self.inner.show(form, name, &message, render);
        Ok(())
    }

    /// Like [`set_field_error`](Self::set_field_error) with a message computed from the field
    pub fn set_field_error_with(
        &self,
        name: &str,
        message: impl FnOnce(&FieldView) -> ErrorMessage,
        render: bool,
    ) -> Result<(), FormError> {
        let form = self.observed_form()?;
        let Some(view) = self.inner.capture(form, name) else {
            return Ok(());
        };
        let message = message(&view);
        if message.is_rich() && !render {
            return Err(FormError::RichMessageNotRendered);
        }
        self.inner.show(form, name, &message, render);
        Ok(())
    }

    /// Remove any error shown on `name`
    pub fn clear_field_error(&self, name: &str) -> Result<(), FormError> {
        let form = self.observed_form()?;
        let Some(document) = &self.inner.document else {
            return Ok(());
        };
        let mut doc = document.borrow_mut();
        if let Some(target) = radio::resolve_target(&doc, form, name) {
            render::clear_error(&mut doc, &target, &self.inner.renderer);
        }
        Ok(())
    }

    // ---- validation ----------------------------------------------------

    /// Validate one field (or radio group)
    pub fn validate_field(&self, name: &str, options: ValidateOptions) -> Result<Validation, FormError> {
        let form = self.observed_form()?;
        Ok(Inner::validate(&self.inner, form, name, options.focus))
    }

    /// Validate `names`, or every field of the form.
    ///
    /// All fields are dispatched before any is awaited, and the result is
    /// only known once every field has settled.
    pub fn validate_fields(
        &self,
        names: Option<&[&str]>,
        options: ValidateOptions,
    ) -> Result<Validation, FormError> {
        let form = self.observed_form()?;
        let generation = self.inner.generation.get();
        let names = match names {
            Some(names) => {
                let mut seen = HashSet::new();
                names.iter()
                    .filter(|name| !name.is_empty() && seen.insert(**name))
                    .map(|name| name.to_string())
                    .collect()
            }
            None => self.inner.default_targets(form),
        };

        let runs: Vec<(String, Validation)> = names.into_iter()
            .map(|name| {
                let validation = Inner::validate(&self.inner, form, &name, false);
                (name, validation)
            })
            .collect();

        if runs.iter().all(|(_, validation)| !validation.is_pending()) {
            let results = runs.into_iter()
                .map(|(name, validation)| (name, validation.ready().unwrap_or(false)))
                .collect();
            return Ok(Validation::Ready(self.inner.aggregate(form, generation, results, options.focus)));
        }

        let inner = Rc::clone(&self.inner);
        let focus = options.focus;
        Ok(Validation::Pending(async move {
            let results = join_all(runs.into_iter().map(|(name, validation)| async move {
                let valid = validation.settle().await;
                (name, valid)
            }))
            .await;
            inner.aggregate(form, generation, results, focus)
        }
        .boxed_local()))
    }

    /// Route an interaction event.
    ///
    /// Returns the validation it started, if the event reached an armed
    /// listener and its target is a named field.
    pub fn handle_event(&self, event: &FormEvent) -> Option<Validation> {
        let document = self.inner.document.as_ref()?;
        let (form, name) = {
            let doc = document.borrow();
            let form = self.inner.listeners.borrow_mut().dispatch(&doc, event)?;
            let name = doc.field_name(event.target)?.to_string();

            if !self.inner.validate_on.contains(&event.event_type) {
                // Only the revalidation listener fired
                let target = radio::resolve_target(&doc, form, &name)?;
                if !fos_a11y::is_invalid(&doc, target.anchor()) {
                    return None;
                }
            }
            (form, name)
        };

        tracing::trace!(event = %event.event_type, field = %name, "validating on event");
        Some(Inner::validate(&self.inner, form, &name, false))
    }

    pub fn revalidate_on(&self) -> Option<&str> {
        self.inner.revalidate_on.as_deref()
    }
}

impl Inner {
    /// One field's validation cycle
    fn validate(this: &Rc<Self>, form: NodeId, name: &str, focus: bool) -> Validation {
        let Some(document) = &this.document else {
            return Validation::Ready(false);
        };
        let generation = this.generation.get();

        let view = {
            let mut doc = document.borrow_mut();
            let Some(target) = radio::resolve_target(&doc, form, name) else {
                return Validation::Ready(false);
            };
            // A stale custom message would mask the native one
            doc.set_custom_validity(target.control(), "");
            FieldView::capture(&doc, target.control(), name)
        };
        this.enter(name, FieldPhase::Resolving);

        let entry = this.store.borrow().get(name);
        match resolver::resolve(&view, entry.as_deref(), &this.defaults) {
            Resolution::Settled(outcome) => {
                Validation::Ready(this.apply(form, generation, name, &outcome, focus))
            }
            Resolution::Pending(future) => {
                this.begin_async(form, name);
                let check = PendingCheck {
                    inner: Rc::clone(this),
                    form,
                    name: name.to_string(),
                    generation,
                };
                Validation::Pending(async move {
                    let outcome = future.await;
                    let inner = Rc::clone(&check.inner);
                    let name = check.name.clone();
                    drop(check);
                    inner.apply(form, generation, &name, &outcome, focus)
                }
                .boxed_local())
            }
        }
    }

    fn enter(&self, name: &str, phase: FieldPhase) {
        let mut fields = self.fields.borrow_mut();
        let state = fields.entry(name.to_string()).or_default();
        if phase == FieldPhase::Resolving && state.pending > 0 {
            tracing::debug!(field = name, pending = state.pending,
                "field revalidated while an async check is in flight; last result wins");
        }
        state.phase = phase;
        tracing::debug!(field = name, ?phase, "field phase");
    }

    fn begin_async(&self, form: NodeId, name: &str) {
        {
            let mut fields = self.fields.borrow_mut();
            let state = fields.entry(name.to_string()).or_default();
            state.pending += 1;
            state.phase = FieldPhase::AwaitingAsync;
        }
        tracing::debug!(field = name, phase = ?FieldPhase::AwaitingAsync, "field phase");
        self.with_target(form, name, |doc, target| {
            set_state(doc, target.anchor(), AriaState::Busy(true));
        });
    }

    fn end_async(&self, form: NodeId, name: &str, generation: u64) {
        let settled = {
            let mut fields = self.fields.borrow_mut();
            if self.generation.get() == generation {
                let state = fields.entry(name.to_string()).or_default();
                state.pending = state.pending.saturating_sub(1);
                if state.pending == 0 && state.phase == FieldPhase::AwaitingAsync {
                    state.phase = FieldPhase::Idle;
                }
                state.pending == 0
            } else {
                // Counted before a detach; only checks started since matter
                fields.get(name).is_none_or(|state| state.pending == 0)
            }
        };
        if settled {
            self.with_target(form, name, |doc, target| {
                doc.remove_attribute(target.anchor(), AriaState::BUSY);
            });
        }
    }

    fn with_target(&self, form: NodeId, name: &str, f: impl FnOnce(&mut Document, &FieldTarget)) {
        let Some(document) = &self.document else {
            return;
        };
        let Ok(mut doc) = document.try_borrow_mut() else {
            tracing::warn!(field = name, "document already borrowed; aria-busy not updated");
            return;
        };
        if let Some(target) = radio::resolve_target(&doc, form, name) {
            f(&mut doc, &target);
        }
    }

    /// Push an outcome to the document. Returns whether the field is valid.
    fn apply(&self, form: NodeId, generation: u64, name: &str, outcome: &ValidationOutcome, focus: bool) -> bool {
        let valid = outcome.is_valid();
        if self.generation.get() != generation || self.form.get() != Some(form) {
            tracing::debug!(field = name, "form no longer observed; result not shown");
            return valid;
        }
        let Some(document) = &self.document else {
            return valid;
        };

        {
            let mut fields = self.fields.borrow_mut();
            let state = fields.entry(name.to_string()).or_default();
            state.phase = FieldPhase::Applying;
        }
        tracing::debug!(field = name, phase = ?FieldPhase::Applying, valid, "field phase");

        let mut doc = document.borrow_mut();
        let Some(target) = radio::resolve_target(&doc, form, name) else {
            drop(doc);
            self.settle_phase(name);
            return false;
        };

        match outcome {
            ValidationOutcome::Valid => render::clear_error(&mut doc, &target, &self.renderer),
            ValidationOutcome::Invalid { message, render } => {
                let render = *render;
                if message.is_rich() && !render {
                    tracing::warn!(field = name, "rich message without render; showing its text");
                }
                render::show_error(&mut doc, &target, message, render, &self.renderer);
                if focus {
                    self.focus(&mut doc, &target);
                }
            }
        }
        drop(doc);
        self.settle_phase(name);
        valid
    }

    fn settle_phase(&self, name: &str) {
        let mut fields = self.fields.borrow_mut();
        if let Some(state) = fields.get_mut(name) {
            state.phase = if state.pending > 0 { FieldPhase::AwaitingAsync } else { FieldPhase::Idle };
        }
    }

    fn show(&self, form: NodeId, name: &str, message: &ErrorMessage, render: bool) {
        let Some(document) = &self.document else {
            return;
        };
        let mut doc = document.borrow_mut();
        if let Some(target) = radio::resolve_target(&doc, form, name) {
            render::show_error(&mut doc, &target, message, render, &self.renderer);
        }
    }

    fn capture(&self, form: NodeId, name: &str) -> Option<FieldView> {
        let doc = self.document.as_ref()?.borrow();
        let target = radio::resolve_target(&doc, form, name)?;
        Some(FieldView::capture(&doc, target.control(), name))
    }

    /// Focus a failing field and bring it into view
    fn focus(&self, doc: &mut Document, target: &FieldTarget) {
        match (target, &self.scroller) {
            (FieldTarget::RadioGroup(group), scroller) => {
                doc.focus(group.first_radio);
                match scroller {
                    Some(scroller) => scroller(doc, group.fieldset),
                    None => doc.scroll_into_view(group.fieldset),
                }
            }
            (FieldTarget::Control(node), Some(scroller)) => {
                doc.focus(*node);
                scroller(doc, *node);
            }
            (FieldTarget::Control(node), None) => {
                if doc.custom_validity(*node).is_empty() {
                    // Rendered error: no native bubble to show
                    doc.focus(*node);
                    doc.scroll_into_view(*node);
                } else {
                    doc.report_validity(*node);
                }
            }
        }
    }

    /// Every uniquely named field, radio groups outside a radiogroup excluded
    fn default_targets(&self, form: NodeId) -> Vec<String> {
        let Some(document) = &self.document else {
            return Vec::new();
        };
        let doc = document.borrow();
        field::field_names(&doc, form)
            .into_iter()
            .filter(|name| radio::resolve_target(&doc, form, name).is_some())
            .collect()
    }

    /// Combine settled results and focus the first failure in tree order
    fn aggregate(&self, form: NodeId, generation: u64, results: Vec<(String, bool)>, focus: bool) -> bool {
        let failed: Vec<&str> = results.iter()
            .filter(|(_, valid)| !valid)
            .map(|(name, _)| name.as_str())
            .collect();
        if failed.is_empty() {
            return true;
        }
        tracing::debug!(?failed, "form validation failed");

        if focus && self.generation.get() == generation && self.form.get() == Some(form) {
            if let Some(document) = &self.document {
                let mut doc = document.borrow_mut();
                let order: HashMap<NodeId, usize> = doc.tree_order()
                    .into_iter()
                    .enumerate()
                    .map(|(position, node)| (node, position))
                    .collect();
                let first = failed.iter()
                    .filter_map(|name| radio::resolve_target(&doc, form, name))
                    .min_by_key(|target| order.get(&target.anchor()).copied().unwrap_or(usize::MAX));
                if let Some(target) = first {
                    self.focus(&mut doc, &target);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Verdict;

    fn observer(html: &str) -> (SharedDocument, FormValidityObserver, NodeId) {
        let doc = fos_html::parse(html).unwrap().into_shared();
        let form = doc.borrow().get_element_by_id("f").unwrap();
        let observer = FormValidityObserver::new(Rc::clone(&doc), ValidatorOptions::default());
        (doc, observer, form)
    }

    #[test]
    fn test_observe_rules() {
        let (doc, observer, form) = observer(r#"<form id="f"></form><form id="g"></form>"#);
        let other = doc.borrow().get_element_by_id("g").unwrap();

        assert!(observer.observe(form).unwrap());
        assert!(!observer.observe(form).unwrap());
        assert!(matches!(observer.observe(other), Err(FormError::AlreadyObserving { current }) if current == form));

        assert!(!observer.unobserve(other).unwrap());
        assert!(observer.unobserve(form).unwrap());
        assert!(observer.observe(other).unwrap());
    }

    #[test]
    fn test_observe_requires_form_element() {
        let (doc, observer, _) = observer(r#"<form id="f"></form><div id="d"></div>"#);
        let div = doc.borrow().get_element_by_id("d").unwrap();
        assert!(matches!(observer.observe(div), Err(FormError::NotAForm(_))));
    }

    #[test]
    fn test_validation_requires_observed_form() {
        let (_, observer, _) = observer(r#"<form id="f"><input name="a"></form>"#);
        assert!(matches!(observer.validate_field("a", ValidateOptions::default()), Err(FormError::NotObserving)));
        assert!(matches!(observer.validate_fields(None, ValidateOptions::default()), Err(FormError::NotObserving)));
        assert!(matches!(observer.set_field_error("a", "x", false), Err(FormError::NotObserving)));
        assert!(matches!(observer.clear_field_error("a"), Err(FormError::NotObserving)));
    }

    #[test]
    fn test_server_observer() {
        let observer = FormValidityObserver::server(ValidatorOptions::default());
        observer.configure("a", ErrorConfig::new().required("x"));
        assert!(matches!(observer.observe(NodeId::ROOT), Err(FormError::NoDocument)));
        assert!(observer.handle_event(&FormEvent::focusout(NodeId::ROOT)).is_none());
    }

    #[test]
    fn test_unobserve_clears_configuration() {
        let (doc, observer, form) = observer(r#"<form id="f"><input id="a" name="a" required></form>"#);
        observer.observe(form).unwrap();
        observer.configure("a", ErrorConfig::new().required("Custom"));
        observer.disconnect();
        observer.observe(form).unwrap();

        assert_eq!(observer.validate_field("a", ValidateOptions::default()).unwrap().ready(), Some(false));
        let input = doc.borrow().get_element_by_id("a").unwrap();
        assert_eq!(doc.borrow().custom_validity(input), "Please fill out this field.");
    }

    #[test]
    fn test_missing_field_fails_without_side_effects() {
        let (doc, observer, form) = observer(r#"<form id="f"><input id="a" name="a"></form>"#);
        observer.observe(form).unwrap();
        assert_eq!(observer.validate_field("nope", ValidateOptions::default()).unwrap().ready(), Some(false));
        assert_eq!(observer.validate_field("", ValidateOptions::default()).unwrap().ready(), Some(false));
        assert_eq!(observer.field_phase("nope"), FieldPhase::Idle);
        assert!(observer.set_field_error("nope", "x", false).is_ok());
        assert!(observer.clear_field_error("nope").is_ok());
        assert!(observer.inner.fields.borrow().is_empty());

        let doc = doc.borrow();
        let input = doc.get_element_by_id("a").unwrap();
        assert_eq!(doc.get_attribute(input, "aria-invalid"), None);
    }

    #[test]
    fn test_rich_message_requires_render() {
        let (_, observer, form) = observer(r#"<form id="f"><input name="a"></form>"#);
        observer.observe(form).unwrap();
        let rich = crate::RichContent::new().markup("<b>x</b>");
        assert!(matches!(
            observer.set_field_error("a", rich.clone(), false),
            Err(FormError::RichMessageNotRendered)
        ));
        assert!(observer.set_field_error("a", rich, true).is_ok());
    }

    #[test]
    fn test_dropped_pending_validation_releases_field() {
        let (doc, observer, form) = observer(r#"<form id="f"><input id="a" name="a"></form>"#);
        observer.observe(form).unwrap();
        observer.configure("a", ErrorConfig::new().validate(|_| Verdict::pending(async { Ok(None) })));
        let input = doc.borrow().get_element_by_id("a").unwrap();

        let validation = observer.validate_field("a", ValidateOptions::default()).unwrap();
        assert!(validation.is_pending());
        assert_eq!(observer.field_phase("a"), FieldPhase::AwaitingAsync);
        assert_eq!(doc.borrow().get_attribute(input, "aria-busy"), Some("true"));

        drop(validation);
        assert_eq!(observer.field_phase("a"), FieldPhase::Idle);
        assert_eq!(observer.inner.fields.borrow()["a"].pending, 0);
        assert_eq!(doc.borrow().get_attribute(input, "aria-busy"), None);
    }
}
