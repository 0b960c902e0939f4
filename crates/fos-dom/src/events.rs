//! Form Events
//!
//! User-interaction events on form controls, and the observer primitive
//! that decides which of them reach a form's listeners.

use std::collections::HashSet;

use crate::{Document, NodeId};

/// An interaction event dispatched at a form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEvent {
    /// Event type, e.g. `focusout`, `input`, `change`
    pub event_type: String,
    /// Control the event was dispatched at
    pub target: NodeId,
}

impl FormEvent {
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
        }
    }

    pub fn focusout(target: NodeId) -> Self {
        Self::new("focusout", target)
    }

    pub fn input(target: NodeId) -> Self {
        Self::new("input", target)
    }

    pub fn change(target: NodeId) -> Self {
        Self::new("change", target)
    }
}

/// `addEventListener` options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub passive: bool,
    /// Remove the listener after its first invocation
    pub once: bool,
}

/// Observes forms for a set of event types.
///
/// Keeps one listener per (form, event type) and routes matching events to
/// the form that owns their target.
#[derive(Debug, Default)]
pub struct FormObserver {
    types: Vec<String>,
    options: ListenerOptions,
    observed: Vec<NodeId>,
    /// Listeners removed after firing under `once`
    spent: HashSet<(NodeId, String)>,
}

impl FormObserver {
    pub fn new<I, S>(types: I, options: ListenerOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let types: Vec<String> = types.into_iter()
            .map(Into::into)
            .filter(|t: &String| seen.insert(t.clone()))
            .collect();
        Self {
            types,
            options,
            observed: Vec::new(),
            spent: HashSet::new(),
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn options(&self) -> ListenerOptions {
        self.options
    }

    /// Start listening on `form`. Returns `false` if already observed.
    pub fn observe(&mut self, form: NodeId) -> bool {
        if self.observed.contains(&form) {
            return false;
        }
        self.observed.push(form);
        true
    }

    /// Stop listening on `form`. Returns `false` if it was not observed.
    pub fn unobserve(&mut self, form: NodeId) -> bool {
        let before = self.observed.len();
        self.observed.retain(|&id| id != form);
        self.spent.retain(|(id, _)| *id != form);
        self.observed.len() != before
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.spent.clear();
    }

    pub fn is_observing(&self, form: NodeId) -> bool {
        self.observed.contains(&form)
    }

    /// Whether a listener for `event_type` is armed on `form`
    pub fn is_listening(&self, form: NodeId, event_type: &str) -> bool {
        self.is_observing(form)
            && self.types.iter().any(|t| t == event_type)
            && !self.spent.contains(&(form, event_type.to_string()))
    }

    /// Route an event: returns the observed form whose listener fires.
    ///
    /// Under `once` the listener is disarmed after it fires.
    pub fn dispatch(&mut self, doc: &Document, event: &FormEvent) -> Option<NodeId> {
        let form = doc.form_owner(event.target)?;
        if !self.is_listening(form, &event.event_type) {
            return None;
        }
        if self.options.once {
            self.spent.insert((form, event.event_type.clone()));
        }
        Some(form)
    }
}
