//! Observer configuration

use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, ListenerOptions, NodeId};

use crate::config::ErrorConfig;
use crate::message::ErrorMessage;
use crate::render::{Renderer, Scroller};

/// Construction options of a `FormValidityObserver`
#[derive(Clone, Default)]
pub struct ValidatorOptions {
    /// Event types that validate the event's field; empty for manual validation only
    pub types: Vec<String>,
    /// Options of the installed listeners
    pub listener: ListenerOptions,
    /// Event type that re-validates fields already marked invalid
    pub revalidate_on: Option<String>,
    /// Paints rendered errors; defaults to sanitized markup insertion
    pub renderer: Option<Renderer>,
    /// Brings a failing field into view; defaults to `scrollIntoView`/`reportValidity`
    pub scroller: Option<Scroller>,
    /// Messages for fields without their own entry for a constraint
    pub default_errors: ErrorConfig,
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate on each of `types`
    pub fn on<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn listener(mut self, listener: ListenerOptions) -> Self {
        self.listener = listener;
        self
    }

    pub fn revalidate_on(mut self, event_type: impl Into<String>) -> Self {
        self.revalidate_on = Some(event_type.into());
        self
    }

    pub fn renderer(mut self, f: impl Fn(&mut Document, NodeId, Option<&ErrorMessage>) + 'static) -> Self {
        self.renderer = Some(Rc::new(f));
        self
    }

    pub fn scroller(mut self, f: impl Fn(&mut Document, NodeId) + 'static) -> Self {
        self.scroller = Some(Rc::new(f));
        self
    }

    pub fn default_errors(mut self, errors: ErrorConfig) -> Self {
        self.default_errors = errors;
        self
    }
}

impl fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorOptions")
            .field("types", &self.types)
            .field("listener", &self.listener)
            .field("revalidate_on", &self.revalidate_on)
            .field("renderer", &self.renderer.is_some())
            .field("scroller", &self.scroller.is_some())
            .field("default_errors", &self.default_errors)
            .finish()
    }
}

/// Per-call options of `validate_field` and `validate_fields`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Focus and scroll to the (first) failing field
    pub focus: bool,
}

impl ValidateOptions {
    pub fn focused() -> Self {
        Self { focus: true }
    }
}
