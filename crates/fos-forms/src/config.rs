//! Error configuration
//!
//! What callers hand to `configure`: a message per constraint and an
//! optional custom validator. Descriptors are normalised into [`Rule`]s once,
//! when the configuration is stored.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::constraint::Constraint;
use crate::field::FieldView;
use crate::message::ErrorMessage;

/// Message computed from a field
pub type MessageFn = Rc<dyn Fn(&FieldView) -> ErrorMessage>;

/// Custom validation function
pub type ValidateFn = Rc<dyn Fn(&FieldView) -> Verdict>;

/// Rich-capable message of a renderable descriptor
#[derive(Clone)]
pub enum RenderableMessage {
    Static(ErrorMessage),
    Dynamic(MessageFn),
}

/// Error configured for one constraint
#[derive(Clone)]
pub enum ErrorDescriptor {
    Static(String),
    Dynamic(Rc<dyn Fn(&FieldView) -> String>),
    Renderable { message: RenderableMessage, render: bool },
}

impl ErrorDescriptor {
    pub fn dynamic(f: impl Fn(&FieldView) -> String + 'static) -> Self {
        Self::Dynamic(Rc::new(f))
    }

    /// Message painted by the renderer
    pub fn rendered(message: impl Into<ErrorMessage>) -> Self {
        Self::Renderable { message: RenderableMessage::Static(message.into()), render: true }
    }

    pub fn rendered_with(f: impl Fn(&FieldView) -> ErrorMessage + 'static) -> Self {
        Self::Renderable { message: RenderableMessage::Dynamic(Rc::new(f)), render: true }
    }

    fn normalize(self) -> Rule {
        match self {
            Self::Static(text) => Rule {
                source: MessageSource::Static(ErrorMessage::Plain(text)),
                render: false,
            },
            Self::Dynamic(f) => Rule {
                source: MessageSource::Dynamic(Rc::new(move |field: &FieldView| ErrorMessage::Plain(f(field)))),
                render: false,
            },
            Self::Renderable { message: RenderableMessage::Static(message), render } => Rule {
                source: MessageSource::Static(message),
                render,
            },
            Self::Renderable { message: RenderableMessage::Dynamic(f), render } => Rule {
                source: MessageSource::Dynamic(f),
                render,
            },
        }
    }
}

impl From<&str> for ErrorDescriptor {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for ErrorDescriptor {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl fmt::Debug for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
            Self::Renderable { render, .. } => {
                f.debug_struct("Renderable").field("render", render).finish_non_exhaustive()
            }
        }
    }
}

/// A failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: ErrorMessage,
    /// Paint through the renderer instead of native validity
    pub render: bool,
}

impl Failure {
    pub fn plain(message: impl Into<String>) -> Self {
        Self { message: ErrorMessage::Plain(message.into()), render: false }
    }

    pub fn rendered(message: impl Into<ErrorMessage>) -> Self {
        Self { message: message.into(), render: true }
    }
}

/// Reason an asynchronous validator gave up
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Rejection(pub String);

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Result of a custom validator
pub enum Verdict {
    Valid,
    /// An empty message counts as valid
    Invalid(Failure),
    /// Settles to `Ok(None)` when valid
    Pending(LocalBoxFuture<'static, Result<Option<Failure>, Rejection>>),
}

impl Verdict {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(Failure::plain(message))
    }

    pub fn pending(
        future: impl Future<Output = Result<Option<Failure>, Rejection>> + 'static,
    ) -> Self {
        Self::Pending(Box::pin(future))
    }
}

impl From<Option<String>> for Verdict {
    fn from(message: Option<String>) -> Self {
        match message {
            Some(message) => Self::invalid(message),
            None => Self::Valid,
        }
    }
}

impl fmt::Debug for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("Valid"),
            Self::Invalid(failure) => f.debug_tuple("Invalid").field(failure).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Errors for one field, as passed to `configure`
#[derive(Clone, Default)]
pub struct ErrorConfig {
    rules: Vec<(Constraint, ErrorDescriptor)>,
    validate: Option<ValidateFn>,
}

impl ErrorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message for `constraint`; a later call for the same constraint wins
    pub fn on(mut self, constraint: Constraint, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.rules.push((constraint, descriptor.into()));
        self
    }

    pub fn required(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::Required, descriptor)
    }

    pub fn min_length(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::MinLength, descriptor)
    }

    pub fn max_length(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::MaxLength, descriptor)
    }

    pub fn min(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::Min, descriptor)
    }

    pub fn max(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::Max, descriptor)
    }

    pub fn step(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::Step, descriptor)
    }

    pub fn type_mismatch(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::Type, descriptor)
    }

    pub fn pattern(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::Pattern, descriptor)
    }

    pub fn bad_input(self, descriptor: impl Into<ErrorDescriptor>) -> Self {
        self.on(Constraint::BadInput, descriptor)
    }

    /// Custom check, run only once every native constraint passes
    pub fn validate(mut self, f: impl Fn(&FieldView) -> Verdict + 'static) -> Self {
        self.validate = Some(Rc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.validate.is_none()
    }

    pub fn has_validate(&self) -> bool {
        self.validate.is_some()
    }

    pub(crate) fn normalize(self) -> FieldEntry {
        FieldEntry {
            rules: self.rules.into_iter()
                .map(|(constraint, descriptor)| (constraint, descriptor.normalize()))
                .collect(),
            validate: self.validate,
        }
    }
}

impl fmt::Debug for ErrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorConfig")
            .field("rules", &self.rules)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// Where a rule's message comes from
#[derive(Clone)]
pub(crate) enum MessageSource {
    Static(ErrorMessage),
    Dynamic(MessageFn),
}

/// Normalised descriptor
#[derive(Clone)]
pub(crate) struct Rule {
    pub source: MessageSource,
    pub render: bool,
}

impl Rule {
    pub fn failure(&self, field: &FieldView) -> Failure {
        let message = match &self.source {
            MessageSource::Static(message) => message.clone(),
            MessageSource::Dynamic(f) => f(field),
        };
        Failure { message, render: self.render }
    }
}

/// Stored configuration of one field
#[derive(Clone, Default)]
pub(crate) struct FieldEntry {
    pub rules: BTreeMap<Constraint, Rule>,
    pub validate: Option<ValidateFn>,
}

impl FieldEntry {
    pub fn rule(&self, constraint: Constraint) -> Option<&Rule> {
        self.rules.get(&constraint)
    }
}
