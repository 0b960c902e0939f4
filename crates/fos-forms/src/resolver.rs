//! Constraint resolution
//!
//! Picks the single error to show for a field. Native constraints are
//! checked in priority order; the custom validator runs only when all of
//! them pass.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::config::{FieldEntry, Failure, Rejection, Verdict};
use crate::constraint::Constraint;
use crate::field::FieldView;
use crate::message::ErrorMessage;
use crate::outcome::ValidationOutcome;

/// Shown when an async validator rejects without a reason
const REJECTED_WITHOUT_REASON: &str = "This field could not be validated.";

/// Resolution of a field
pub(crate) enum Resolution {
    Settled(ValidationOutcome),
    Pending(LocalBoxFuture<'static, ValidationOutcome>),
}

/// Resolve `field` against its own entry, falling back to `defaults` per constraint.
///
/// `field` must be captured after the field's custom validity was cleared,
/// so its validity and message are purely native.
pub(crate) fn resolve(field: &FieldView, entry: Option<&FieldEntry>, defaults: &FieldEntry) -> Resolution {
    if let Some(constraint) = Constraint::first_flagged(&field.validity) {
        let rule = entry.and_then(|e| e.rule(constraint)).or_else(|| defaults.rule(constraint));
        let outcome = match rule {
            Some(rule) => invalid(rule.failure(field)),
            None => native(field),
        };
        tracing::trace!(field = %field.name, %constraint, "native constraint broken");
        return Resolution::Settled(outcome);
    }

    if !field.validity.valid() {
        return Resolution::Settled(native(field));
    }

    let Some(validate) = entry.and_then(|e| e.validate.as_ref()) else {
        return Resolution::Settled(ValidationOutcome::Valid);
    };

    match validate(field) {
        Verdict::Valid => Resolution::Settled(ValidationOutcome::Valid),
        Verdict::Invalid(failure) => Resolution::Settled(checked(Some(failure))),
        Verdict::Pending(future) => Resolution::Pending(future.map(settled).boxed_local()),
    }
}

fn settled(result: Result<Option<Failure>, Rejection>) -> ValidationOutcome {
    match result {
        Ok(failure) => checked(failure),
        Err(Rejection(reason)) => {
            tracing::debug!(%reason, "async validator rejected");
            let reason = if reason.is_empty() { REJECTED_WITHOUT_REASON.to_string() } else { reason };
            invalid(Failure::plain(reason))
        }
    }
}

/// Custom validator result; no message means valid
fn checked(failure: Option<Failure>) -> ValidationOutcome {
    match failure {
        Some(failure) if !failure.message.is_empty() => invalid(failure),
        _ => ValidationOutcome::Valid,
    }
}

fn invalid(failure: Failure) -> ValidationOutcome {
    ValidationOutcome::Invalid { message: failure.message, render: failure.render }
}

/// The browser's own message, always plain text
fn native(field: &FieldView) -> ValidationOutcome {
    ValidationOutcome::Invalid {
        message: ErrorMessage::Plain(field.validation_message.clone()),
        render: false,
    }
}
