//! Usage errors

use fos_dom::NodeId;

/// Caller-contract violations.
///
/// Validation failures are never errors; they resolve to `false`.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Observer is already watching form {current:?}; unobserve it first")]
    AlreadyObserving { current: NodeId },

    #[error("No form is being observed")]
    NotObserving,

    #[error("Node {0:?} is not a <form> element")]
    NotAForm(NodeId),

    #[error("Rich error messages can only be shown with render enabled")]
    RichMessageNotRendered,

    #[error("Observer was created without a document")]
    NoDocument,

    #[error("Invalid message table: {0}")]
    InvalidMessageTable(#[from] serde_json::Error),
}
