//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with live form-control state.
//!
//! Besides the tree itself this crate owns everything a form script would
//! read from the "browser": control values and checkedness, custom validity
//! messages, the native constraint validation oracle, focus, scroll position
//! and the observer primitive that routes interaction events to a form.

mod attributes;
mod node;
mod tree;
mod document;
pub mod events;
pub mod forms;

use std::cell::RefCell;
use std::rc::Rc;

pub use attributes::{Attr, NamedNodeMap};
pub use node::{Node, NodeData, ElementData};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use events::{FormEvent, FormObserver, ListenerOptions};
pub use forms::{InputType, ValidityState};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID points at a node (not the sentinel)
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A document shared between the page and scripts observing it.
///
/// All access happens on one thread; borrows must never be held across an
/// `.await`.
pub type SharedDocument = Rc<RefCell<Document>>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0:?} does not exist")]
    InvalidNode(NodeId),

    #[error("Node {child:?} cannot be inserted into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
