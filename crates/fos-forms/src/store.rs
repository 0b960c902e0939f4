//! Per-field error configuration

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::{ErrorConfig, FieldEntry};

/// Field name to configured errors.
///
/// Entries are handed out as `Rc`s so validation never holds a borrow of
/// the store while user code runs.
#[derive(Default)]
pub(crate) struct ErrorStore {
    entries: HashMap<String, Rc<FieldEntry>>,
}

impl ErrorStore {
    /// Replace the entry for `name` wholesale
    pub fn configure(&mut self, name: &str, config: ErrorConfig) {
        if name.is_empty() {
            tracing::trace!("ignoring configuration for an unnamed field");
            return;
        }
        self.entries.insert(name.to_string(), Rc::new(config.normalize()));
    }

    pub fn get(&self, name: &str) -> Option<Rc<FieldEntry>> {
        self.entries.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
