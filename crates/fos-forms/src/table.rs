//! Message tables
//!
//! Static error messages loaded from JSON:
//!
//! ```json
//! {
//!   "*":     { "required": "This field is required." },
//!   "email": { "type": "Enter an address like name@example.com." }
//! }
//! ```
//!
//! The `*` entry holds default messages for every field.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::FormError;
use crate::config::ErrorConfig;
use crate::constraint::Constraint;
use crate::validator::FormValidityObserver;

/// Key of the default messages
pub const DEFAULTS_KEY: &str = "*";

/// Field name to constraint to message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTable {
    fields: BTreeMap<String, HashMap<Constraint, String>>,
}

impl MessageTable {
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, field: &str, constraint: Constraint, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().insert(constraint, message.into());
    }

    /// Configured field names, without the defaults key
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str).filter(|name| *name != DEFAULTS_KEY)
    }

    /// Messages for `field` as an error configuration
    pub fn config_for(&self, field: &str) -> ErrorConfig {
        let Some(messages) = self.fields.get(field) else {
            return ErrorConfig::new();
        };
        let mut constraints: Vec<_> = messages.iter().collect();
        constraints.sort_by_key(|(constraint, _)| **constraint);
        constraints.into_iter()
            .fold(ErrorConfig::new(), |config, (constraint, message)| config.on(*constraint, message.as_str()))
    }

    /// Default messages (the `*` entry)
    pub fn defaults(&self) -> ErrorConfig {
        self.config_for(DEFAULTS_KEY)
    }

    /// `configure` every field of the table on `observer`
    pub fn apply(&self, observer: &FormValidityObserver) {
        for name in self.field_names() {
            observer.configure(name, self.config_for(name));
        }
    }
}
