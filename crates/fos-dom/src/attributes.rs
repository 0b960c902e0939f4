//! Element Attributes
//!
//! Attribute storage: get, set, remove, has. HTML attribute names are
//! ASCII case-insensitive, so names are normalised to lowercase on entry.

use std::collections::HashMap;

/// Named node map (attribute collection, insertion ordered)
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            value: value.into(),
        }
    }
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        let index = match self.by_name.get(name) {
            Some(&index) => index,
            None => *self.by_name.get(&name.to_ascii_lowercase())?,
        };
        self.attributes.get(index).map(|a| a.value.as_str())
    }

    /// Set an attribute. Returns `true` if the stored value changed.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let attr = Attr::new(name, value);
        if let Some(&index) = self.by_name.get(&attr.name) {
            let slot = &mut self.attributes[index];
            if slot.value == attr.value {
                return false;
            }
            slot.value = attr.value;
        } else {
            self.by_name.insert(attr.name.clone(), self.attributes.len());
            self.attributes.push(attr);
        }
        true
    }

    /// Remove an attribute by name
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let name = name.to_ascii_lowercase();
        let index = self.by_name.remove(&name)?;
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = NamedNodeMap::new();
        attrs.set("class", "btn");
        attrs.set("ID", "submit");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("btn"));
        assert_eq!(attrs.get("id"), Some("submit"));
        assert_eq!(attrs.get("Id"), Some("submit"));
    }

    #[test]
    fn test_set_reports_change() {
        let mut attrs = NamedNodeMap::new();
        assert!(attrs.set("aria-invalid", "true"));
        assert!(!attrs.set("aria-invalid", "true"));
        assert!(attrs.set("aria-invalid", "false"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attrs = NamedNodeMap::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        attrs.set("c", "3");

        assert!(attrs.remove("a").is_some());
        assert!(!attrs.contains("a"));
        assert_eq!(attrs.get("c"), Some("3"));
        let names: Vec<_> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }
}
