//! Markup sanitization
//!
//! Element and attribute filtering applied while inserted markup is
//! converted into the document tree.

use std::collections::{HashMap, HashSet};

/// Sanitizer configuration
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Elements kept as-is
    pub allowed_elements: HashSet<String>,
    /// Elements removed together with their content
    pub drop_elements: HashSet<String>,
    /// Allowed attributes per tag, `*` for every tag
    pub allowed_attributes: HashMap<String, HashSet<String>>,
    /// Attributes always removed
    pub drop_attributes: HashSet<String>,
    pub allow_comments: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<HashSet<_>>();

        let allowed_elements = set(&[
            "a", "abbr", "b", "br", "code", "div", "em", "i", "kbd", "li", "ol", "p", "s",
            "small", "span", "strong", "sub", "sup", "u", "ul",
        ]);
        let drop_elements = set(&[
            "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet",
            "form", "input", "button", "select", "textarea", "base", "meta", "link", "template",
        ]);
        let drop_attributes = set(&["formaction", "xlink:href", "srcdoc"]);

        let mut allowed_attributes = HashMap::new();
        allowed_attributes.insert("*".to_string(), set(&["class", "id", "title", "lang", "dir", "role"]));
        allowed_attributes.insert("a".to_string(), set(&["href", "target", "rel"]));

        Self {
            allowed_elements,
            drop_elements,
            allowed_attributes,
            drop_attributes,
            allow_comments: false,
        }
    }
}

/// What happens to an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Keep,
    /// Discard the tag, keep its children
    Unwrap,
    /// Discard the element and its subtree
    Drop,
}

/// HTML sanitizer
#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn default_safe() -> Self {
        Self::new(SanitizerConfig::default())
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    pub(crate) fn element(&self, tag: &str) -> Verdict {
        let tag = tag.to_ascii_lowercase();
        if self.config.drop_elements.contains(&tag) {
            Verdict::Drop
        } else if self.config.allowed_elements.contains(&tag) {
            Verdict::Keep
        } else {
            Verdict::Unwrap
        }
    }

    /// Whether an attribute survives on `tag`
    pub fn attribute(&self, tag: &str, name: &str, value: &str) -> bool {
        let name = name.to_ascii_lowercase();
        if self.config.drop_attributes.contains(&name) || name.starts_with("on") {
            return false;
        }

        let allowed = [tag, "*"].iter().any(|key| {
            self.config.allowed_attributes.get(*key).is_some_and(|attrs| attrs.contains(&name))
        });
        if !allowed {
            return false;
        }

        if matches!(name.as_str(), "href" | "src") && is_script_url(value) {
            tracing::debug!(tag, attr = %name, "dropped script URL");
            return false;
        }
        true
    }
}

/// `javascript:`, `vbscript:` and HTML `data:` URLs, ignoring whitespace and case
fn is_script_url(value: &str) -> bool {
    let compact: String = value.chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:text/html"].iter().any(|scheme| compact.starts_with(scheme))
}
