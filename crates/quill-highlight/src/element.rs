//! Rendered root element of a highlighted code block.

use std::fmt::Write;

/// An HTML element produced by the highlighter.
///
/// Only the root `<pre>` of a block is modelled as a node; its children are
/// kept as already-serialized HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name, e.g. `pre`
    pub tag: String,

    /// Attributes in insertion order
    properties: Vec<(String, String)>,

    /// Serialized inner HTML
    pub inner_html: String,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>, inner_html: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            properties: Vec::new(),
            inner_html: inner_html.into(),
        }
    }

    /// Set an attribute, replacing any previous value in place.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((name, value)),
        }
    }

    /// Get an attribute value.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over attributes in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.inner_html.len() + 64);
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.properties {
            // Writing to a String cannot fail
            let _ = write!(out, r#" {}="{}""#, name, escape_attr(value));
        }
        out.push('>');
        out.push_str(&self.inner_html);
        let _ = write!(out, "</{}>", self.tag);
        out
    }
}

/// Escape a string for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_properties_in_order() {
        let mut pre = Element::new("pre", "<code>x</code>");
        pre.set_property("class", "quill-code");
        pre.set_property("tabindex", "0");

        assert_eq!(
            pre.to_html(),
            r#"<pre class="quill-code" tabindex="0"><code>x</code></pre>"#
        );
    }

    #[test]
    fn set_property_replaces_existing() {
        let mut pre = Element::new("pre", "");
        pre.set_property("data-filename", "a.rs");
        pre.set_property("data-filename", "b.rs");

        assert_eq!(pre.property("data-filename"), Some("b.rs"));
        assert_eq!(pre.properties().count(), 1);
    }

    #[test]
    fn escapes_attribute_values() {
        let mut pre = Element::new("pre", "");
        pre.set_property("data-filename", r#"a"b<c>.rs"#);

        assert_eq!(
            pre.to_html(),
            r#"<pre data-filename="a&quot;b&lt;c&gt;.rs"></pre>"#
        );
    }
}
