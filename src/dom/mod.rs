//! Owned element tree.
//!
//! The page tree the renderer and assembler build. Nodes are plain owned
//! values: building the same content twice yields two independent subtrees,
//! and a subtree can only live under one parent.
//!
//! ```ignore
//! let mut card = Element::with_class("div", "metric-card");
//! card.push_elem(Element::with_class("span", "metric-value").text("30%"));
//! assert_eq!(card.to_html(), r#"<div class="metric-card"><span class="metric-value">30%</span></div>"#);
//! ```

use crate::utils::html::{escape, escape_attr, is_raw_text_element, is_void_element};

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An HTML element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for an element with a `class` attribute.
    pub fn with_class(tag: impl Into<String>, class: &str) -> Self {
        Self::new(tag).attr("class", class)
    }

    // ------------------------------------------------------------------------
    // builder style (consuming)
    // ------------------------------------------------------------------------

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.push_elem(child);
        self
    }

    /// Append a child only when present.
    pub fn child_opt(mut self, child: Option<Element>) -> Self {
        if let Some(child) = child {
            self.push_elem(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    // ------------------------------------------------------------------------
    // mutation
    // ------------------------------------------------------------------------

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Append a class name if not already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.get_attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn push_elem(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Remove every child node.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Replace all children with a single element.
    pub fn replace_children(&mut self, child: Element) {
        self.children.clear();
        self.push_elem(child);
    }

    // ------------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------------

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|name| name == class))
    }

    /// Child elements, skipping text nodes.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        })
    }

    /// Depth-first search (self included) for the first element with `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.element_children()
            .find_map(|child| child.find_by_class(class))
    }

    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.has_class(class) {
            return Some(self);
        }
        for node in &mut self.children {
            if let Node::Element(child) = node
                && let Some(found) = child.find_by_class_mut(class)
            {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (self included) carrying `class`, in document order.
    pub fn find_all_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, out: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            out.push(self);
        }
        for child in self.element_children() {
            child.collect_by_class(class, out);
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(elem) => elem.collect_text(out),
            }
        }
    }

    // ------------------------------------------------------------------------
    // serialization
    // ------------------------------------------------------------------------

    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }

        if is_void_element(&self.tag) {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let raw = is_raw_text_element(&self.tag);
        for node in &self.children {
            match node {
                Node::Text(text) if raw => out.push_str(text),
                Node::Text(text) => out.push_str(&escape(text)),
                Node::Element(elem) => elem.write_html(out),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::with_class("article", "page")
            .child(
                Element::with_class("header", "hero")
                    .child(Element::with_class("h1", "title").text("Acme")),
            )
            .child(
                Element::with_class("div", "body")
                    .child(Element::with_class("p", "para").text("one"))
                    .child(Element::with_class("p", "para").text("two")),
            )
    }

    #[test]
    fn test_to_html_nested() {
        let html = Element::new("p").text("a").child(Element::new("br")).to_html();
        assert_eq!(html, "<p>a<br/></p>");
    }

    #[test]
    fn test_to_html_escapes_text_and_attrs() {
        let html = Element::new("a")
            .attr("href", "/q?a=1&b=\"2\"")
            .text("<b>")
            .to_html();
        assert_eq!(html, r#"<a href="/q?a=1&amp;b=&quot;2&quot;">&lt;b&gt;</a>"#);
    }

    #[test]
    fn test_script_text_is_raw() {
        let html = Element::new("script")
            .attr("type", "application/ld+json")
            .text(r#"{"a":"b"}"#)
            .to_html();
        assert_eq!(html, r#"<script type="application/ld+json">{"a":"b"}</script>"#);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut elem = Element::new("div").attr("id", "a");
        elem.set_attr("id", "b");
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.get_attr("id"), Some("b"));
    }

    #[test]
    fn test_add_class() {
        let mut elem = Element::with_class("div", "a");
        elem.add_class("b");
        elem.add_class("a");
        assert_eq!(elem.get_attr("class"), Some("a b"));
        assert!(elem.has_class("b"));

        let mut bare = Element::new("div");
        bare.add_class("x");
        assert_eq!(bare.get_attr("class"), Some("x"));
    }

    #[test]
    fn test_find_by_class() {
        let page = sample();
        assert_eq!(page.find_by_class("title").map(Element::text_content), Some("Acme".into()));
        assert!(page.find_by_class("missing").is_none());
        assert_eq!(page.find_all_by_class("para").len(), 2);
    }

    #[test]
    fn test_find_by_class_mut_and_clear() {
        let mut page = sample();
        page.find_by_class_mut("body").unwrap().clear_children();
        assert!(page.find_all_by_class("para").is_empty());
        assert_eq!(page.text_content(), "Acme");
    }

    #[test]
    fn test_clones_are_independent() {
        let original = Element::new("span").text("x");
        let mut copy = original.clone();
        copy.replace_children(Element::new("b").text("y"));
        assert_eq!(original.text_content(), "x");
        assert_eq!(copy.text_content(), "y");
    }

    #[test]
    fn test_child_opt() {
        let elem = Element::new("div")
            .child_opt(None)
            .child_opt(Some(Element::new("p")));
        assert_eq!(elem.children.len(), 1);
    }
}
