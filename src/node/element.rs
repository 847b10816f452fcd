//! Virtual element type
//!
//! The building block of virtual trees, with a builder API.

use compact_str::CompactString;

use crate::attr::{PropValue, Props, PropsExt};

use super::{Children, TextValue, VNode};

// =============================================================================
// VElement
// =============================================================================

/// Element description: tag, props, children and optional key
#[derive(Debug, Clone)]
pub struct VElement {
    /// Tag name
    pub tag: CompactString,
    /// Element properties (never contains `children` or `key`)
    pub props: Props,
    /// Child nodes, in order
    pub children: Children,
    /// Identity key, stamped onto the rendered node
    pub key: Option<CompactString>,
}

impl VElement {
    /// Create an element with no props or children
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            children: Children::new(),
            key: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a prop
    pub fn prop(mut self, name: impl Into<CompactString>, value: impl Into<PropValue>) -> Self {
        self.props.set_prop(name, value);
        self
    }

    /// Set the `id` prop
    pub fn with_id(self, id: impl Into<CompactString>) -> Self {
        self.prop("id", PropValue::Str(id.into()))
    }

    /// Set the `class` prop
    pub fn with_class(self, class: impl Into<CompactString>) -> Self {
        self.prop("class", PropValue::Str(class.into()))
    }

    /// Set the identity key
    pub fn with_key(mut self, key: impl Into<CompactString>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append a single child
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a sequence of children
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child
    pub fn text(mut self, text: impl Into<TextValue>) -> Self {
        self.children.push(VNode::Text(text.into()));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get prop value by name
    pub fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get_prop(name)
    }

    /// Get the `id` prop
    pub fn id(&self) -> Option<&str> {
        self.props.get_str("id")
    }

    /// Get the `class` prop
    pub fn class(&self) -> Option<&str> {
        self.props.get_str("class")
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let elem = VElement::new("article")
            .with_id("lot-1")
            .with_class("lot")
            .prop("data-price", 15.0)
            .child(VElement::new("h1").text("Apple"))
            .children(vec![VElement::new("p"), VElement::new("div")])
            .text(15_i64)
            .with_key("1");

        assert_eq!(elem.id(), Some("lot-1"));
        assert_eq!(elem.class(), Some("lot"));
        assert_eq!(elem.get_prop("data-price"), Some(&PropValue::Num(15.0)));
        assert_eq!(elem.child_count(), 4);
        assert_eq!(elem.key.as_deref(), Some("1"));
    }

    #[test]
    fn test_element_basics() {
        let elem = VElement::new("div");
        assert_eq!(elem.tag, "div");
        assert!(elem.is_empty());
        assert!(elem.props.is_empty());
    }
}
