//! Evaluated (plain) nodes
//!
//! Output of the evaluator and input of the reconciler.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{PropValue, Props, PropsExt};

use super::TextValue;

/// Node of an evaluated tree: element or text, never a component.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainNode {
    Text(TextValue),
    Element(Box<PlainElement>),
}

impl PlainNode {
    impl_enum_accessors!(text => TextValue, element => PlainElement);

    /// Tag used for positional matching; text nodes report `#text`.
    pub fn tag(&self) -> &str {
        match self {
            Self::Text(_) => "#text",
            Self::Element(e) => &e.tag,
        }
    }

    /// Identity key of an element node
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Element(e) => e.key.as_deref(),
        }
    }

    /// Concatenated text content of the subtree
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        match self {
            Self::Text(t) => buf.push_str(&t.to_content()),
            Self::Element(e) => {
                for child in &e.children {
                    child.collect_text(buf);
                }
            }
        }
    }
}

impl From<PlainElement> for PlainNode {
    fn from(elem: PlainElement) -> Self {
        Self::Element(Box::new(elem))
    }
}

impl From<TextValue> for PlainNode {
    fn from(text: TextValue) -> Self {
        Self::Text(text)
    }
}

/// Type alias for evaluated children collection.
pub type PlainChildren = SmallVec<[PlainNode; 4]>;

/// Element of an evaluated tree
#[derive(Debug, Clone, PartialEq)]
pub struct PlainElement {
    /// Tag name
    pub tag: CompactString,
    /// Element properties
    pub props: Props,
    /// Evaluated children
    pub children: PlainChildren,
    /// Identity key
    pub key: Option<CompactString>,
}

impl PlainElement {
    /// Create an element with no props or children
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            children: PlainChildren::new(),
            key: None,
        }
    }

    /// Add a prop (builder)
    pub fn prop(mut self, name: impl Into<CompactString>, value: impl Into<PropValue>) -> Self {
        self.props.set_prop(name, value);
        self
    }

    /// Append a child (builder)
    pub fn child(mut self, child: impl Into<PlainNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child (builder)
    pub fn text(mut self, text: impl Into<TextValue>) -> Self {
        self.children.push(PlainNode::Text(text.into()));
        self
    }

    /// Set the identity key (builder)
    pub fn with_key(mut self, key: impl Into<CompactString>) -> Self {
        self.key = Some(key.into());
        self
    }
}
