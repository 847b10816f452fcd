//! Virtual node model.
//!
//! Virtual trees describe desired UI structure as plain data and are
//! rebuilt on every render pass.
//!
//! - [`VNode`]: text leaf, element, or unresolved component reference
//! - [`PlainNode`]: evaluated tree with no component references left
//!
//! A `PlainNode` can only be produced by evaluation (or built directly
//! from elements and text), so holding one proves every component has
//! already been resolved.

mod component;
mod element;
mod plain;
mod text;

pub use component::{Component, ComponentRef};
pub use element::VElement;
pub use plain::{PlainChildren, PlainElement, PlainNode};
pub use text::TextValue;

use compact_str::CompactString;
use smallvec::SmallVec;

/// Node in a virtual tree.
#[derive(Debug, Clone)]
pub enum VNode {
    Text(TextValue),
    Element(Box<VElement>),
    Component(ComponentRef),
}

impl VNode {
    // Generates for each variant (text -> Text, etc.):
    //   - is_xxx(&self) -> bool
    //   - as_xxx(&self) -> Option<&Type>
    //   - as_xxx_mut(&mut self) -> Option<&mut Type>
    impl_enum_accessors!(text => TextValue, element => VElement, component => ComponentRef);

    /// Identity key, if the node carries one
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Element(e) => e.key.as_deref(),
            Self::Component(c) => c.key.as_deref(),
        }
    }
}

/// Type alias for virtual children collection.
pub type Children = SmallVec<[VNode; 4]>;

impl From<VElement> for VNode {
    fn from(elem: VElement) -> Self {
        Self::Element(Box::new(elem))
    }
}

impl From<ComponentRef> for VNode {
    fn from(component: ComponentRef) -> Self {
        Self::Component(component)
    }
}

impl From<TextValue> for VNode {
    fn from(text: TextValue) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for VNode {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for VNode {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

impl From<CompactString> for VNode {
    fn from(s: CompactString) -> Self {
        Self::Text(TextValue::Str(s))
    }
}

impl From<f64> for VNode {
    fn from(n: f64) -> Self {
        Self::Text(n.into())
    }
}

impl From<i64> for VNode {
    fn from(n: i64) -> Self {
        Self::Text(n.into())
    }
}
