//! Component references
//!
//! A component is a plain function from props to a virtual node. There is
//! no class, instance or lifecycle: calling it again with the same props
//! describes the same UI.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use crate::attr::{PropValue, Props, PropsExt};

use super::VNode;

// =============================================================================
// Component
// =============================================================================

type RenderFn = dyn Fn(&Props) -> VNode + Send + Sync;

/// A named render function `Props -> VNode`.
///
/// Closures are accepted, so connect-style bindings can capture a state
/// snapshot or a command sender.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Arc<RenderFn>,
}

impl Component {
    /// Create a component from a render function
    pub fn new(name: &'static str, render: impl Fn(&Props) -> VNode + Send + Sync + 'static) -> Self {
        Self {
            name,
            render: Arc::new(render),
        }
    }

    /// Component name, for logs and debugging
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Call the render function
    #[inline]
    pub fn render(&self, props: &Props) -> VNode {
        (self.render)(props)
    }

    /// Reference this component with empty props
    pub fn el(&self) -> ComponentRef {
        ComponentRef::new(self.clone())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name).finish()
    }
}

// =============================================================================
// ComponentRef
// =============================================================================

/// Unresolved use of a component inside a virtual tree
#[derive(Debug, Clone)]
pub struct ComponentRef {
    /// The component to call
    pub component: Component,
    /// Props passed on evaluation
    pub props: Props,
    /// Optional identity key
    pub key: Option<CompactString>,
}

impl ComponentRef {
    /// Reference a component with empty props
    pub fn new(component: Component) -> Self {
        Self {
            component,
            props: Vec::new(),
            key: None,
        }
    }

    /// Add a prop (builder)
    pub fn prop(mut self, name: impl Into<CompactString>, value: impl Into<PropValue>) -> Self {
        self.props.set_prop(name, value);
        self
    }

    /// Set the identity key (builder)
    pub fn with_key(mut self, key: impl Into<CompactString>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Call the component with the stored props
    pub fn resolve(&self) -> VNode {
        self.component.render(&self.props)
    }
}
