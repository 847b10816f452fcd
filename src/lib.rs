//! auction-vdom - Virtual DOM evaluator and reconciler
//!
//! ## Core Concepts
//!
//! **Virtual tree**: [`VNode`] values describe the UI. Components are plain
//! functions `Props -> VNode` referenced from the tree.
//!
//! **Evaluation**: [`evaluate`] resolves every component, yielding a
//! [`PlainNode`] tree that provably holds no component.
//!
//! **Reconciliation**: [`sync`] walks a plain tree and a persistent
//! [`RenderedNode`] tree together and mutates the latter in place. Children
//! are matched by position; unchanged nodes keep their identity.
//!
//! ## Modules
//! - `node`: virtual and plain node types
//! - `attr`: props, prop values, callbacks
//! - `eval`: component resolution
//! - `dom`: the live rendered tree
//! - `reconcile`: `sync`, `render_into`
//! - `render`: HTML output
//! - `store`: reducer store with subscriptions
//! - `storefront`: demo application (feature `storefront`)
//!
//! ## Usage
//!
//! ```ignore
//! use auction_vdom::prelude::*;
//!
//! let greeting = Component::new("Greeting", |props| {
//!     VElement::new("p").text(props.get_str("name").unwrap_or("world")).into()
//! });
//!
//! let mut root = RenderedNode::mount_point("div", "root");
//! render_into(&greeting.el().prop("name", "Apple").into(), &mut root)?;
//! assert_eq!(to_html(&root), r#"<div id="root"><p>Apple</p></div>"#);
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Core modules
// =============================================================================

/// Props and prop values
pub mod attr;

/// Node types: VNode, VElement, Component, PlainNode
pub mod node;

/// Component resolution
pub mod eval;

/// Live rendered tree
pub mod dom;

/// Reconciliation of plain trees into rendered trees
pub mod reconcile;

/// HTML rendering
pub mod render;

/// Reducer store
pub mod store;

/// Deterministic hashing
pub mod hash;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

/// Auction storefront demo
#[cfg(feature = "storefront")]
pub mod storefront;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Component, ComponentRef, PlainElement, PlainNode, TextValue, VElement, VNode};

// Attributes
pub use attr::{Callback, PropValue, Props, PropsExt};

// Evaluation and reconciliation
pub use eval::{EvalConfig, evaluate, evaluate_with_config};
pub use reconcile::{ReconcileConfig, SyncStats, create, render_into, render_into_with_config, sync, sync_with_config};

// Rendered tree
pub use dom::{NodeId, RenderedNode};

// Store
pub use store::{Store, SubscriptionId};

// Hashing
pub use hash::StableHasher;

// Error types
pub use error::{VdomError, VdomResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::to_html;

    #[test]
    fn test_component_into_mount() {
        let greeting = Component::new("Greeting", |props| {
            VElement::new("p").text(props.get_str("name").unwrap_or("world")).into()
        });

        let mut root = RenderedNode::mount_point("div", "root");
        let stats = render_into(&greeting.el().prop("name", "Apple").into(), &mut root).unwrap();
        assert!(stats.has_mutations());
        assert_eq!(to_html(&root), r#"<div id="root"><p>Apple</p></div>"#);

        let stats = render_into(&greeting.el().prop("name", "Orange").into(), &mut root).unwrap();
        assert_eq!(stats.texts_set, 1);
        assert_eq!(to_html(&root), r#"<div id="root"><p>Orange</p></div>"#);
    }

    #[test]
    fn test_store_drives_render() {
        let store = Store::new(0_i64, |count: &i64, delta: i64| count + delta);
        let counter = |n: i64| VNode::from(VElement::new("span").with_class("count").text(n));

        let mut root = RenderedNode::mount_point("div", "root");
        render_into(&counter(store.state()), &mut root).unwrap();
        let span_id = root.child(0).unwrap().id();

        store.dispatch(3);
        render_into(&counter(store.state()), &mut root).unwrap();
        assert_eq!(root.child(0).unwrap().id(), span_id);
        assert_eq!(root.text_content(), "3");
    }
}
